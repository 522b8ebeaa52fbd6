use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::constants::{MAX_TRADE_AMOUNT, QUANTITY_THRESHOLD};
use crate::errors::{LedgerError, Result, ValidationError};
use crate::utils::decimal_utils::{checked, checked_sum};

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold = Decimal::from_str(QUANTITY_THRESHOLD).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}

/// Ledger key for a ticker: trimmed and upper-cased.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// An open holding of one symbol.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub quantity: Decimal,
    /// Quantity-weighted mean purchase price of the units still held.
    pub average_cost: Decimal,
    /// Date of first acquisition, or of the last reopening.
    pub open_date: NaiveDate,
}

impl Position {
    pub fn new(symbol: String, quantity: Decimal, average_cost: Decimal, open_date: NaiveDate) -> Self {
        Position {
            symbol,
            quantity,
            average_cost,
            open_date,
        }
    }

    /// Money paid for the units still held.
    pub fn cost_value(&self) -> Result<Decimal> {
        checked(self.average_cost.checked_mul(self.quantity), "cost value")
    }

    /// Folds a purchase into the weighted average cost.
    fn add_units(&mut self, price: Decimal, quantity: Decimal) -> Result<()> {
        let total_quantity = checked(self.quantity.checked_add(quantity), "quantity")?;
        let trade_value = checked(price.checked_mul(quantity), "trade value")?;
        let total_cost = checked(self.cost_value()?.checked_add(trade_value), "cost value")?;
        self.average_cost = checked(total_cost.checked_div(total_quantity), "average cost")?;
        self.quantity = total_quantity;
        Ok(())
    }
}

/// A completed sell. Appended on sell, removed only by undo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealizedSale {
    pub symbol: String,
    /// `(sale price - average cost at sale) * quantity sold`
    pub realized_gain: Decimal,
    pub sale_date: NaiveDate,
    /// Cost basis snapshot, used to reopen the position on undo.
    pub average_cost_at_sale: Decimal,
    pub quantity_sold: Decimal,
}

/// Open positions keyed by symbol plus the chronological sale history.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    positions: BTreeMap<String, Position>,
    sales: Vec<RealizedSale>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from stored parts. Positions without a significant
    /// quantity are dropped.
    pub fn from_parts(positions: Vec<Position>, sales: Vec<RealizedSale>) -> Self {
        let mut map = BTreeMap::new();
        let sales = sales
            .into_iter()
            .map(|mut sale| {
                sale.symbol = normalize_symbol(&sale.symbol);
                sale
            })
            .collect();
        for mut position in positions {
            if !position.quantity.is_sign_positive() || !is_quantity_significant(&position.quantity)
            {
                warn!(
                    "Dropping stored position {} with non-positive quantity {}",
                    position.symbol, position.quantity
                );
                continue;
            }
            position.symbol = normalize_symbol(&position.symbol);
            map.insert(position.symbol.clone(), position);
        }
        Ledger {
            positions: map,
            sales,
        }
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(&normalize_symbol(symbol))
    }

    /// Open positions in symbol order.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    /// Sale history, oldest first.
    pub fn sales(&self) -> &[RealizedSale] {
        &self.sales
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.sales.is_empty()
    }

    pub fn total_realized_gain(&self) -> Result<Decimal> {
        checked_sum(self.sales.iter().map(|s| s.realized_gain), "realized gain")
    }

    /// Records a purchase.
    ///
    /// Opens the position at `price` if the symbol is not held; otherwise
    /// folds the purchase into the weighted average cost. The open date of
    /// an existing position is kept.
    pub fn buy(
        &mut self,
        symbol: &str,
        price: Decimal,
        quantity: Decimal,
        date: NaiveDate,
    ) -> Result<&Position> {
        validate_trade(symbol, price, quantity)?;
        let key = normalize_symbol(symbol);

        let position: &Position = match self.positions.entry(key.clone()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.add_units(price, quantity)?;
                existing
            }
            Entry::Vacant(entry) => entry.insert(Position::new(key, quantity, price, date)),
        };

        debug!(
            "Bought {} {} at {}: now {} @ {}",
            quantity, position.symbol, price, position.quantity, position.average_cost
        );
        Ok(position)
    }

    /// Records a sale and returns the realized-gain entry appended to history.
    ///
    /// The average cost of the remaining units is unchanged. A position whose
    /// remaining quantity is no longer significant is closed.
    pub fn sell(
        &mut self,
        symbol: &str,
        price: Decimal,
        quantity: Decimal,
        date: NaiveDate,
    ) -> Result<RealizedSale> {
        validate_trade(symbol, price, quantity)?;
        let key = normalize_symbol(symbol);

        let position = self
            .positions
            .get_mut(&key)
            .ok_or_else(|| LedgerError::UnknownSymbol(key.clone()))?;

        if quantity > position.quantity {
            return Err(LedgerError::InsufficientQuantity {
                symbol: key,
                requested: quantity,
                available: position.quantity,
            }
            .into());
        }

        let realized_gain = checked(
            price
                .checked_sub(position.average_cost)
                .and_then(|margin| margin.checked_mul(quantity)),
            "realized gain",
        )?;
        let sale = RealizedSale {
            symbol: key.clone(),
            realized_gain,
            sale_date: date,
            average_cost_at_sale: position.average_cost,
            quantity_sold: quantity,
        };

        position.quantity -= quantity;
        if !position.quantity.is_sign_positive() || !is_quantity_significant(&position.quantity) {
            debug!("Position {} fully sold, closing it", key);
            self.positions.remove(&key);
        }

        debug!(
            "Sold {} {} at {}: realized {}",
            quantity, key, price, sale.realized_gain
        );
        self.sales.push(sale.clone());
        Ok(sale)
    }

    /// Reverts the sale at `index` and returns it.
    ///
    /// If the symbol is still held, the sold quantity is added back at the
    /// current average cost. Otherwise the position is reopened from the
    /// sale snapshot, dated on the sale date. This is not an exact inverse
    /// when other trades on the symbol happened after the sale.
    pub fn undo_sale(&mut self, index: usize) -> Result<RealizedSale> {
        if index >= self.sales.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.sales.len(),
            }
            .into());
        }
        let sale = &self.sales[index];
        match self.positions.entry(sale.symbol.clone()) {
            Entry::Occupied(mut entry) => {
                let position = entry.get_mut();
                position.quantity =
                    checked(position.quantity.checked_add(sale.quantity_sold), "quantity")?;
            }
            Entry::Vacant(entry) => {
                entry.insert(Position::new(
                    sale.symbol.clone(),
                    sale.quantity_sold,
                    sale.average_cost_at_sale,
                    sale.sale_date,
                ));
            }
        }
        let sale = self.sales.remove(index);

        debug!("Undid sale #{} of {} {}", index, sale.quantity_sold, sale.symbol);
        Ok(sale)
    }

    /// Removes a position without recording any gain. No-op when absent.
    pub fn delete(&mut self, symbol: &str) -> Option<Position> {
        self.positions.remove(&normalize_symbol(symbol))
    }
}

fn validate_trade(symbol: &str, price: Decimal, quantity: Decimal) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(ValidationError::MissingField("symbol".to_string()).into());
    }
    if price < Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!("price must be >= 0, got {}", price)).into());
    }
    if quantity <= Decimal::ZERO {
        return Err(
            ValidationError::InvalidInput(format!("quantity must be > 0, got {}", quantity)).into(),
        );
    }
    let max = Decimal::from(MAX_TRADE_AMOUNT);
    if price > max || quantity > max {
        return Err(ValidationError::InvalidInput(format!(
            "price and quantity must not exceed {}",
            max
        ))
        .into());
    }
    Ok(())
}
