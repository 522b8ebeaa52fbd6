use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::ledger::{Position, RealizedSale};
use crate::utils::decimal_utils::checked;

/// An open position valued at its latest price.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub symbol: String,
    pub icon: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub open_date: NaiveDate,
    pub live_price: Decimal,
    pub current_value: Decimal,
    pub cost_value: Decimal,
    pub unrealized_gain: Decimal,
}

impl PositionView {
    pub fn new(position: &Position, icon: &str, live_price: Decimal) -> Result<Self> {
        let current_value = checked(live_price.checked_mul(position.quantity), "current value")?;
        let cost_value = position.cost_value()?;
        Ok(PositionView {
            symbol: position.symbol.clone(),
            icon: icon.to_string(),
            quantity: position.quantity,
            average_cost: position.average_cost,
            open_date: position.open_date,
            live_price,
            current_value,
            cost_value,
            unrealized_gain: checked(current_value.checked_sub(cost_value), "unrealized gain")?,
        })
    }
}

/// Valued positions plus totals over the positions that could be priced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionsView {
    pub positions: Vec<PositionView>,
    /// Held symbols without a live price, excluded from the totals.
    pub unavailable: Vec<String>,
    pub total_unrealized_gain: Decimal,
    pub total_invested: Decimal,
    /// `None` when nothing priced is invested.
    pub total_unrealized_percent: Option<Decimal>,
}

/// One entry of the sale history, addressable by `index` for undo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub index: usize,
    pub icon: String,
    #[serde(flatten)]
    pub sale: RealizedSale,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesView {
    pub sales: Vec<SaleView>,
    pub total_realized_gain: Decimal,
}

/// A buy or sell order. The date defaults to today.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub symbol: String,
    pub price: Decimal,
    pub quantity: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
