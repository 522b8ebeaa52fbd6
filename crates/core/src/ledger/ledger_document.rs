//! Persisted representation of a ledger.
//!
//! Stored documents are JSON objects with two keys:
//!
//! ```json
//! {
//!   "portefeuille": { "AAPL": { "pru": 110.0, "qty": 15.0, "date": "2026-01-05" } },
//!   "ventes": [ { "ticker": "AAPL", "gain": 200.0, "date": "2026-02-10",
//!                 "pru_achat": 110.0, "qty_vendu": 5.0 } ]
//! }
//! ```
//!
//! Both keys are optional on read; a missing key loads as empty.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ledger_model::{Ledger, Position, RealizedSale};
use crate::errors::Result;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PositionRecord {
    #[serde(rename = "pru")]
    pub average_cost: Decimal,
    #[serde(rename = "qty")]
    pub quantity: Decimal,
    #[serde(rename = "date")]
    pub open_date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SaleRecord {
    #[serde(rename = "ticker")]
    pub symbol: String,
    #[serde(rename = "gain")]
    pub realized_gain: Decimal,
    #[serde(rename = "date")]
    pub sale_date: NaiveDate,
    #[serde(rename = "pru_achat")]
    pub average_cost_at_sale: Decimal,
    #[serde(rename = "qty_vendu")]
    pub quantity_sold: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PortfolioDocument {
    #[serde(rename = "portefeuille", default)]
    pub positions: BTreeMap<String, PositionRecord>,
    #[serde(rename = "ventes", default)]
    pub sales: Vec<SaleRecord>,
}

impl PortfolioDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&Ledger> for PortfolioDocument {
    fn from(ledger: &Ledger) -> Self {
        PortfolioDocument {
            positions: ledger
                .positions()
                .map(|p| {
                    (
                        p.symbol.clone(),
                        PositionRecord {
                            average_cost: p.average_cost,
                            quantity: p.quantity,
                            open_date: p.open_date,
                        },
                    )
                })
                .collect(),
            sales: ledger
                .sales()
                .iter()
                .map(|s| SaleRecord {
                    symbol: s.symbol.clone(),
                    realized_gain: s.realized_gain,
                    sale_date: s.sale_date,
                    average_cost_at_sale: s.average_cost_at_sale,
                    quantity_sold: s.quantity_sold,
                })
                .collect(),
        }
    }
}

impl From<PortfolioDocument> for Ledger {
    fn from(document: PortfolioDocument) -> Self {
        let positions = document
            .positions
            .into_iter()
            .map(|(symbol, record)| {
                Position::new(symbol, record.quantity, record.average_cost, record.open_date)
            })
            .collect();
        let sales = document
            .sales
            .into_iter()
            .map(|record| RealizedSale {
                symbol: record.symbol,
                realized_gain: record.realized_gain,
                sale_date: record.sale_date,
                average_cost_at_sale: record.average_cost_at_sale,
                quantity_sold: record.quantity_sold,
            })
            .collect();
        Ledger::from_parts(positions, sales)
    }
}
