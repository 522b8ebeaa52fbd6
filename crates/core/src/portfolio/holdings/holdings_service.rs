use async_trait::async_trait;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::holdings_model::{PositionView, PositionsView, SaleView, SalesView, TradeRequest};
use crate::catalogue::icon_for;
use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Error, Result};
use crate::identity::Identity;
use crate::ledger::{Ledger, LedgerRepositoryTrait, Position, RealizedSale};
use crate::quotes::PriceLookupTrait;
use crate::utils::decimal_utils::{checked, checked_sum};
use crate::utils::time_utils::today;

#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_ledger(&self, identity: &Identity) -> Result<Ledger>;

    async fn buy(&self, identity: &Identity, trade: TradeRequest) -> Result<Position>;

    async fn sell(&self, identity: &Identity, trade: TradeRequest) -> Result<RealizedSale>;

    /// Reverts the sale at `index` of the history.
    async fn undo_sale(&self, identity: &Identity, index: usize) -> Result<RealizedSale>;

    /// Removes a position without booking any gain. `None` when not held.
    async fn delete_position(&self, identity: &Identity, symbol: &str)
        -> Result<Option<Position>>;

    /// Values every open position at its latest price.
    async fn positions_view(&self, identity: &Identity) -> Result<PositionsView>;

    fn sales_view(&self, identity: &Identity) -> Result<SalesView>;
}

/// Stateless session over a ledger repository: every mutation loads the
/// identity's ledger, applies one change and writes it back.
pub struct PortfolioService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    price_lookup: Arc<dyn PriceLookupTrait>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        price_lookup: Arc<dyn PriceLookupTrait>,
    ) -> Self {
        Self {
            repository,
            price_lookup,
        }
    }

    /// Loads, applies `mutation`, and saves against the loaded version.
    /// Nothing is written when `mutation` fails.
    async fn mutate<T, F>(&self, identity: &Identity, mutation: F) -> Result<T>
    where
        F: FnOnce(&mut Ledger) -> Result<T> + Send,
        T: Send,
    {
        let mut stored = self.repository.load(identity)?;
        let output = mutation(&mut stored.ledger)?;
        let version = self
            .repository
            .save(identity, &stored.ledger, stored.version)
            .await?;
        debug!("Saved portfolio of {} at version {}", identity, version);
        Ok(output)
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_ledger(&self, identity: &Identity) -> Result<Ledger> {
        Ok(self.repository.load(identity)?.ledger)
    }

    async fn buy(&self, identity: &Identity, trade: TradeRequest) -> Result<Position> {
        let date = trade.date.unwrap_or_else(today);
        let position = self
            .mutate(identity, |ledger| {
                ledger
                    .buy(&trade.symbol, trade.price, trade.quantity, date)
                    .cloned()
            })
            .await?;
        info!(
            "{} bought {} {} at {}",
            identity, trade.quantity, position.symbol, trade.price
        );
        Ok(position)
    }

    async fn sell(&self, identity: &Identity, trade: TradeRequest) -> Result<RealizedSale> {
        let date = trade.date.unwrap_or_else(today);
        let sale = self
            .mutate(identity, |ledger| {
                ledger.sell(&trade.symbol, trade.price, trade.quantity, date)
            })
            .await?;
        info!(
            "{} sold {} {} at {}, realized {}",
            identity, sale.quantity_sold, sale.symbol, trade.price, sale.realized_gain
        );
        Ok(sale)
    }

    async fn undo_sale(&self, identity: &Identity, index: usize) -> Result<RealizedSale> {
        let sale = self
            .mutate(identity, |ledger| ledger.undo_sale(index))
            .await?;
        info!("{} undid sale #{} of {}", identity, index, sale.symbol);
        Ok(sale)
    }

    async fn delete_position(
        &self,
        identity: &Identity,
        symbol: &str,
    ) -> Result<Option<Position>> {
        let removed = self
            .mutate(identity, |ledger| Ok(ledger.delete(symbol)))
            .await?;
        match &removed {
            Some(position) => info!("{} deleted position {}", identity, position.symbol),
            None => debug!("{} has no position {} to delete", identity, symbol),
        }
        Ok(removed)
    }

    async fn positions_view(&self, identity: &Identity) -> Result<PositionsView> {
        let ledger = self.get_ledger(identity)?;

        let mut positions = Vec::new();
        let mut unavailable = Vec::new();
        for position in ledger.positions() {
            match self.price_lookup.latest_price(&position.symbol).await {
                Ok(price) => {
                    positions.push(PositionView::new(position, icon_for(&position.symbol), price)?)
                }
                Err(Error::MarketData(e)) => {
                    warn!("No live price for {}: {}", position.symbol, e);
                    unavailable.push(position.symbol.clone());
                }
                Err(e) => return Err(e),
            }
        }

        let total_unrealized_gain =
            checked_sum(positions.iter().map(|p| p.unrealized_gain), "unrealized gain")?;
        let total_invested = checked_sum(positions.iter().map(|p| p.cost_value), "invested")?;
        let total_unrealized_percent = if total_invested > Decimal::ZERO {
            let percent = checked(
                total_unrealized_gain
                    .checked_div(total_invested)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
                "unrealized percent",
            )?;
            Some(percent.round_dp(DECIMAL_PRECISION))
        } else {
            None
        };

        Ok(PositionsView {
            positions,
            unavailable,
            total_unrealized_gain,
            total_invested,
            total_unrealized_percent,
        })
    }

    fn sales_view(&self, identity: &Identity) -> Result<SalesView> {
        let ledger = self.get_ledger(identity)?;
        let sales = ledger
            .sales()
            .iter()
            .enumerate()
            .map(|(index, sale)| SaleView {
                index,
                icon: icon_for(&sale.symbol).to_string(),
                sale: sale.clone(),
            })
            .collect();

        Ok(SalesView {
            sales,
            total_realized_gain: ledger.total_realized_gain()?,
        })
    }
}
