#[cfg(test)]
mod tests {
    use crate::errors::{Error, LedgerError, PersistenceError, Result, ValidationError};
    use crate::identity::Identity;
    use crate::ledger::{Ledger, LedgerRepositoryTrait, Position, StoredLedger};
    use crate::portfolio::holdings::{PortfolioService, PortfolioServiceTrait, TradeRequest};
    use crate::quotes::{MarketDataError, PriceLookupTrait, PriceSeries};
    use crate::utils::time_utils::today;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryRepository {
        documents: Mutex<HashMap<Identity, StoredLedger>>,
        fail_saves: AtomicBool,
    }

    #[async_trait]
    impl LedgerRepositoryTrait for InMemoryRepository {
        fn load(&self, identity: &Identity) -> Result<StoredLedger> {
            Ok(self
                .documents
                .lock()
                .unwrap()
                .get(identity)
                .cloned()
                .unwrap_or_default())
        }

        async fn save(
            &self,
            identity: &Identity,
            ledger: &Ledger,
            expected_version: i64,
        ) -> Result<i64> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(PersistenceError::Io("disk full".to_string()).into());
            }
            let mut documents = self.documents.lock().unwrap();
            let found = documents.get(identity).map(|s| s.version).unwrap_or(0);
            if found != expected_version {
                return Err(PersistenceError::VersionConflict {
                    identity: identity.to_string(),
                    expected: expected_version,
                    found,
                }
                .into());
            }
            documents.insert(
                identity.clone(),
                StoredLedger {
                    ledger: ledger.clone(),
                    version: found + 1,
                },
            );
            Ok(found + 1)
        }
    }

    struct FixedPrices(HashMap<String, Decimal>);

    #[async_trait]
    impl PriceLookupTrait for FixedPrices {
        async fn latest_price(&self, symbol: &str) -> Result<Decimal> {
            self.0.get(symbol).copied().ok_or_else(|| {
                MarketDataError::PriceUnavailable {
                    symbol: symbol.to_string(),
                    reason: "not mocked".to_string(),
                }
                .into()
            })
        }

        async fn price_history(&self, _symbol: &str, _start: NaiveDate) -> Result<PriceSeries> {
            Ok(PriceSeries::new())
        }
    }

    fn setup(prices: &[(&str, Decimal)]) -> (Arc<InMemoryRepository>, PortfolioService) {
        let repository = Arc::new(InMemoryRepository::default());
        let lookup = FixedPrices(
            prices
                .iter()
                .map(|(s, p)| (s.to_string(), *p))
                .collect(),
        );
        let service = PortfolioService::new(repository.clone(), Arc::new(lookup));
        (repository, service)
    }

    fn alice() -> Identity {
        Identity::user("alice").unwrap()
    }

    fn trade(symbol: &str, price: Decimal, quantity: Decimal) -> TradeRequest {
        TradeRequest {
            symbol: symbol.to_string(),
            price,
            quantity,
            date: NaiveDate::from_ymd_opt(2026, 2, 10),
        }
    }

    #[tokio::test]
    async fn test_every_mutation_is_written_through() {
        let (repository, service) = setup(&[]);
        service.buy(&alice(), trade("AAPL", dec!(100), dec!(10))).await.unwrap();
        service.buy(&alice(), trade("AAPL", dec!(120), dec!(10))).await.unwrap();
        let sale = service
            .sell(&alice(), trade("AAPL", dec!(150), dec!(5)))
            .await
            .unwrap();
        assert_eq!(sale.realized_gain, dec!(200));

        let stored = repository.load(&alice()).unwrap();
        assert_eq!(stored.version, 3);
        let position = stored.ledger.position("AAPL").unwrap();
        assert_eq!(position.quantity, dec!(15));
        assert_eq!(position.average_cost, dec!(110));

        service.undo_sale(&alice(), 0).await.unwrap();
        let stored = repository.load(&alice()).unwrap();
        assert_eq!(stored.version, 4);
        assert_eq!(stored.ledger.position("AAPL").unwrap().quantity, dec!(20));
        assert!(stored.ledger.sales().is_empty());
    }

    #[tokio::test]
    async fn test_identities_are_isolated() {
        let (_repository, service) = setup(&[]);
        service.buy(&alice(), trade("AAPL", dec!(100), dec!(1))).await.unwrap();
        let bob = Identity::user("Bob").unwrap();
        assert!(service.get_ledger(&bob).unwrap().is_empty());
        assert!(service
            .get_ledger(&Identity::user("ALICE").unwrap())
            .unwrap()
            .position("AAPL")
            .is_some());
    }

    #[tokio::test]
    async fn test_trade_date_defaults_to_today() {
        let (_repository, service) = setup(&[]);
        let mut order = trade("MC.PA", dec!(600), dec!(1));
        order.date = None;
        let position = service.buy(&alice(), order).await.unwrap();
        assert_eq!(position.open_date, today());
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let (repository, service) = setup(&[]);
        service.buy(&alice(), trade("AAPL", dec!(100), dec!(10))).await.unwrap();

        let err = service
            .sell(&alice(), trade("AAPL", dec!(150), dec!(11)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::InsufficientQuantity { .. })
        ));
        let err = service
            .buy(&alice(), trade("AAPL", dec!(-1), dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidInput(_))));
        assert_eq!(repository.load(&alice()).unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_discards_mutation() {
        let (repository, service) = setup(&[]);
        service.buy(&alice(), trade("AAPL", dec!(100), dec!(10))).await.unwrap();
        repository.fail_saves.store(true, Ordering::SeqCst);

        let err = service
            .sell(&alice(), trade("AAPL", dec!(150), dec!(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence(PersistenceError::Io(_))));

        let ledger = service.get_ledger(&alice()).unwrap();
        assert_eq!(ledger.position("AAPL").unwrap().quantity, dec!(10));
        assert!(ledger.sales().is_empty());
    }

    #[tokio::test]
    async fn test_delete_position() {
        let (repository, service) = setup(&[]);
        service.buy(&alice(), trade("AIR.PA", dec!(150), dec!(3))).await.unwrap();

        let removed = service.delete_position(&alice(), "air.pa").await.unwrap();
        assert_eq!(removed.unwrap().quantity, dec!(3));
        assert!(service.delete_position(&alice(), "AIR.PA").await.unwrap().is_none());

        let stored = repository.load(&alice()).unwrap();
        assert!(stored.ledger.is_empty());
        assert_eq!(stored.ledger.total_realized_gain().unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_positions_view_values_and_skips_unavailable() {
        let (_repository, service) =
            setup(&[("AAPL", dec!(130)), ("MC.PA", dec!(550))]);
        service.buy(&alice(), trade("AAPL", dec!(100), dec!(10))).await.unwrap();
        service.buy(&alice(), trade("MC.PA", dec!(600), dec!(2))).await.unwrap();
        service.buy(&alice(), trade("GONE", dec!(5), dec!(100))).await.unwrap();

        let view = service.positions_view(&alice()).await.unwrap();
        assert_eq!(view.unavailable, vec!["GONE".to_string()]);
        assert_eq!(view.positions.len(), 2);

        let aapl = &view.positions[0];
        assert_eq!(aapl.symbol, "AAPL");
        assert_eq!(aapl.icon, "🍎");
        assert_eq!(aapl.current_value, dec!(1300));
        assert_eq!(aapl.cost_value, dec!(1000));
        assert_eq!(aapl.unrealized_gain, dec!(300));

        // 300 - 100 over 1000 + 1200 invested
        assert_eq!(view.total_unrealized_gain, dec!(200));
        assert_eq!(view.total_invested, dec!(2200));
        assert_eq!(
            view.total_unrealized_percent,
            Some((dec!(200) / dec!(2200) * dec!(100)).round_dp(6))
        );
    }

    #[tokio::test]
    async fn test_positions_view_without_priced_positions_has_no_percent() {
        let (_repository, service) = setup(&[]);
        service.buy(&alice(), trade("GONE", dec!(5), dec!(100))).await.unwrap();
        let view = service.positions_view(&alice()).await.unwrap();
        assert!(view.positions.is_empty());
        assert_eq!(view.total_invested, Decimal::ZERO);
        assert_eq!(view.total_unrealized_percent, None);
    }

    #[tokio::test]
    async fn test_sales_view_indexes_history() {
        let (_repository, service) = setup(&[]);
        service.buy(&alice(), trade("AAPL", dec!(100), dec!(10))).await.unwrap();
        service.sell(&alice(), trade("AAPL", dec!(110), dec!(2))).await.unwrap();
        service.sell(&alice(), trade("AAPL", dec!(90), dec!(1))).await.unwrap();

        let view = service.sales_view(&alice()).unwrap();
        assert_eq!(view.sales.len(), 2);
        assert_eq!(view.sales[1].index, 1);
        assert_eq!(view.sales[1].sale.realized_gain, dec!(-10));
        assert_eq!(view.total_realized_gain, dec!(10));
    }

    #[tokio::test]
    async fn test_positions_view_overflow_is_an_error() {
        let (repository, service) = setup(&[("AAPL", dec!(1000000000000))]);
        let huge = Position::new(
            "AAPL".to_string(),
            dec!(100000000000000000000),
            dec!(1),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        );
        repository.documents.lock().unwrap().insert(
            alice(),
            StoredLedger {
                ledger: Ledger::from_parts(vec![huge], vec![]),
                version: 1,
            },
        );

        let err = service.positions_view(&alice()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidInput(_))));
    }
}
