//! Market statistics.
//!
//! [`MarketReader`] abstracts the three raw reads the statistics are built
//! from, and derives everything else on top of them. [`MarketReader::stats`]
//! fans the reads out concurrently and merges them into a [`MarketStats`].

use alloy::primitives::U256;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::Result,
    giwa::morpho::{MarketState, liquidation::is_custom_liquidation_active},
    units::{self, DEFAULT_DECIMALS, DEFAULT_PRECISION},
};

/// Display-ready market snapshot.
///
/// Every value is pre-formatted so the display precision is fixed:
/// amounts with 2 decimals, the ETH price in whole KRW and rates as
/// percentages with 2 decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    /// Total UPETH supplied
    pub total_supply: String,
    /// Total UPETH borrowed
    pub total_borrow: String,
    /// KRW per ETH
    pub eth_price_krw: String,
    pub kimchi_premium_percent: String,
    pub apr_percent: String,
    pub utilization_percent: String,
}

/// Read access to a single market.
///
/// Implementors provide the raw reads; the derived values and the aggregated
/// snapshot come for free. Every derived read fetches its own inputs, nothing
/// is cached between calls.
#[allow(async_fn_in_trait)]
pub trait MarketReader {
    /// Market totals.
    async fn market_state(&self) -> Result<MarketState>;

    /// Raw oracle price: collateral units per loan unit, scaled by 1e36.
    async fn oracle_price(&self) -> Result<U256>;

    /// Raw kimchi premium, scaled by 1e18.
    async fn kimchi_premium_raw(&self) -> Result<U256>;

    /// Price of one ETH in KRW.
    async fn eth_price_krw(&self) -> Result<Decimal> {
        units::invert_price_feed(self.oracle_price().await?)
    }

    /// Kimchi premium as a fraction (0.0145 = 1.45%).
    async fn kimchi_premium(&self) -> Result<Decimal> {
        units::scale_to_decimal(self.kimchi_premium_raw().await?, DEFAULT_DECIMALS)
    }

    /// Borrowed over supplied assets (0.5 = 50%).
    async fn utilization(&self) -> Result<Decimal> {
        self.market_state().await?.utilization()
    }

    /// Current borrow APR (0.5 = 50%).
    ///
    /// The deployed interest rate model is linear with APR equal to
    /// utilization. Other models don't share this property.
    async fn apr(&self) -> Result<Decimal> {
        self.market_state().await?.utilization()
    }

    /// Whether the kimchi premium currently opens custom liquidations.
    async fn custom_liquidation_active(&self) -> Result<bool> {
        Ok(is_custom_liquidation_active(self.kimchi_premium().await?))
    }

    /// Reads everything at once.
    ///
    /// The five reads run concurrently. If any of them fails the whole
    /// snapshot fails with that error.
    async fn stats(&self) -> Result<MarketStats> {
        let (market, eth_price, kimchi_premium, apr, utilization) = futures::try_join!(
            self.market_state(),
            self.eth_price_krw(),
            self.kimchi_premium(),
            self.apr(),
            self.utilization(),
        )?;
        log::debug!("market stats read: {market:?}");

        Ok(MarketStats {
            total_supply: units::format_amount_default(U256::from(market.total_supply_assets))?,
            total_borrow: units::format_amount_default(U256::from(market.total_borrow_assets))?,
            eth_price_krw: units::format_fixed(eth_price, 0),
            kimchi_premium_percent: units::format_percent(kimchi_premium, DEFAULT_PRECISION),
            apr_percent: units::format_percent(apr, DEFAULT_PRECISION),
            utilization_percent: units::format_percent(utilization, DEFAULT_PRECISION),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use rust_decimal::dec;
    use tokio::sync::Barrier;

    use super::*;
    use crate::error::Error;

    const WAD: u128 = 1_000_000_000_000_000_000;

    /// In-memory market. `None` reads fail with a revert.
    struct MockMarket {
        state: MarketState,
        price: Option<U256>,
        premium: Option<U256>,
        market_reads: AtomicUsize,
        barrier: Option<Barrier>,
    }

    impl MockMarket {
        fn new(total_supply_assets: u128, total_borrow_assets: u128) -> Self {
            Self {
                state: MarketState {
                    total_supply_assets,
                    total_borrow_assets,
                    ..Default::default()
                },
                // 1 ETH = 4,566,000 KRW
                price: Some(U256::from(219_010_074_463u64)),
                // 4.51%
                premium: Some(U256::from(45_100_000_000_000_000u64)),
                market_reads: AtomicUsize::new(0),
                barrier: None,
            }
        }
    }

    fn reverted(message: &str) -> Error {
        Error::Revert {
            code: 3,
            message: message.into(),
            data: None,
        }
    }

    impl MarketReader for MockMarket {
        async fn market_state(&self) -> Result<MarketState> {
            self.market_reads.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            Ok(self.state)
        }

        async fn oracle_price(&self) -> Result<U256> {
            self.price.ok_or_else(|| reverted("price"))
        }

        async fn kimchi_premium_raw(&self) -> Result<U256> {
            self.premium.ok_or_else(|| reverted("kimchiPremium"))
        }
    }

    #[tokio::test]
    async fn test_apr_and_utilization() {
        let market = MockMarket::new(1000 * WAD, 500 * WAD);
        assert_eq!(market.apr().await.unwrap(), dec!(0.5));
        assert_eq!(market.utilization().await.unwrap(), dec!(0.5));

        let market = MockMarket::new(1000, 500);
        assert_eq!(market.apr().await.unwrap(), dec!(0.5));
        assert_eq!(market.utilization().await.unwrap(), dec!(0.5));
    }

    #[tokio::test]
    async fn test_empty_market_has_zero_rates() {
        let market = MockMarket::new(0, 0);
        assert_eq!(market.apr().await.unwrap(), Decimal::ZERO);
        assert_eq!(market.utilization().await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_stats() {
        let market = MockMarket::new(1000 * WAD, 500 * WAD);
        let stats = market.stats().await.unwrap();
        assert_eq!(
            stats,
            MarketStats {
                total_supply: "1000.00".into(),
                total_borrow: "500.00".into(),
                eth_price_krw: "4566000".into(),
                kimchi_premium_percent: "4.51".into(),
                apr_percent: "50.00".into(),
                utilization_percent: "50.00".into(),
            }
        );
        // totals, APR and utilization each read the market
        assert_eq!(market.market_reads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stats_serializes_camel_case() {
        let stats = MockMarket::new(1000 * WAD, 0).stats().await.unwrap();
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalSupply"], "1000.00");
        assert_eq!(value["ethPriceKrw"], "4566000");
        assert_eq!(value["utilizationPercent"], "0.00");
    }

    #[tokio::test]
    async fn test_stats_fails_when_premium_fails() {
        let mut market = MockMarket::new(1000 * WAD, 500 * WAD);
        market.premium = None;

        match market.stats().await {
            Err(Error::Revert { message, .. }) => assert_eq!(message, "kimchiPremium"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stats_fails_on_zero_price() {
        let mut market = MockMarket::new(1000 * WAD, 500 * WAD);
        market.price = Some(U256::ZERO);

        let err = market.stats().await.unwrap_err();
        assert!(err.is_division_by_zero());
    }

    #[tokio::test]
    async fn test_stats_reads_concurrently() {
        // the three market reads only get past the barrier together
        let mut market = MockMarket::new(1000 * WAD, 500 * WAD);
        market.barrier = Some(Barrier::new(3));

        let stats = tokio::time::timeout(Duration::from_secs(5), market.stats())
            .await
            .expect("market reads were not issued concurrently")
            .unwrap();
        assert_eq!(stats.utilization_percent, "50.00");
    }

    #[tokio::test]
    async fn test_custom_liquidation_active() {
        let mut market = MockMarket::new(1000 * WAD, 500 * WAD);
        assert!(market.custom_liquidation_active().await.unwrap());

        // 2.99%
        market.premium = Some(U256::from(29_900_000_000_000_000u64));
        assert!(!market.custom_liquidation_active().await.unwrap());

        // exactly 3%
        market.premium = Some(U256::from(30_000_000_000_000_000u64));
        assert!(market.custom_liquidation_active().await.unwrap());
    }
}
