//! Morpho Blue market integration.
//!
//! This module provides a client for the UPKRW/UPETH Morpho market deployed on
//! Giwa Sepolia: UPETH is lent and borrowed, UPKRW is posted as collateral.
//!
//! # Overview
//!
//! - Reads: market totals, oracle price, kimchi premium, positions. See
//!   [`MarketReader`] for the aggregated [`MarketStats`] snapshot.
//! - Writes: supply, supply collateral, borrow, repay and the custom
//!   liquidation. Writes that spend tokens approve Morpho first and wait for
//!   the approval to be confirmed before submitting the dependent call.
//!
//! Accounting, interest accrual and liquidation eligibility are enforced by
//! the contract, not by this client.
//!
//! # Examples
//!
//! ## Market snapshot
//!
//! ```no_run
//! use giwasdk::giwa::morpho::{self, MarketReader};
//!
//! # async fn example() -> giwasdk::Result<()> {
//! let client = morpho::Client::sepolia().await?;
//! let stats = client.stats().await?;
//!
//! println!("Utilization: {}%", stats.utilization_percent);
//! println!("ETH price: {} KRW", stats.eth_price_krw);
//! # Ok(())
//! # }
//! ```
//!
//! ## Supply
//!
//! ```no_run
//! use giwasdk::{Decimal, config, giwa::morpho};
//!
//! # async fn example() -> giwasdk::Result<()> {
//! let signer = config::signer_from_env()?;
//! let client = morpho::Client::sepolia_with_signer(signer).await?;
//!
//! let tx_hash = client.supply(Decimal::ONE_HUNDRED).await?;
//! println!("supplied in {tx_hash}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, Bytes, FixedBytes, TxHash, U256, keccak256},
    providers::PendingTransactionBuilder,
    signers::local::PrivateKeySigner,
    sol_types::SolValue,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::time::timeout;

use crate::{
    config::{GIWA_SEPOLIA, NetworkConfig},
    error::{Error, Result},
    giwa::{
        DynProvider, IERC20, Provider,
        morpho::contracts::{
            IMorpho::{self, IMorphoInstance},
            IOracle::{self, IOracleInstance},
            Market, MarketParams,
        },
    },
    units::{self, DEFAULT_DECIMALS},
};

pub mod contracts;
mod liquidation;
mod stats;

pub use liquidation::{CUSTOM_LIQUIDATION_THRESHOLD, is_custom_liquidation_active};
pub use stats::{MarketReader, MarketStats};

/// Morpho market identifier.
///
/// A 32-byte unique identifier for a Morpho Blue market.
pub type MarketId = FixedBytes<32>;

/// Default time to wait for a transaction receipt.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

impl MarketParams {
    /// Morpho's market id: `keccak256(abi.encode(marketParams))`.
    #[must_use]
    pub fn id(&self) -> MarketId {
        keccak256(self.abi_encode())
    }
}

/// Market totals as returned by `Morpho.market(id)`.
///
/// Amounts are in base units (18 decimals). The state is read fresh on every
/// call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketState {
    pub total_supply_assets: u128,
    pub total_supply_shares: u128,
    pub total_borrow_assets: u128,
    pub total_borrow_shares: u128,
    /// Unix timestamp of the last interest accrual
    pub last_update: u64,
    /// Protocol fee, WAD scaled
    pub fee: u128,
}

impl MarketState {
    /// Borrowed over supplied assets, zero for an empty market.
    pub fn utilization(&self) -> Result<Decimal> {
        units::utilization(self.total_borrow_assets, self.total_supply_assets)
    }

    /// Protocol fee as a fraction (0.1 = 10%).
    pub fn fee_rate(&self) -> Result<Decimal> {
        units::scale_to_decimal(U256::from(self.fee), DEFAULT_DECIMALS)
    }

    /// Time of the last interest accrual.
    #[must_use]
    pub fn last_update_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.last_update).ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
    }
}

impl TryFrom<Market> for MarketState {
    type Error = Error;

    fn try_from(market: Market) -> Result<Self> {
        let last_update = u64::try_from(market.lastUpdate).map_err(|_| {
            Error::Decode(format!("lastUpdate {} is not a timestamp", market.lastUpdate))
        })?;

        Ok(Self {
            total_supply_assets: market.totalSupplyAssets,
            total_supply_shares: market.totalSupplyShares,
            total_borrow_assets: market.totalBorrowAssets,
            total_borrow_shares: market.totalBorrowShares,
            last_update,
            fee: market.fee,
        })
    }
}

/// A user's position in the market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Supply shares held
    pub supply_shares: U256,
    /// Borrow shares owed
    pub borrow_shares: u128,
    /// Collateral posted, in base units
    pub collateral: u128,
}

/// Wallet balances of the two market tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balances {
    /// UPETH
    pub loan: Decimal,
    /// UPKRW
    pub collateral: Decimal,
}

/// Client for the configured Morpho market.
///
/// Reads work with any provider. Writes need a provider that signs and the
/// address of that signer, set by the `*_with_signer` constructors or
/// [`Client::with_account`].
///
/// # Example
///
/// ```no_run
/// use giwasdk::giwa::morpho::{self, MarketReader};
///
/// # async fn example() -> giwasdk::Result<()> {
/// let client = morpho::Client::sepolia().await?;
/// let premium = client.kimchi_premium().await?;
/// println!("Kimchi premium: {:.2}%", premium * giwasdk::Decimal::ONE_HUNDRED);
/// # Ok(())
/// # }
/// ```
pub struct Client<P>
where
    P: Provider,
{
    provider: P,
    network: NetworkConfig,
    account: Option<Address>,
    confirmation_timeout: Option<Duration>,
}

impl Client<DynProvider> {
    /// Creates a read-only client for Giwa Sepolia.
    pub async fn sepolia() -> Result<Self> {
        let provider = DynProvider::new(super::sepolia().await?);
        Ok(Self::new(provider, GIWA_SEPOLIA))
    }

    /// Creates a read-only client with a custom RPC URL.
    pub async fn sepolia_with_url(url: &str) -> Result<Self> {
        let provider = DynProvider::new(super::sepolia_with_url(url).await?);
        Ok(Self::new(provider, GIWA_SEPOLIA))
    }

    /// Creates a client for Giwa Sepolia that signs with `signer`.
    pub async fn sepolia_with_signer(signer: PrivateKeySigner) -> Result<Self> {
        Self::sepolia_with_signer_and_url(GIWA_SEPOLIA.rpc_url, signer).await
    }

    /// Creates a client with a custom RPC URL that signs with `signer`.
    pub async fn sepolia_with_signer_and_url(url: &str, signer: PrivateKeySigner) -> Result<Self> {
        let account = signer.address();
        let provider = DynProvider::new(super::sepolia_with_signer_and_url(url, signer).await?);
        Ok(Self::new(provider, GIWA_SEPOLIA).with_account(account))
    }
}

impl<P> Client<P>
where
    P: Provider + Clone,
{
    /// Creates a new client over an existing provider.
    pub fn new(provider: P, network: NetworkConfig) -> Self {
        Self {
            provider,
            network,
            account: None,
            confirmation_timeout: Some(DEFAULT_CONFIRMATION_TIMEOUT),
        }
    }

    /// Sets the account writes are made on behalf of.
    ///
    /// The provider must be able to sign for it.
    #[must_use]
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    /// Sets how long to wait for each transaction receipt. `None` waits
    /// forever.
    #[must_use]
    pub fn with_confirmation_timeout(mut self, limit: Option<Duration>) -> Self {
        self.confirmation_timeout = limit;
        self
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Returns the signing account.
    pub fn account(&self) -> Result<Address> {
        self.account
            .ok_or_else(|| Error::Config("client has no signing account".into()))
    }

    /// Creates a Morpho contract instance.
    ///
    /// Use this to call Morpho contract methods directly.
    pub fn morpho(&self) -> IMorphoInstance<P> {
        IMorpho::new(self.network.morpho, self.provider.clone())
    }

    /// Creates an oracle contract instance.
    pub fn oracle(&self) -> IOracleInstance<P> {
        IOracle::new(self.network.oracle, self.provider.clone())
    }

    /// Reads the market params registered on-chain for the configured id.
    pub async fn market_params_onchain(&self) -> Result<MarketParams> {
        let params = self
            .morpho()
            .idToMarketParams(self.network.market_id)
            .call()
            .await?;
        Ok(params)
    }

    /// Reads the oracle's custom metric (18 decimals).
    pub async fn custom_metric(&self) -> Result<Decimal> {
        let metric = self.oracle().customMetric().call().await?;
        units::scale_to_decimal(metric, DEFAULT_DECIMALS)
    }

    /// Reads `user`'s position.
    pub async fn position(&self, user: Address) -> Result<Position> {
        let position = self
            .morpho()
            .position(self.network.market_id, user)
            .call()
            .await?;
        Ok(Position {
            supply_shares: position.supplyShares,
            borrow_shares: position.borrowShares,
            collateral: position.collateral,
        })
    }

    /// Reads `user`'s wallet balances of both market tokens.
    pub async fn balances(&self, user: Address) -> Result<Balances> {
        let loan = IERC20::new(self.network.loan_token, self.provider.clone());
        let collateral = IERC20::new(self.network.collateral_token, self.provider.clone());
        let (loan, collateral) = futures::try_join!(
            async { Ok::<_, Error>(loan.balanceOf(user).call().await?) },
            async { Ok::<_, Error>(collateral.balanceOf(user).call().await?) },
        )?;

        Ok(Balances {
            loan: units::scale_to_decimal(loan, DEFAULT_DECIMALS)?,
            collateral: units::scale_to_decimal(collateral, DEFAULT_DECIMALS)?,
        })
    }

    /// Supplies `amount` UPETH to earn interest.
    ///
    /// Approves Morpho, waits for the approval, then supplies. Returns the
    /// hash of the confirmed supply.
    pub async fn supply(&self, amount: Decimal) -> Result<TxHash> {
        let account = self.account()?;
        let assets = units::to_wei(amount, DEFAULT_DECIMALS)?;

        self.approve(self.network.loan_token, assets).await?;
        let pending = self
            .morpho()
            .supply(
                self.network.market_params(),
                assets,
                U256::ZERO,
                account,
                Bytes::new(),
            )
            .send()
            .await?;
        self.confirm("supply", pending).await
    }

    /// Posts `amount` UPKRW as collateral.
    pub async fn supply_collateral(&self, amount: Decimal) -> Result<TxHash> {
        let account = self.account()?;
        let assets = units::to_wei(amount, DEFAULT_DECIMALS)?;

        self.approve(self.network.collateral_token, assets).await?;
        let pending = self
            .morpho()
            .supplyCollateral(self.network.market_params(), assets, account, Bytes::new())
            .send()
            .await?;
        self.confirm("supplyCollateral", pending).await
    }

    /// Borrows `amount` UPETH against the posted collateral.
    pub async fn borrow(&self, amount: Decimal) -> Result<TxHash> {
        let account = self.account()?;
        let assets = units::to_wei(amount, DEFAULT_DECIMALS)?;

        let pending = self
            .morpho()
            .borrow(
                self.network.market_params(),
                assets,
                U256::ZERO,
                account,
                account,
            )
            .send()
            .await?;
        self.confirm("borrow", pending).await
    }

    /// Repays `amount` UPETH of debt.
    pub async fn repay(&self, amount: Decimal) -> Result<TxHash> {
        let account = self.account()?;
        let assets = units::to_wei(amount, DEFAULT_DECIMALS)?;

        self.approve(self.network.loan_token, assets).await?;
        let pending = self
            .morpho()
            .repay(
                self.network.market_params(),
                assets,
                U256::ZERO,
                account,
                Bytes::new(),
            )
            .send()
            .await?;
        self.confirm("repay", pending).await
    }

    /// Liquidates `borrower` through the kimchi premium pathway, seizing
    /// `seized_collateral` UPKRW.
    ///
    /// The contract decides eligibility. Check
    /// [`MarketReader::custom_liquidation_active`] first to avoid submitting a
    /// transaction that is bound to revert.
    pub async fn custom_liquidate(
        &self,
        borrower: Address,
        seized_collateral: Decimal,
    ) -> Result<TxHash> {
        self.account()?;
        let seized = units::to_wei(seized_collateral, DEFAULT_DECIMALS)?;

        let pending = self
            .morpho()
            .customLiquidate(
                self.network.market_params(),
                borrower,
                seized,
                U256::ZERO,
                Bytes::new(),
            )
            .send()
            .await?;
        self.confirm("customLiquidate", pending).await
    }

    /// Allows Morpho to pull `assets` of `token`, and waits for confirmation.
    async fn approve(&self, token: Address, assets: U256) -> Result<TxHash> {
        let pending = IERC20::new(token, self.provider.clone())
            .approve(self.network.morpho, assets)
            .send()
            .await?;
        self.confirm("approve", pending).await
    }

    /// Waits for `pending` to be mined and checks its status.
    async fn confirm(
        &self,
        action: &str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> Result<TxHash> {
        let tx_hash = *pending.tx_hash();
        log::debug!("{action} submitted: {tx_hash}");

        let receipt = match self.confirmation_timeout {
            Some(limit) => timeout(limit, pending.get_receipt()).await??,
            None => pending.get_receipt().await?,
        };

        if !ReceiptResponse::status(&receipt) {
            log::warn!("{action} reverted: {tx_hash}");
            return Err(Error::Reverted { tx_hash });
        }

        log::info!(
            "{action} confirmed in block {}: {tx_hash}",
            ReceiptResponse::block_number(&receipt).unwrap_or_default()
        );
        Ok(tx_hash)
    }
}

impl<P> MarketReader for Client<P>
where
    P: Provider + Clone,
{
    async fn market_state(&self) -> Result<MarketState> {
        let market = self.morpho().market(self.network.market_id).call().await?;
        market.try_into()
    }

    async fn oracle_price(&self) -> Result<U256> {
        Ok(self.oracle().price().call().await?)
    }

    async fn kimchi_premium_raw(&self) -> Result<U256> {
        Ok(self.oracle().kimchiPremium().call().await?)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn market(last_update: u128) -> Market {
        Market {
            totalSupplyAssets: 1_000_000_000_000_000_000_000,
            totalSupplyShares: 1_000_000_000_000_000_000_000_000_000,
            totalBorrowAssets: 250_000_000_000_000_000_000,
            totalBorrowShares: 250_000_000_000_000_000_000_000_000,
            lastUpdate: last_update,
            fee: 100_000_000_000_000_000,
        }
    }

    #[test]
    fn test_market_state_from_market() {
        let state = MarketState::try_from(market(1_735_689_600)).unwrap();
        assert_eq!(state.total_supply_assets, 1_000_000_000_000_000_000_000);
        assert_eq!(state.utilization().unwrap(), dec!(0.25));
        assert_eq!(state.fee_rate().unwrap(), dec!(0.1));
        assert_eq!(
            state.last_update_at().unwrap().to_rfc3339(),
            "2025-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_market_state_rejects_bad_timestamp() {
        let err = MarketState::try_from(market(u128::MAX)).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_empty_market() {
        let state = MarketState::default();
        assert_eq!(state.utilization().unwrap(), Decimal::ZERO);
    }
}
