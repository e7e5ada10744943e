//! Rust SDK for the UPKRW/UPETH Morpho market on Giwa Sepolia.
//!
//! The market is a Morpho-Blue-style lending pool: UPETH is supplied and
//! borrowed, UPKRW is posted as collateral, and a custom oracle publishes the
//! ETH/KRW price together with the "kimchi premium". Liquidations are opened
//! through a custom pathway once the premium reaches 3%.
//!
//! All accounting happens in the deployed contracts. This crate encodes calls,
//! decodes results and converts fixed-point amounts for display.
//!
//! # Modules
//!
//! - [`giwa`]: providers and contract clients, including [`giwa::morpho`].
//! - [`units`]: fixed-point conversions between base units and [`Decimal`].
//! - [`config`]: addresses and parameters of the deployment.
//! - [`error`]: the crate's [`Error`] type.
//!
//! # Example
//!
//! ```no_run
//! use giwasdk::giwa::morpho::{self, MarketReader};
//!
//! # async fn example() -> giwasdk::Result<()> {
//! let client = morpho::Client::sepolia().await?;
//! let stats = client.stats().await?;
//! println!("{stats:#?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod giwa;
pub mod units;

pub use alloy::{
    primitives::{Address, TxHash, U256, address},
    signers::local::PrivateKeySigner,
};
pub use error::{Error, Result};
pub use rust_decimal::Decimal;
