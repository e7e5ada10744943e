//! Market write commands.
//!
//! Each command loads the signer, submits the transaction(s) and waits for
//! confirmation. Commands that spend tokens approve Morpho first.
//!
//! ```bash
//! giwacli supply --amount 100
//! giwacli supply-collateral --amount 10000000
//! giwacli borrow --amount 1.5
//! giwacli repay --amount 1.5
//! giwacli liquidate --borrower 0x... --seize 1000
//! ```

use clap::Args;
use giwasdk::{
    Address, Decimal, TxHash,
    giwa::morpho::{MarketReader, is_custom_liquidation_active},
    units,
};

use crate::{Run, SignerArgs, utils::signing_client};

fn print_confirmed(action: &str, tx_hash: TxHash) {
    match giwasdk::config::GIWA_SEPOLIA.tx_url(tx_hash) {
        Ok(url) => println!("{action} confirmed: {url}"),
        Err(_) => println!("{action} confirmed: {tx_hash}"),
    }
}

/// Supply UPETH to earn interest.
#[derive(Args, derive_more::Deref)]
pub struct SupplyCmd {
    #[deref]
    #[command(flatten)]
    pub signer: SignerArgs,
    /// Amount of UPETH to supply.
    #[arg(long)]
    pub amount: Decimal,
}

impl Run for SupplyCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = signing_client(&self.signer).await?;
        let tx_hash = client.supply(self.amount).await?;
        print_confirmed("supply", tx_hash);
        Ok(())
    }
}

/// Post UPKRW as collateral.
#[derive(Args, derive_more::Deref)]
pub struct SupplyCollateralCmd {
    #[deref]
    #[command(flatten)]
    pub signer: SignerArgs,
    /// Amount of UPKRW to post.
    #[arg(long)]
    pub amount: Decimal,
}

impl Run for SupplyCollateralCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = signing_client(&self.signer).await?;
        let tx_hash = client.supply_collateral(self.amount).await?;
        print_confirmed("supplyCollateral", tx_hash);
        Ok(())
    }
}

/// Borrow UPETH.
#[derive(Args, derive_more::Deref)]
pub struct BorrowCmd {
    #[deref]
    #[command(flatten)]
    pub signer: SignerArgs,
    /// Amount of UPETH to borrow.
    #[arg(long)]
    pub amount: Decimal,
}

impl Run for BorrowCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = signing_client(&self.signer).await?;
        let tx_hash = client.borrow(self.amount).await?;
        print_confirmed("borrow", tx_hash);
        Ok(())
    }
}

/// Repay UPETH.
#[derive(Args, derive_more::Deref)]
pub struct RepayCmd {
    #[deref]
    #[command(flatten)]
    pub signer: SignerArgs,
    /// Amount of UPETH to repay.
    #[arg(long)]
    pub amount: Decimal,
}

impl Run for RepayCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = signing_client(&self.signer).await?;
        let tx_hash = client.repay(self.amount).await?;
        print_confirmed("repay", tx_hash);
        Ok(())
    }
}

/// Liquidate a borrower once the kimchi premium reaches 3%.
#[derive(Args, derive_more::Deref)]
pub struct LiquidateCmd {
    #[deref]
    #[command(flatten)]
    pub signer: SignerArgs,
    /// Borrower to liquidate.
    #[arg(long)]
    pub borrower: Address,
    /// UPKRW collateral to seize.
    #[arg(long)]
    pub seize: Decimal,
    /// Submit even if the premium is below the threshold.
    #[arg(long)]
    pub force: bool,
}

impl Run for LiquidateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = signing_client(&self.signer).await?;

        let premium = client.kimchi_premium().await?;
        println!("Kimchi premium: {}%", units::format_percent(premium, 2));
        if !is_custom_liquidation_active(premium) && !self.force {
            println!("Kimchi premium is below the 3% threshold, not liquidating.");
            return Ok(());
        }

        let tx_hash = client.custom_liquidate(self.borrower, self.seize).await?;
        print_confirmed("customLiquidate", tx_hash);
        Ok(())
    }
}
