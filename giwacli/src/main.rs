mod actions;
mod morpho;
mod stats;
mod utils;

use clap::Args;
use clap::{Parser, Subcommand};
use enum_dispatch::enum_dispatch;
use giwasdk::config::{GIWA_SEPOLIA, PRIVATE_KEY_ENV};

use crate::actions::{BorrowCmd, LiquidateCmd, RepayCmd, SupplyCmd, SupplyCollateralCmd};
use crate::morpho::PositionCmd;
use crate::stats::StatsCmd;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[enum_dispatch]
trait Run {
    async fn run(self) -> anyhow::Result<()>;
}

#[derive(Subcommand)]
#[enum_dispatch(Run)]
enum Commands {
    /// Market statistics: totals, price, premium, APR and utilization
    Stats(StatsCmd),
    /// Query an address' position and wallet balances
    Position(PositionCmd),
    /// Supply UPETH to earn interest
    Supply(SupplyCmd),
    /// Post UPKRW as collateral
    SupplyCollateral(SupplyCollateralCmd),
    /// Borrow UPETH against posted collateral
    Borrow(BorrowCmd),
    /// Repay borrowed UPETH
    Repay(RepayCmd),
    /// Liquidate a borrower through the kimchi premium pathway
    Liquidate(LiquidateCmd),
}

/// RPC connection arguments.
#[derive(Args)]
pub struct RpcArgs {
    /// RPC endpoint
    #[arg(long, default_value = GIWA_SEPOLIA.rpc_url)]
    pub rpc_url: String,
}

/// Signing key arguments. A private key wins over a keystore.
#[derive(Args, derive_more::Deref)]
pub struct SignerArgs {
    #[deref]
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// Hex encoded private key.
    #[arg(long, env = PRIVATE_KEY_ENV, hide_env_values = true)]
    pub private_key: Option<String>,
    /// Foundry keystore.
    #[arg(long)]
    pub keystore: Option<String>,
    /// Keystore password. Otherwise it'll be prompted.
    #[arg(long)]
    pub password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    let _ = simple_logger::init_with_level(level);

    args.command.run().await
}
