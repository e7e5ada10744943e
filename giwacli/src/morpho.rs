//! Position query command.

use std::io::{Write, stdout};

use clap::Args;
use giwasdk::Address;

use crate::{Run, RpcArgs, utils::read_client};

/// Command to query a user's position in the market.
///
/// # Example
///
/// ```bash
/// giwacli position --user 0x1234567890abcdef1234567890abcdef12345678
/// ```
///
/// # Output
///
/// Displays a table with columns:
/// - `supply shares`: Amount of supply shares held
/// - `borrow shares`: Amount of borrow shares owed
/// - `collateral`: Collateral amount deposited, in base units
/// - `UPETH` / `UPKRW`: Wallet balances
#[derive(Args)]
pub struct PositionCmd {
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// Target user address.
    #[arg(short, long)]
    pub user: Address,
}

impl Run for PositionCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = read_client(&self.rpc).await?;
        let (position, balances) =
            tokio::try_join!(client.position(self.user), client.balances(self.user))?;

        let mut writer = tabwriter::TabWriter::new(stdout());

        writeln!(
            &mut writer,
            "supply shares\tborrow shares\tcollateral\tUPETH\tUPKRW"
        )?;
        writeln!(
            &mut writer,
            "{}\t{}\t{}\t{}\t{}",
            position.supply_shares,
            position.borrow_shares,
            position.collateral,
            balances.loan,
            balances.collateral
        )?;

        writer.flush()?;

        Ok(())
    }
}
