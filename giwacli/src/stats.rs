//! Market statistics command.

use std::io::{Write, stdout};

use clap::Args;
use giwasdk::{
    giwa::morpho::{CUSTOM_LIQUIDATION_THRESHOLD, MarketReader, is_custom_liquidation_active},
    units,
};

use crate::{Run, RpcArgs, utils::read_client};

/// Prints a snapshot of the market.
///
/// # Example
///
/// ```bash
/// giwacli stats
/// giwacli stats --json
/// ```
#[derive(Args)]
pub struct StatsCmd {
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// Print the snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Run for StatsCmd {
    async fn run(self) -> anyhow::Result<()> {
        let client = read_client(&self.rpc).await?;
        let stats = client.stats().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        let mut writer = tabwriter::TabWriter::new(stdout());
        writeln!(&mut writer, "total supply\t{} UPETH", stats.total_supply)?;
        writeln!(&mut writer, "total borrow\t{} UPETH", stats.total_borrow)?;
        writeln!(&mut writer, "utilization\t{}%", stats.utilization_percent)?;
        writeln!(&mut writer, "APR\t{}%", stats.apr_percent)?;
        writeln!(&mut writer, "ETH price\t{} KRW", stats.eth_price_krw)?;
        writeln!(&mut writer, "kimchi premium\t{}%", stats.kimchi_premium_percent)?;
        writer.flush()?;

        let premium = client.kimchi_premium().await?;
        if is_custom_liquidation_active(premium) {
            println!(
                "\nKimchi premium {}% has reached {}%: custom liquidation active.",
                units::format_percent(premium, 4),
                units::format_percent(CUSTOM_LIQUIDATION_THRESHOLD, 0)
            );
        } else {
            println!("\nKimchi premium below threshold. No custom liquidation.");
        }

        Ok(())
    }
}
