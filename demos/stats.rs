use clap::Parser;
use giwasdk::{
    giwa::morpho::{self, MarketReader, is_custom_liquidation_active},
    units,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// RPC url
    #[arg(short, long, default_value = giwasdk::config::GIWA_SEPOLIA.rpc_url)]
    rpc_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = simple_logger::init_with_level(log::Level::Info);
    let args = Cli::parse();

    let client = morpho::Client::sepolia_with_url(&args.rpc_url).await?;

    println!("=== Market Statistics ===\n");

    let stats = client.stats().await?;
    println!("Total Supply: {} UPETH", stats.total_supply);
    println!("Total Borrow: {} UPETH", stats.total_borrow);
    println!("Utilization: {} %", stats.utilization_percent);
    println!("Current APR: {} %", stats.apr_percent);
    println!("\nETH Price: {} KRW", stats.eth_price_krw);
    println!("Kimchi Premium: {} %", stats.kimchi_premium_percent);

    println!("\n=== Detailed Info ===\n");

    let eth_price = client.eth_price_krw().await?;
    println!("1 ETH = {} KRW", units::format_fixed(eth_price, 0));

    let kimchi = client.kimchi_premium().await?;
    println!("Kimchi Premium: {} %", units::format_percent(kimchi, 4));

    let apr = client.apr().await?;
    println!("APR: {} %", units::format_percent(apr, 4));

    let metric = client.custom_metric().await?;
    println!("Custom metric: {metric}");

    let market = client.market_state().await?;
    if let Some(last_update) = market.last_update_at() {
        println!("Interest last accrued at {last_update}");
    }

    println!("\n=== Liquidation Status ===");
    if is_custom_liquidation_active(kimchi) {
        println!("ALERT: Kimchi premium above 3%! Custom liquidation active.");
    } else {
        println!("Kimchi premium below threshold. No custom liquidation.");
    }

    Ok(())
}
