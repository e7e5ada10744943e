use clap::Parser;
use giwasdk::{
    Address, Decimal, config,
    giwa::morpho::{self, MarketReader, is_custom_liquidation_active},
    units,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Borrower to liquidate
    #[arg(short, long)]
    borrower: Address,
    /// UPKRW collateral to seize
    #[arg(short, long, default_value = "1000")]
    seize: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let _ = dotenvy::dotenv();
    let signer = config::signer_from_env()?;

    let _ = simple_logger::init_with_level(log::Level::Info);

    println!("=== Custom Liquidate Example ===\n");
    println!("Liquidator address: {}", signer.address());

    let client = morpho::Client::sepolia_with_signer(signer).await?;

    let kimchi_premium = client.kimchi_premium().await?;
    println!("\nKimchi Premium: {}%", units::format_percent(kimchi_premium, 2));

    if !is_custom_liquidation_active(kimchi_premium) {
        println!("Kimchi premium is below 3% threshold.");
        println!("Cannot liquidate based on kimchi premium condition.");
        return Ok(());
    }

    println!("Kimchi premium is above 3%! Liquidation possible.");

    println!("\nLiquidating {}...", args.borrower);
    println!("Seizing {} UPKRW collateral...", args.seize);

    let tx_hash = client.custom_liquidate(args.borrower, args.seize).await?;
    println!("Liquidation tx: {}", config::GIWA_SEPOLIA.tx_url(tx_hash)?);

    println!("\nMarket stats after liquidation:");
    println!("{:#?}", client.stats().await?);

    Ok(())
}
