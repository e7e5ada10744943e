use clap::Parser;
use giwasdk::{
    Decimal, config,
    giwa::morpho::{self, MarketReader},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Amount of UPETH to supply
    #[arg(short, long, default_value = "100")]
    amount: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let _ = dotenvy::dotenv();
    let signer = config::signer_from_env()?;

    let _ = simple_logger::init_with_level(log::Level::Info);

    println!("=== Supply UPETH Example ===\n");
    println!("Wallet address: {}", signer.address());

    let client = morpho::Client::sepolia_with_signer(signer).await?;

    println!("\nMarket stats before:");
    println!("{:#?}", client.stats().await?);

    println!("\nSupplying {} UPETH...", args.amount);
    let tx_hash = client.supply(args.amount).await?;
    println!("Transaction: {}", config::GIWA_SEPOLIA.tx_url(tx_hash)?);

    println!("\nMarket stats after:");
    println!("{:#?}", client.stats().await?);

    println!("\nDone! You are now earning interest on your UPETH.");

    Ok(())
}
