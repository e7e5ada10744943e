use clap::Parser;
use giwasdk::{
    Decimal, config,
    giwa::morpho::{self, MarketReader},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// UPETH to repay
    #[arg(short, long, default_value = "1.5")]
    amount: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let _ = dotenvy::dotenv();
    let signer = config::signer_from_env()?;

    let _ = simple_logger::init_with_level(log::Level::Info);

    let account = signer.address();
    let client = morpho::Client::sepolia_with_signer(signer).await?;

    let position = client.position(account).await?;
    println!("Borrow shares before: {}", position.borrow_shares);

    println!("Repaying {} UPETH...", args.amount);
    let tx_hash = client.repay(args.amount).await?;
    println!("Repay tx: {}", config::GIWA_SEPOLIA.tx_url(tx_hash)?);

    let position = client.position(account).await?;
    println!("Borrow shares after: {}", position.borrow_shares);

    println!("\nMarket stats:");
    println!("{:#?}", client.stats().await?);

    Ok(())
}
