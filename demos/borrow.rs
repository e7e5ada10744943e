use clap::Parser;
use giwasdk::{
    Decimal, config,
    giwa::morpho::{self, MarketReader},
    units,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// UPKRW to post as collateral
    #[arg(short, long, default_value = "10000000")]
    collateral: Decimal,
    /// UPETH to borrow
    #[arg(short, long, default_value = "1.5")]
    amount: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let _ = dotenvy::dotenv();
    let signer = config::signer_from_env()?;

    let _ = simple_logger::init_with_level(log::Level::Info);

    println!("=== Borrow UPETH Example ===\n");
    println!("Wallet address: {}", signer.address());

    let client = morpho::Client::sepolia_with_signer(signer).await?;

    let eth_price = client.eth_price_krw().await?;
    println!("\n1 ETH = {} KRW", units::format_fixed(eth_price, 0));

    // max borrow = collateral / price * lltv
    let lltv = units::scale_to_decimal(config::GIWA_SEPOLIA.lltv, units::DEFAULT_DECIMALS)?;
    if !eth_price.is_zero() {
        let max_borrow = args.collateral / eth_price * lltv;
        println!(
            "Max borrow for {} UPKRW: {} UPETH",
            args.collateral,
            units::format_fixed(max_borrow, 4)
        );
    }

    println!("\n[1/2] Supplying {} UPKRW as collateral...", args.collateral);
    let tx_hash = client.supply_collateral(args.collateral).await?;
    println!("Collateral tx: {}", config::GIWA_SEPOLIA.tx_url(tx_hash)?);

    println!("\n[2/2] Borrowing {} UPETH...", args.amount);
    let tx_hash = client.borrow(args.amount).await?;
    println!("Borrow tx: {}", config::GIWA_SEPOLIA.tx_url(tx_hash)?);

    println!("\nMarket stats:");
    println!("{:#?}", client.stats().await?);

    println!("\nDone! You have borrowed {} UPETH.", args.amount);
    println!("Remember to repay before liquidation!");

    Ok(())
}
