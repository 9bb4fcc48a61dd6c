use binance_sheets_sdk::{CurrentPrices, Options, PriceLookup};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let prices = CurrentPrices::new(Options::from_env()?)?;
    println!("Current prices (cache TTL: {}s)", prices.options().cache_ttl);
    println!("-------------------------------------------");

    // First run hits the exchange
    let start = Instant::now();
    let lookup = prices.run(None).await?;
    let api_latency = start.elapsed();

    if let PriceLookup::Table(table) = &lookup {
        println!("{:<12} {}", table.header()[0], table.header()[1]);
        for row in table.rows().iter().take(10) {
            println!("{:<12} {}", row.symbol(), row.price());
        }
        println!("... {} symbols", table.len());
    }

    // Second run is served from the cache
    let start = Instant::now();
    match prices.run(Some("BTCUSDT")).await? {
        PriceLookup::Price(price) => println!("\nBTCUSDT: {}", price),
        PriceLookup::NotFound => println!("\nBTCUSDT is not listed"),
        PriceLookup::Table(_) => {}
    }
    let cached_latency = start.elapsed();

    let metrics = prices.metrics().await;
    println!("-------------------------------------------");
    println!("- Exchange latency: {:?}", api_latency);
    println!("- Cached latency:   {:?}", cached_latency);
    println!(
        "- Cache hits/misses: {}/{}",
        metrics.cache_hits, metrics.cache_misses
    );

    Ok(())
}
