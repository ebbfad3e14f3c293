//! price-client CLI: ask the price service for a single quote.

use clap::Parser;
use price_client::{today, PriceClient, VehicleForm, DEFAULT_URL};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "price-client")]
#[command(about = "Get a used-car price estimate from the price service")]
#[command(version)]
struct Cli {
    /// Prediction endpoint
    #[arg(long, env = "CAR_PRICE_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[command(flatten)]
    vehicle: VehicleForm,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = PriceClient::new(&cli.url, Duration::from_secs(cli.timeout))?;
    let record = cli.vehicle.to_record(today());

    match client.quote(&record).await {
        Ok(price) => println!("The predicted price is: {:.2}", price),
        Err(e) => println!("Error: {}", e),
    }

    Ok(())
}
