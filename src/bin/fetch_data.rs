//! Fetch historical daily bars from Yahoo Finance
//!
//! Usage: cargo run --bin fetch_data -- --symbol AAPL --start 2020-01-01 --end 2024-05-15 --output aapl.csv

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use stock_forecast::api::{Symbol, YahooClient};
use stock_forecast::data::save_bars_csv;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch daily stock bars from Yahoo Finance")]
struct Args {
    /// Stock ticker symbol (e.g., AAPL, MSFT)
    #[arg(short, long, default_value = "AAPL")]
    symbol: String,

    /// First date of the range (inclusive)
    #[arg(long, default_value = "2020-01-01")]
    start: NaiveDate,

    /// Last date of the range (inclusive)
    #[arg(long, default_value = "2024-05-15")]
    end: NaiveDate,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stock_forecast=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let client = YahooClient::new();
    let symbol = Symbol::new(&args.symbol);

    let bars = client.get_daily_bars(&symbol, args.start, args.end).await?;

    println!("\nFirst 5 bars:");
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    println!("{}", "-".repeat(70));

    for bar in bars.iter().take(5) {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }

    println!("\n...\n");
    println!("Last 5 bars:");

    for bar in bars.iter().rev().take(5).rev() {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }

    if let Some(output) = &args.output {
        save_bars_csv(&bars, output)?;
        info!("Saved {} bars to {}", bars.len(), output.display());
    }

    println!("\nStatistics:");
    println!("-----------");

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let avg_price = closes.iter().sum::<f64>() / closes.len() as f64;
    let min_price = closes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_price = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg_volume = volumes.iter().sum::<f64>() / volumes.len() as f64;

    println!("Trading days:  {}", bars.len());
    println!("Average Close: ${:.2}", avg_price);
    println!("Min Close:     ${:.2}", min_price);
    println!("Max Close:     ${:.2}", max_price);
    println!(
        "Close Range:   ${:.2} ({:.2}%)",
        max_price - min_price,
        (max_price - min_price) / min_price * 100.0
    );
    println!("Avg Volume:    {:.0}", avg_volume);

    Ok(())
}
