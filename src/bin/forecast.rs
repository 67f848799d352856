//! End-to-end daily price forecast
//!
//! Usage: cargo run --bin forecast -- --symbol AAPL --start 2020-01-01 --end 2024-05-15

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use stock_forecast::api::{Symbol, YahooClient};
use stock_forecast::data::{load_bars_csv, DailyBar, Split};
use stock_forecast::features::FeatureEngine;
use stock_forecast::forecast::project_forward;
use stock_forecast::models::{ForestConfig, RandomForest};
use stock_forecast::plot::render_predictions;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a Random Forest on daily bars and forecast prices")]
struct Args {
    /// Stock ticker symbol
    #[arg(short, long, default_value = "AAPL")]
    symbol: String,

    /// First date of the range (inclusive)
    #[arg(long, default_value = "2020-01-01")]
    start: NaiveDate,

    /// Last date of the range (inclusive)
    #[arg(long, default_value = "2024-05-15")]
    end: NaiveDate,

    /// Read bars from a CSV written by fetch_data instead of fetching
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of trees
    #[arg(short, long, default_value = "100")]
    trees: usize,

    /// Seed for the train/test shuffle
    #[arg(long, default_value = "121123")]
    split_seed: u64,

    /// Seed for the forest
    #[arg(long, default_value = "123")]
    model_seed: u64,

    /// Test set ratio
    #[arg(long, default_value = "0.2")]
    test_ratio: f64,

    /// Split chronologically instead of shuffling (avoids training on
    /// rows that postdate the test set)
    #[arg(long)]
    chronological: bool,

    /// Calendar days to extrapolate past the last bar
    #[arg(long, default_value = "5")]
    horizon: usize,

    /// Output path for the actual-vs-predicted chart
    #[arg(long, default_value = "predictions.png")]
    chart: PathBuf,
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

    let bars: Vec<DailyBar> = match &args.input {
        Some(path) => {
            info!("Loading bars from {}", path.display());
            load_bars_csv(path)?
        }
        None => {
            info!(
                "Fetching {} from {} to {}",
                args.symbol, args.start, args.end
            );
            let client = YahooClient::new();
            let symbol = Symbol::new(&args.symbol);
            client.get_daily_bars(&symbol, args.start, args.end).await?
        }
    };

    println!("Fetched {} daily bars for {}\n", bars.len(), args.symbol);

    let engine = FeatureEngine::new();
    let dataset = engine.generate(&bars);

    println!(
        "Dataset: {} samples, {} features (first {} rows dropped by the 50-day window)",
        dataset.n_samples(),
        dataset.n_features(),
        engine.required_lookback()
    );

    let Split { train, test } = if args.chronological {
        dataset.train_test_split(args.test_ratio)
    } else {
        dataset.random_split(args.test_ratio, args.split_seed)
    };

    println!("Train set: {} samples", train.n_samples());
    println!("Test set:  {} samples\n", test.n_samples());

    let config = ForestConfig {
        n_trees: args.trees,
        seed: args.model_seed,
        ..Default::default()
    };

    info!("Training Random Forest with {} trees", args.trees);
    let mut forest = RandomForest::new(config);
    forest.fit(&train);

    let mse = forest.mse(&test);
    println!("Mean Squared Error: {}", mse);

    println!("\nFeature importance ranking:");
    for (name, importance) in forest.feature_importance_ranking() {
        println!("  {:12} {:.4}", name, importance);
    }

    let predictions = forest.predict(&test);
    let actual: Vec<(NaiveDate, f64)> = test
        .dates
        .iter()
        .copied()
        .zip(test.labels.iter().copied())
        .collect();
    let predicted: Vec<(NaiveDate, f64)> = test
        .dates
        .iter()
        .copied()
        .zip(predictions.iter().copied())
        .collect();

    let title = format!("{} - Actual vs Predicted Close", args.symbol);
    render_predictions(&args.chart, &title, &actual, &predicted)
        .with_context(|| format!("Failed to render chart to {}", args.chart.display()))?;

    println!("\nChart written to {}", args.chart.display());

    // All projected rows reuse the last bar, so every horizon day gets
    // the same predicted price.
    let future = project_forward(&bars, args.horizon)?;
    let future_predictions = forest.predict_rows(&future.rows);

    println!("\nFuture predicted prices:");
    for (date, price) in future.dates.iter().zip(future_predictions.iter()) {
        println!("{}: {}", date, price);
    }

    Ok(())
}
