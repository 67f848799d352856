//! Actual-vs-predicted scatter charts

use anyhow::{anyhow, ensure, Result};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Render test-set actual and predicted prices as two scatter series
/// against date, with a legend, and write the chart as a PNG.
pub fn render_predictions(
    path: &Path,
    title: &str,
    actual: &[(NaiveDate, f64)],
    predicted: &[(NaiveDate, f64)],
) -> Result<()> {
    ensure!(!actual.is_empty(), "Nothing to plot: no actual prices");

    let points = actual.iter().chain(predicted.iter());
    let (mut min_date, mut max_date) = (actual[0].0, actual[0].0);
    let (mut min_price, mut max_price) = (f64::INFINITY, f64::NEG_INFINITY);

    for &(date, price) in points {
        min_date = min_date.min(date);
        max_date = max_date.max(date);
        min_price = min_price.min(price);
        max_price = max_price.max(price);
    }

    let pad = ((max_price - min_price) * 0.05).max(1.0);
    let x_range = (min_date - Duration::days(1))..(max_date + Duration::days(1));
    let y_range = (min_price - pad)..(max_price + pad);

    let root = BitMapBackend::new(path, (1400, 700)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill chart background: {}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price")
        .draw()
        .map_err(|e| anyhow!("Failed to draw chart mesh: {}", e))?;

    chart
        .draw_series(
            actual
                .iter()
                .map(|&(d, v)| Circle::new((d, v), 3, BLUE.filled())),
        )
        .map_err(|e| anyhow!("Failed to draw actual series: {}", e))?
        .label("Actual Prices")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, BLUE.filled()));

    chart
        .draw_series(
            predicted
                .iter()
                .map(|&(d, v)| Circle::new((d, v), 3, RED.filled())),
        )
        .map_err(|e| anyhow!("Failed to draw predicted series: {}", e))?
        .label("Predicted Prices")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow!("Failed to draw legend: {}", e))?;

    root.present()
        .map_err(|e| anyhow!("Failed to write chart to {}: {}", path.display(), e))?;

    info!("Wrote prediction chart to {}", path.display());
    Ok(())
}
