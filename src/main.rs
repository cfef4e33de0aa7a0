//! Crop price forecasting CLI
//!
//! Reads price histories as JSON and prints forecasts or a correlation matrix.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crop_forecast::{
    config::Config,
    engine::{correlation_matrix, ForecastEngine},
    stats,
    types::{Category, Commodity, ForecastParameters, PriceSeries, TrendDirection},
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "crop-forecast")]
#[command(about = "Forecast crop prices from their history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "forecast.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast one commodity
    Forecast {
        /// JSON file with `[{"date": "2024-01-01", "price": 2000.0}, ...]`
        #[arg(long)]
        history: String,

        #[arg(long)]
        crop_id: String,

        /// Display name, defaults to the id
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "Cereals")]
        category: String,

        /// Catalog trend used when history is short (up, down, stable)
        #[arg(long, default_value = "stable")]
        trend: String,

        /// Catalog price used when history is empty
        #[arg(long, default_value = "0")]
        current_price: Decimal,

        #[arg(long, default_value = "14")]
        horizon: usize,

        #[arg(long, default_value = "0.5")]
        seasonal_weight: f64,

        #[arg(long, default_value = "0.5")]
        trend_weight: f64,

        /// Reference date for seasonality (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Pairwise correlation of several commodities
    Correlate {
        /// JSON file with `{"wheat": [2000.0, ...], "rice": [...]}`
        #[arg(long)]
        histories: String,
    },
}

#[derive(Serialize)]
struct ForecastOutput<'a> {
    commodity: &'a str,
    #[serde(flatten)]
    forecast: &'a crop_forecast::types::Forecast,
    expected_change_pct: f64,
    recommendation: crop_forecast::types::Recommendation,
    advice: &'static str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Forecast {
            history,
            crop_id,
            name,
            category,
            trend,
            current_price,
            horizon,
            seasonal_weight,
            trend_weight,
            as_of,
        } => {
            let commodity = Commodity {
                name: name.unwrap_or_else(|| crop_id.clone()),
                id: crop_id,
                category: Category::from(category.as_str()),
                current_price,
                trend: parse_trend(&trend)?,
            };
            let params = ForecastParameters {
                horizon_days: horizon,
                seasonal_weight,
                trend_weight,
            };
            run_forecast(config, &history, &commodity, &params, as_of).await
        }
        Commands::Correlate { histories } => run_correlate(&histories),
    }
}

fn parse_trend(label: &str) -> anyhow::Result<TrendDirection> {
    match label.to_lowercase().as_str() {
        "up" => Ok(TrendDirection::Up),
        "down" => Ok(TrendDirection::Down),
        "stable" => Ok(TrendDirection::Stable),
        other => anyhow::bail!("unknown trend '{}', expected up, down or stable", other),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let path = shellexpand::tilde(path).into_owned();
    let raw = std::fs::read_to_string(Path::new(&path))
        .with_context(|| format!("reading {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))
}

async fn run_forecast(
    config: Config,
    history: &str,
    commodity: &Commodity,
    params: &ForecastParameters,
    as_of: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let series: PriceSeries = read_json(history)?;
    tracing::info!(commodity = %commodity.id, points = series.len(), "Forecasting");

    let engine = ForecastEngine::new(config.engine)?;
    let forecast = match as_of {
        Some(date) => engine.forecast_at(&series, commodity, params, date).await?,
        None => engine.forecast(&series, commodity, params).await?,
    };

    let last = series.valid_prices().last().copied().unwrap_or(0.0);
    let recommendation = forecast.recommendation();
    let output = ForecastOutput {
        commodity: &commodity.id,
        forecast: &forecast,
        expected_change_pct: forecast.expected_change_pct(last),
        recommendation,
        advice: recommendation.advice(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_correlate(histories: &str) -> anyhow::Result<()> {
    let histories: BTreeMap<String, Vec<f64>> = read_json(histories)?;
    let series: Vec<(String, Vec<f64>)> = histories.into_iter().collect();

    for (id, prices) in &series {
        tracing::debug!(commodity = %id, volatility = stats::volatility(prices), "Loaded history");
    }

    println!("{}", serde_json::to_string_pretty(&correlation_matrix(&series))?);
    Ok(())
}
