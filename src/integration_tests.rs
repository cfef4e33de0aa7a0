//! End-to-end tests: JSON history in, forecast out

#[cfg(test)]
mod tests {
    use crate::config::{Config, EngineConfig, TrainingConfig};
    use crate::engine::{correlation, correlation_matrix, ForecastEngine};
    use crate::stats::CorrelationStrength;
    use crate::testing::*;
    use crate::types::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use std::sync::Arc;

    fn history_json(prices: &[f64]) -> String {
        let points: Vec<String> = daily_series(prices)
            .points()
            .iter()
            .map(|p| format!(r#"{{"date": "{}", "price": {:.2}}}"#, p.date, p.price.unwrap_or(0.0)))
            .collect();
        format!("[{}]", points.join(","))
    }

    fn quick_engine() -> ForecastEngine {
        let config = EngineConfig {
            training: TrainingConfig {
                epochs: 8,
                ..TrainingConfig::default()
            },
            ..EngineConfig::default()
        };
        ForecastEngine::new(config.with_seed(11)).unwrap()
    }

    #[tokio::test]
    async fn test_json_history_to_forecast() {
        let prices = oscillating_prices(3200.0, 0.03, 45);
        let series: PriceSeries = serde_json::from_str(&history_json(&prices)).unwrap();
        let crop = commodity("soybean", Category::Oilseeds, dec!(3200), TrendDirection::Stable);

        let engine = quick_engine();
        let forecast = engine
            .forecast_at(&series, &crop, &ForecastParameters::clamped(21, 0.7, 0.2), anchor_date())
            .await
            .unwrap();

        assert_eq!(forecast.path, ForecastPath::FullPipeline);
        assert_eq!(forecast.horizon(), 21);
        assert!(forecast.predictions.iter().all(|p| p.fract() == 0.0 && *p >= 0.0));
        assert!(forecast.factors.contains(&"Seasonal adjustment factors applied".to_string()));
        assert!(!forecast.factors.contains(&"Historical trend momentum weighted".to_string()));

        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["predictions"].as_array().unwrap().len(), 21);
        let back: Forecast = serde_json::from_value(json).unwrap();
        assert_eq!(back.predictions, forecast.predictions);
        assert_eq!(back.path, forecast.path);
    }

    #[tokio::test]
    async fn test_config_file_drives_engine() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[engine]\nseed = 5\ntraining_timeout_secs = 10\n\n[engine.training]\nepochs = 4"
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.engine.seed, Some(5));
        assert_eq!(config.engine.training.epochs, 4);

        let a = ForecastEngine::new(config.engine.clone()).unwrap();
        let b = ForecastEngine::new(config.engine).unwrap();
        let series = daily_series(&trending_prices(700.0, 6.0, 30));
        let crop = cereal("sorghum", dec!(880));
        let params = ForecastParameters::default();

        let first = a.forecast_at(&series, &crop, &params, anchor_date()).await.unwrap();
        let second = b.forecast_at(&series, &crop, &params, anchor_date()).await.unwrap();
        assert_eq!(first.predictions, second.predictions);
    }

    #[tokio::test]
    async fn test_dashboard_batch() {
        let engine = Arc::new(quick_engine());
        let catalog = vec![
            (commodity("wheat", Category::Cereals, dec!(2100), TrendDirection::Up), trending_prices(2000.0, 4.0, 30)),
            (commodity("cotton", Category::CashCrops, dec!(6000), TrendDirection::Down), oscillating_prices(6000.0, 0.12, 30)),
            (commodity("onion", Category::Vegetables, dec!(1400), TrendDirection::Up), vec![1350.0, 1400.0, 1380.0]),
            (commodity("mustard", Category::Oilseeds, dec!(5200), TrendDirection::Stable), vec![]),
        ];

        let mut handles = Vec::new();
        for (crop, prices) in catalog {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                let forecast = engine
                    .forecast(&daily_series(&prices), &crop, &ForecastParameters::default())
                    .await;
                (crop.id, forecast)
            }));
        }

        for handle in handles {
            let (id, forecast) = handle.await.unwrap();
            let forecast = forecast.unwrap();
            assert_eq!(forecast.horizon(), 14, "{}", id);
            assert!(forecast.confidence <= 100);
            match id.as_str() {
                "onion" => {
                    assert_eq!(forecast.path, ForecastPath::InsufficientData);
                    assert_eq!(forecast.predictions[0], 1387.0);
                }
                "mustard" => {
                    assert_eq!(forecast.path, ForecastPath::InsufficientData);
                    assert_eq!(forecast.predictions, vec![5200.0; 14]);
                }
                _ => assert_eq!(forecast.path, ForecastPath::FullPipeline),
            }
        }
        assert_eq!(engine.training_runs(), 2);
    }

    #[test]
    fn test_correlation_heatmap() {
        let wheat = trending_prices(2000.0, 10.0, 20);
        let maize: Vec<f64> = wheat.iter().map(|p| p * 0.8 + 50.0).collect();
        let onion: Vec<f64> = wheat.iter().map(|p| 5000.0 - p).collect();

        assert!((correlation(&wheat, &maize) - 1.0).abs() < 1e-9);
        assert_eq!(correlation(&wheat, &onion), correlation(&onion, &wheat));

        let cells = correlation_matrix(&[("wheat", wheat), ("maize", maize), ("onion", onion)]);
        assert_eq!(cells.len(), 9);

        let cell = |row: &str, column: &str| {
            cells
                .iter()
                .find(|c| c.row == row && c.column == column)
                .unwrap()
                .clone()
        };
        assert_eq!(cell("onion", "onion").correlation, 1.0);
        assert_eq!(cell("wheat", "maize").strength, CorrelationStrength::StrongPositive);
        assert_eq!(cell("maize", "onion").correlation, -1.0);
        assert_eq!(cell("onion", "wheat").strength, CorrelationStrength::StrongNegative);
    }
}
