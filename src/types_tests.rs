//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_trend_serialization() {
        assert_eq!(serde_json::to_string(&TrendDirection::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&TrendDirection::Stable).unwrap(), "\"stable\"");
        let down: TrendDirection = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(down, TrendDirection::Down);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from("Cash Crops"), Category::CashCrops);
        assert_eq!(Category::from("cash_crops"), Category::CashCrops);
        assert_eq!(Category::from(" VEGETABLES "), Category::Vegetables);
        assert_eq!(Category::from("Spices"), Category::Other("Spices".to_string()));
        assert_eq!(Category::CashCrops.to_string(), "Cash Crops");
    }

    #[test]
    fn test_category_serde_round_trip_keeps_unknown_label() {
        let json = serde_json::to_string(&Category::Other("Pulses".to_string())).unwrap();
        assert_eq!(json, "\"Pulses\"");
        let back: Category = serde_json::from_str("\"Oilseeds\"").unwrap();
        assert_eq!(back, Category::Oilseeds);
    }

    #[test]
    fn test_commodity_deserialization() {
        let json = r#"{
            "id": "wheat",
            "name": "Wheat",
            "category": "Cereals",
            "current_price": "2150.50",
            "trend": "up"
        }"#;
        let commodity: Commodity = serde_json::from_str(json).unwrap();
        assert_eq!(commodity.category, Category::Cereals);
        assert_eq!(commodity.current_price, dec!(2150.50));
        assert_eq!(commodity.trend, TrendDirection::Up);
    }

    #[test]
    fn test_series_parses_missing_prices() {
        let json = r#"[
            {"date": "2024-03-01", "price": 2000.0},
            {"date": "2024-03-02", "price": null},
            {"date": "2024-03-03", "price": 2010.0}
        ]"#;
        let series: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.valid_prices(), vec![2000.0, 2010.0]);
        assert!(series.validate().is_ok());
    }

    #[test]
    fn test_series_validation() {
        let nan: PriceSeries = vec![PricePoint::new(date(1), f64::NAN)].into_iter().collect();
        assert!(nan.validate().unwrap_err().is_validation());

        let inf = PriceSeries::new(vec![PricePoint::new(date(1), f64::INFINITY)]);
        assert!(inf.validate().is_err());

        let negative = PriceSeries::new(vec![PricePoint::new(date(2), -5.0)]);
        assert!(negative.validate().is_err());

        let zero = PriceSeries::new(vec![PricePoint::new(date(2), 0.0), PricePoint::missing(date(3))]);
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_daily_series_dates() {
        let series = PriceSeries::daily(date(10), &[1.0, 2.0, 3.0]);
        let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(7), date(8), date(9)]);
    }

    #[test]
    fn test_parameters_defaults() {
        let params = ForecastParameters::default();
        assert_eq!(params.horizon_days, 14);
        assert_eq!(params.seasonal_weight, 0.5);
        assert_eq!(params.trend_weight, 0.5);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_parameters_clamped() {
        let params = ForecastParameters::clamped(45, 1.7, f64::NAN);
        assert_eq!(params.horizon_days, MAX_HORIZON_DAYS);
        assert_eq!(params.seasonal_weight, 1.0);
        assert_eq!(params.trend_weight, 0.0);

        let params = ForecastParameters::clamped(2, -0.3, 0.4);
        assert_eq!(params.horizon_days, MIN_HORIZON_DAYS);
        assert_eq!(params.seasonal_weight, 0.0);
        assert_eq!(params.trend_weight, 0.4);
    }

    #[test]
    fn test_parameters_validation() {
        let base = ForecastParameters::default();
        assert!(ForecastParameters { horizon_days: 6, ..base }.validate().is_err());
        assert!(ForecastParameters { horizon_days: 31, ..base }.validate().is_err());
        assert!(ForecastParameters { horizon_days: 7, ..base }.validate().is_ok());
        assert!(ForecastParameters { horizon_days: 30, ..base }.validate().is_ok());
        assert!(ForecastParameters { trend_weight: 1.01, ..base }.validate().is_err());
        assert!(ForecastParameters { seasonal_weight: f64::NAN, ..base }.validate().is_err());
        assert!(ForecastParameters { seasonal_weight: 0.0, trend_weight: 1.0, ..base }
            .validate()
            .is_ok());
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(create_forecast(TrendDirection::Up, 81).recommendation(), Recommendation::Buy);
        assert_eq!(create_forecast(TrendDirection::Up, 80).recommendation(), Recommendation::Hold);
        assert_eq!(create_forecast(TrendDirection::Down, 76).recommendation(), Recommendation::Sell);
        assert_eq!(create_forecast(TrendDirection::Down, 75).recommendation(), Recommendation::Hold);
        assert_eq!(create_forecast(TrendDirection::Stable, 95).recommendation(), Recommendation::Hold);
        assert_eq!(serde_json::to_string(&Recommendation::Buy).unwrap(), "\"BUY\"");
        assert!(Recommendation::Sell.advice().starts_with("Sell Signal"));
    }

    #[test]
    fn test_expected_change() {
        let forecast = create_forecast(TrendDirection::Up, 90);
        assert!((forecast.expected_change_pct(1000.0) - 5.0).abs() < 1e-9);
        assert_eq!(forecast.expected_change_pct(0.0), 0.0);
        assert_eq!(forecast.horizon(), 2);
    }

    #[test]
    fn test_forecast_serialization() {
        let json = serde_json::to_value(create_forecast(TrendDirection::Down, 60)).unwrap();
        assert_eq!(json["trend"], "down");
        assert_eq!(json["path"], "full_pipeline");
        assert_eq!(json["upper_band"].as_array().unwrap().len(), 2);
    }

    fn create_forecast(trend: TrendDirection, confidence: u8) -> Forecast {
        Forecast {
            predictions: vec![1040.0, 1060.0],
            confidence,
            trend,
            volatility: 3.0,
            moving_average: vec![1000.0],
            upper_band: vec![1102.0, 1124.0],
            lower_band: vec![981.0, 1000.0],
            factors: vec![],
            path: ForecastPath::FullPipeline,
        }
    }
}
