//! Daily forecasts from the Open-Meteo API
//!
//! Open-Meteo answers with one array per metric, all aligned on a shared
//! `time` array. [`ForecastFetcher::fetch`] reshapes that into a
//! [`DailyForecast`] keyed by date and rejects any response whose arrays do
//! not line up.

use std::time::Instant;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::WeatherConfig;
use crate::error::{Service, TravelPlannerError};
use crate::http::{build_client, ensure_success, read_json};
use crate::models::{DailyForecast, DayForecast};
use crate::Result;

/// Daily metrics requested from Open-Meteo, in query order
pub const DAILY_METRICS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

/// Open-Meteo forecast client
#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    client: Client,
    base_url: String,
}

impl ForecastFetcher {
    /// Create a new forecast client from configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = build_client(Service::Weather, config.timeout(), None)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the daily forecast for the inclusive range `[start_date, end_date]`
    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<DailyForecast> {
        if start_date > end_date {
            return Err(TravelPlannerError::validation(format!(
                "Start date {start_date} is after end date {end_date}"
            )));
        }

        info!(
            "Getting daily forecast for {:.4}, {:.4} from {} to {}",
            latitude, longitude, start_date, end_date
        );
        let start_time = Instant::now();

        let url = format!("{}/forecast", self.base_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
            ("timezone", "auto".to_string()),
            ("daily", DAILY_METRICS.to_string()),
        ];
        debug!("Open-Meteo request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| TravelPlannerError::transport(Service::Weather, e))?;

        let response = ensure_success(Service::Weather, response).await?;
        let body: openmeteo::ForecastResponse = read_json(Service::Weather, response).await?;

        let daily = body
            .daily
            .ok_or_else(|| TravelPlannerError::malformed(Service::Weather, "missing 'daily' key"))?;
        let forecast = daily.into_daily_forecast()?;

        info!(
            "Retrieved {} forecast days in {:.3}s",
            forecast.len(),
            start_time.elapsed().as_secs_f64()
        );
        for (date, day) in forecast.iter() {
            debug!("{}: {}", date, day.summary());
        }

        Ok(forecast)
    }
}

/// `OpenMeteo` API response structures and conversion utilities
mod openmeteo {
    use super::{DailyForecast, DayForecast, NaiveDate, Service, TravelPlannerError};
    use crate::Result;
    use serde::Deserialize;

    /// Forecast response from `OpenMeteo`; only the daily block is used
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub daily: Option<DailyData>,
    }

    /// Daily weather data from `OpenMeteo`, one array per metric
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
        #[serde(rename = "temperature_2m_min")]
        pub temperature_min: Option<Vec<Option<f64>>>,
        #[serde(rename = "precipitation_sum")]
        pub precipitation: Option<Vec<Option<f64>>>,
        #[serde(rename = "weathercode")]
        pub weather_code: Option<Vec<Option<i32>>>,
    }

    fn aligned<'a, T>(
        name: &str,
        values: &'a Option<Vec<Option<T>>>,
        expected: usize,
    ) -> Result<&'a [Option<T>]> {
        let values = values.as_deref().ok_or_else(|| {
            TravelPlannerError::malformed(Service::Weather, format!("missing daily '{name}'"))
        })?;
        if values.len() != expected {
            return Err(TravelPlannerError::malformed(
                Service::Weather,
                format!(
                    "daily '{name}' has {} values but 'time' has {expected}",
                    values.len()
                ),
            ));
        }
        Ok(values)
    }

    fn value_at<T: Copy>(name: &str, values: &[Option<T>], i: usize, date: &str) -> Result<T> {
        values[i].ok_or_else(|| {
            TravelPlannerError::malformed(
                Service::Weather,
                format!("daily '{name}' is null for {date}"),
            )
        })
    }

    impl DailyData {
        /// Zip the parallel arrays into a date-keyed forecast
        pub fn into_daily_forecast(self) -> Result<DailyForecast> {
            let len = self.time.len();
            let temp_max = aligned("temperature_2m_max", &self.temperature_max, len)?;
            let temp_min = aligned("temperature_2m_min", &self.temperature_min, len)?;
            let precipitation = aligned("precipitation_sum", &self.precipitation, len)?;
            let weather_code = aligned("weathercode", &self.weather_code, len)?;

            let mut forecast = DailyForecast::new();
            let mut previous: Option<NaiveDate> = None;
            for (i, raw_date) in self.time.iter().enumerate() {
                let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
                    TravelPlannerError::malformed(
                        Service::Weather,
                        format!("invalid date '{raw_date}': {e}"),
                    )
                })?;

                // Dates must ascend; repeats are caught by the insert below
                if previous.is_some_and(|prev| date < prev) {
                    return Err(TravelPlannerError::malformed(
                        Service::Weather,
                        format!("dates out of order at '{raw_date}'"),
                    ));
                }
                previous = Some(date);

                let day = DayForecast {
                    temp_max: value_at("temperature_2m_max", temp_max, i, raw_date)?,
                    temp_min: value_at("temperature_2m_min", temp_min, i, raw_date)?,
                    precipitation: value_at("precipitation_sum", precipitation, i, raw_date)?,
                    weather_code: value_at("weathercode", weather_code, i, raw_date)?,
                };

                if forecast.insert(date, day).is_some() {
                    return Err(TravelPlannerError::malformed(
                        Service::Weather,
                        format!("duplicate date '{raw_date}'"),
                    ));
                }
            }

            Ok(forecast)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::openmeteo::ForecastResponse;
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> Result<DailyForecast> {
        let response: ForecastResponse = serde_json::from_value(body).unwrap();
        response.daily.unwrap().into_daily_forecast()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parallel_arrays_are_zipped_by_index() {
        let forecast = parse(json!({
            "daily": {
                "time": ["2024-06-01", "2024-06-02", "2024-06-03"],
                "temperature_2m_max": [22.5, 24.1, 19.8],
                "temperature_2m_min": [14.2, 15.0, 12.9],
                "precipitation_sum": [0.0, 1.2, 7.5],
                "weathercode": [1, 61, 95]
            }
        }))
        .unwrap();

        assert_eq!(forecast.len(), 3);
        let first = forecast.get(&date("2024-06-01")).unwrap();
        assert_eq!(first.temp_max, 22.5);
        assert_eq!(first.temp_min, 14.2);
        assert_eq!(first.precipitation, 0.0);
        assert_eq!(first.weather_code, 1);

        let last = forecast.get(&date("2024-06-03")).unwrap();
        assert_eq!(last.temp_max, 19.8);
        assert_eq!(last.precipitation, 7.5);
        assert_eq!(last.weather_code, 95);
    }

    #[test]
    fn test_empty_arrays_give_empty_forecast() {
        let forecast = parse(json!({
            "daily": {
                "time": [],
                "temperature_2m_max": [],
                "temperature_2m_min": [],
                "precipitation_sum": [],
                "weathercode": []
            }
        }))
        .unwrap();
        assert!(forecast.is_empty());
    }

    #[rstest]
    #[case::short_max(json!([22.5]), json!([14.2, 15.0]), json!([1, 2]))]
    #[case::long_min(json!([22.5, 23.0]), json!([14.2, 15.0, 16.0]), json!([1, 2]))]
    #[case::short_code(json!([22.5, 23.0]), json!([14.2, 15.0]), json!([1]))]
    fn test_length_mismatch_is_malformed(
        #[case] temp_max: serde_json::Value,
        #[case] temp_min: serde_json::Value,
        #[case] codes: serde_json::Value,
    ) {
        let err = parse(json!({
            "daily": {
                "time": ["2024-06-01", "2024-06-02"],
                "temperature_2m_max": temp_max,
                "temperature_2m_min": temp_min,
                "precipitation_sum": [0.0, 0.0],
                "weathercode": codes
            }
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            TravelPlannerError::MalformedResponse {
                service: Service::Weather,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_metric_is_malformed() {
        let err = parse(json!({
            "daily": {
                "time": ["2024-06-01"],
                "temperature_2m_max": [22.5],
                "temperature_2m_min": [14.2],
                "weathercode": [1]
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("precipitation_sum"));
    }

    #[test]
    fn test_null_value_is_malformed() {
        let err = parse(json!({
            "daily": {
                "time": ["2024-06-01"],
                "temperature_2m_max": [null],
                "temperature_2m_min": [14.2],
                "precipitation_sum": [0.0],
                "weathercode": [1]
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("null for 2024-06-01"));
    }

    #[test]
    fn test_duplicate_date_is_malformed() {
        let err = parse(json!({
            "daily": {
                "time": ["2024-06-01", "2024-06-01"],
                "temperature_2m_max": [22.5, 23.0],
                "temperature_2m_min": [14.2, 15.0],
                "precipitation_sum": [0.0, 0.0],
                "weathercode": [1, 1]
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("duplicate date"));
    }

    #[test]
    fn test_descending_dates_are_malformed() {
        let err = parse(json!({
            "daily": {
                "time": ["2024-06-02", "2024-06-01"],
                "temperature_2m_max": [22.5, 23.0],
                "temperature_2m_min": [14.2, 15.0],
                "precipitation_sum": [0.0, 0.0],
                "weathercode": [1, 1]
            }
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            TravelPlannerError::MalformedResponse {
                service: Service::Weather,
                ..
            }
        ));
        assert!(err.to_string().contains("out of order at '2024-06-01'"));
    }

    #[tokio::test]
    async fn test_reversed_range_is_rejected_before_request() {
        let config = WeatherConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..WeatherConfig::default()
        };
        let fetcher = ForecastFetcher::new(&config).unwrap();
        let err = fetcher
            .fetch(48.85, 2.35, date("2024-06-03"), date("2024-06-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, TravelPlannerError::Validation { .. }));
    }
}
