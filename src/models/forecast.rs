//! Daily weather forecast model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated weather for a single day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayForecast {
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Total precipitation in mm
    pub precipitation: f64,
    /// WMO weather interpretation code
    #[serde(rename = "weathercode")]
    pub weather_code: i32,
}

impl DayForecast {
    /// Human-readable description of the WMO weather code
    #[must_use]
    pub fn condition(&self) -> &'static str {
        match self.weather_code {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            56 => "Light freezing drizzle",
            57 => "Dense freezing drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            66 => "Light freezing rain",
            67 => "Heavy freezing rain",
            71 => "Slight snow fall",
            73 => "Moderate snow fall",
            75 => "Heavy snow fall",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => "Unknown",
        }
    }

    /// One-line summary used in logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {:.1}..{:.1}°C, {:.1} mm",
            self.condition(),
            self.temp_min,
            self.temp_max,
            self.precipitation
        )
    }
}

/// Per-day forecasts keyed by date, one entry per day of the requested window
///
/// Serializes as a JSON object whose keys are ISO dates (`YYYY-MM-DD`) in
/// chronological order.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct DailyForecast {
    days: BTreeMap<NaiveDate, DayForecast>,
}

impl DailyForecast {
    /// Create an empty forecast
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a day; returns the previous entry if the date was already present
    pub fn insert(&mut self, date: NaiveDate, day: DayForecast) -> Option<DayForecast> {
        self.days.insert(date, day)
    }

    /// Forecast for a specific date
    #[must_use]
    pub fn get(&self, date: &NaiveDate) -> Option<&DayForecast> {
        self.days.get(date)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate days in chronological order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayForecast)> {
        self.days.iter()
    }

    /// First and last covered date
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.days.keys().next()?;
        let last = self.days.keys().next_back()?;
        Some((*first, *last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(temp_max: f64, weather_code: i32) -> DayForecast {
        DayForecast {
            temp_max,
            temp_min: temp_max - 8.0,
            precipitation: 0.0,
            weather_code,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    #[case(0, "Clear sky")]
    #[case(3, "Overcast")]
    #[case(63, "Moderate rain")]
    #[case(95, "Thunderstorm")]
    #[case(42, "Unknown")]
    fn test_condition_from_weather_code(#[case] code: i32, #[case] expected: &str) {
        assert_eq!(day(20.0, code).condition(), expected);
    }

    #[test]
    fn test_serializes_as_date_keyed_object() {
        let mut forecast = DailyForecast::new();
        forecast.insert(date("2024-06-02"), day(24.0, 61));
        forecast.insert(date("2024-06-01"), day(22.5, 1));

        let json = serde_json::to_value(&forecast).unwrap();
        let object = json.as_object().unwrap();
        let keys: Vec<&String> = object.keys().collect();
        assert_eq!(keys, ["2024-06-01", "2024-06-02"]);
        assert_eq!(json["2024-06-01"]["temp_max"], 22.5);
        assert_eq!(json["2024-06-02"]["weathercode"], 61);
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut forecast = DailyForecast::new();
        assert!(forecast.insert(date("2024-06-01"), day(20.0, 0)).is_none());
        assert!(forecast.insert(date("2024-06-01"), day(21.0, 0)).is_some());
        assert_eq!(forecast.len(), 1);
    }

    #[test]
    fn test_date_range() {
        let mut forecast = DailyForecast::new();
        assert!(forecast.date_range().is_none());

        forecast.insert(date("2024-06-03"), day(20.0, 0));
        forecast.insert(date("2024-06-01"), day(20.0, 0));
        assert_eq!(
            forecast.date_range(),
            Some((date("2024-06-01"), date("2024-06-03")))
        );
    }

    #[test]
    fn test_summary() {
        let summary = day(22.5, 2).summary();
        assert!(summary.starts_with("Partly cloudy"));
        assert!(summary.contains("22.5"));
    }
}
