//! Grounding document passed to the language model

use serde::{Deserialize, Serialize};

use super::{DailyForecast, Place};

/// Instruction attached to every context
pub const ITINERARY_NOTES: &str = "Create an itinerary that adapts to daily weather conditions.";

/// Weather section of the context
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherContext {
    pub daily: DailyForecast,
}

/// Everything the model needs to know about the trip
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripContext {
    pub place: Place,
    pub arrival: String,
    pub departure: String,
    pub weather: WeatherContext,
    pub notes: String,
}

impl TripContext {
    /// Merge geocoder output, travel details and forecast into one document
    #[must_use]
    pub fn build(
        place: Place,
        arrival: impl Into<String>,
        departure: impl Into<String>,
        daily: DailyForecast,
    ) -> Self {
        Self {
            place,
            arrival: arrival.into(),
            departure: departure.into(),
            weather: WeatherContext { daily },
            notes: ITINERARY_NOTES.to_string(),
        }
    }

    /// Pretty-printed JSON as embedded in the prompt
    pub fn to_prompt_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
