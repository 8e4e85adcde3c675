//! Travel planner - weather-aware itineraries from three web services
//!
//! This library geocodes a destination, fetches the daily forecast for the
//! travel window, and asks a chat completion model to turn both into a
//! day-by-day itinerary.

pub mod config;
pub mod error;
pub mod geocoding;
mod http;
pub mod llm;
pub mod logging;
pub mod models;
pub mod planner;
pub mod weather;

// Re-export core types for public API
pub use crate::config::TravelPlannerConfig;
pub use error::{Service, TravelPlannerError};
pub use geocoding::Geocoder;
pub use llm::{ChatMessage, ItineraryRequester};
pub use models::{DailyForecast, DayForecast, Place, TripContext};
pub use planner::{TripPlanner, TripRequest};
pub use weather::ForecastFetcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPlannerError>;
