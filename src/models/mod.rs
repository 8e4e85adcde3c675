//! Data models for the travel planner
//!
//! This module contains the core domain models organized by concern:
//! - Place: Geocoded coordinates and display name
//! - Forecast: Per-day weather aggregates keyed by date
//! - Context: The grounding document handed to the language model

pub mod context;
pub mod forecast;
pub mod place;

// Re-export all public types for convenient access
pub use context::{TripContext, WeatherContext, ITINERARY_NOTES};
pub use forecast::{DailyForecast, DayForecast};
pub use place::Place;
