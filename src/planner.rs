//! Trip planning pipeline
//!
//! Geocode the destination, fetch the forecast for the travel window, merge
//! everything into a [`TripContext`] and ask the language model for an
//! itinerary. Each step feeds the next; the first failure aborts the run.

use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::TravelPlannerConfig;
use crate::geocoding::Geocoder;
use crate::llm::ItineraryRequester;
use crate::models::TripContext;
use crate::weather::ForecastFetcher;
use crate::{Result, TravelPlannerError};

/// Caller input for one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Free-form arrival details (time, airport, train...)
    pub arrival: String,
    /// Free-form departure details
    pub departure: String,
}

impl TripRequest {
    #[must_use]
    pub fn new(
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        arrival: impl Into<String>,
        departure: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            arrival: arrival.into(),
            departure: departure.into(),
        }
    }

    /// Reject requests that cannot produce a sensible itinerary
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(TravelPlannerError::validation("Destination cannot be empty"));
        }
        if self.start_date > self.end_date {
            return Err(TravelPlannerError::validation(format!(
                "Start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    /// Number of days covered, both ends included
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// The natural-language request sent alongside the context
    #[must_use]
    pub fn instruction(&self) -> String {
        format!(
            "Plan a trip to {} from {} to {}, with arrival/departure details included and daily weather-based suggestions.",
            self.destination,
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}

/// Runs the geocode -> forecast -> context -> itinerary pipeline
#[derive(Debug, Clone)]
pub struct TripPlanner {
    geocoder: Geocoder,
    forecasts: ForecastFetcher,
    itineraries: ItineraryRequester,
}

impl TripPlanner {
    /// Build all service clients from configuration
    pub fn new(config: &TravelPlannerConfig) -> Result<Self> {
        Ok(Self {
            geocoder: Geocoder::new(&config.geocoding)?,
            forecasts: ForecastFetcher::new(&config.weather)?,
            itineraries: ItineraryRequester::new(&config.llm)?,
        })
    }

    /// Produce an itinerary for the request; returns the model's text unmodified
    #[instrument(skip(self), fields(destination = %request.destination))]
    pub async fn plan_trip(&self, request: &TripRequest) -> Result<String> {
        request.validate()?;
        let start_time = Instant::now();

        let place = self
            .geocoder
            .resolve(&request.destination)
            .await?
            .ok_or_else(|| TravelPlannerError::place_not_found(&request.destination))?;

        let daily = self
            .forecasts
            .fetch(
                place.latitude,
                place.longitude,
                request.start_date,
                request.end_date,
            )
            .await?;

        let context = TripContext::build(
            place,
            request.arrival.clone(),
            request.departure.clone(),
            daily,
        );

        if let Some((first, last)) = context.weather.daily.date_range() {
            debug!("Forecast covered {} to {}", first, last);
        }

        let itinerary = self
            .itineraries
            .request(&context, &request.instruction())
            .await?;

        info!(
            "Planned {}-day trip to {} in {:.3}s",
            request.duration_days(),
            request.destination,
            start_time.elapsed().as_secs_f64()
        );

        Ok(itinerary)
    }
}
