//! Place name resolution via Nominatim (OpenStreetMap)
//!
//! Turns a free-text destination into coordinates and a canonical display
//! name. An empty result set is a normal outcome (`Ok(None)`), distinct from
//! a failed request.

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::error::{Service, TravelPlannerError};
use crate::http::{build_client, ensure_success, read_json};
use crate::models::Place;
use crate::Result;

/// A single Nominatim search hit; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl TryFrom<NominatimPlace> for Place {
    type Error = TravelPlannerError;

    fn try_from(raw: NominatimPlace) -> Result<Self> {
        let latitude = parse_coordinate("lat", &raw.lat, 90.0)?;
        let longitude = parse_coordinate("lon", &raw.lon, 180.0)?;
        if raw.display_name.trim().is_empty() {
            return Err(TravelPlannerError::malformed(
                Service::Geocoding,
                "display_name is empty",
            ));
        }
        Ok(Place::new(latitude, longitude, raw.display_name))
    }
}

/// Parse a coordinate string; must be finite and within `[-limit, limit]`
fn parse_coordinate(field: &str, value: &str, limit: f64) -> Result<f64> {
    let parsed = value.trim().parse::<f64>().map_err(|_| {
        TravelPlannerError::malformed(
            Service::Geocoding,
            format!("{field} is not a number: '{value}'"),
        )
    })?;

    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(TravelPlannerError::malformed(
            Service::Geocoding,
            format!("{field} is out of range: '{value}'"),
        ));
    }
    Ok(parsed)
}

/// Nominatim search client
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    /// Create a new geocoder from configuration
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = build_client(
            Service::Geocoding,
            config.timeout(),
            Some(&config.user_agent),
        )?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a place name to its best match, or `None` when nothing matches
    #[instrument(skip(self))]
    pub async fn resolve(&self, place_name: &str) -> Result<Option<Place>> {
        if place_name.trim().is_empty() {
            return Err(TravelPlannerError::validation("Place name cannot be empty"));
        }

        info!("Geocoding place: '{}'", place_name);
        let start_time = Instant::now();

        let url = format!("{}/search", self.base_url);
        debug!("Nominatim request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", place_name), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| TravelPlannerError::transport(Service::Geocoding, e))?;

        let response = ensure_success(Service::Geocoding, response).await?;
        let results: Vec<NominatimPlace> = read_json(Service::Geocoding, response).await?;

        let Some(first) = results.into_iter().next() else {
            warn!("No results found for place '{}'", place_name);
            return Ok(None);
        };

        let place = Place::try_from(first)?;
        info!(
            "Resolved '{}' to {} ({}) in {:.3}s",
            place_name,
            place.display_name,
            place.format_coordinates(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(Some(place))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_nominatim_place_conversion() {
        let raw = NominatimPlace {
            lat: "48.8588897".to_string(),
            lon: "2.3200410".to_string(),
            display_name: "Paris, Île-de-France, France métropolitaine, France".to_string(),
        };

        let place = Place::try_from(raw).unwrap();
        assert_eq!(place.latitude, 48.858_889_7);
        assert_eq!(place.longitude, 2.320_041);
        assert!(place.display_name.starts_with("Paris"));
    }

    #[rstest]
    #[case::word("north", "2.35", "Somewhere")]
    #[case::empty_lat("", "2.35", "Somewhere")]
    #[case::decimal_comma("48,85", "2.35", "Somewhere")]
    #[case::nan_lat("NaN", "2.35", "Somewhere")]
    #[case::infinite_lon("48.85", "inf", "Somewhere")]
    #[case::lat_beyond_pole("91", "2.35", "Somewhere")]
    #[case::lon_beyond_antimeridian("48.85", "-180.5", "Somewhere")]
    #[case::empty_name("48.85", "2.35", "")]
    #[case::blank_name("48.85", "2.35", "   ")]
    fn test_invalid_search_hit_is_malformed(
        #[case] lat: &str,
        #[case] lon: &str,
        #[case] display_name: &str,
    ) {
        let raw = NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: display_name.to_string(),
        };

        let err = Place::try_from(raw).unwrap_err();
        assert!(matches!(
            err,
            TravelPlannerError::MalformedResponse {
                service: Service::Geocoding,
                ..
            }
        ));
    }

    #[rstest]
    #[case("90", "180")]
    #[case("-90", "-180")]
    #[case(" 0.0 ", "0")]
    fn test_boundary_coordinates_are_accepted(#[case] lat: &str, #[case] lon: &str) {
        let raw = NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: "Edge of the map".to_string(),
        };
        let place = Place::try_from(raw).unwrap();
        assert!(place.latitude.is_finite() && place.longitude.is_finite());
    }

    #[tokio::test]
    async fn test_blank_place_name_is_rejected() {
        let geocoder = Geocoder::new(&GeocodingConfig::default()).unwrap();
        let err = geocoder.resolve("   ").await.unwrap_err();
        assert!(matches!(err, TravelPlannerError::Validation { .. }));
    }
}
