//! Error types and handling for the travel planner

use thiserror::Error;

/// External service a request was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    Weather,
    LanguageModel,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Service::Geocoding => "geocoding",
            Service::Weather => "weather",
            Service::LanguageModel => "language model",
        };
        f.write_str(name)
    }
}

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum TravelPlannerError {
    /// The geocoder returned no match for the destination
    #[error("Could not find {destination}")]
    PlaceNotFound { destination: String },

    /// A required credential is not configured
    #[error("Missing credential: {name}")]
    MissingCredential { name: String },

    /// The service answered with a non-success status
    #[error("{service} service returned HTTP {status}: {body}")]
    Http {
        service: Service,
        status: u16,
        body: String,
    },

    /// The request never produced a response (timeout, connect, TLS)
    #[error("{service} request failed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not have the expected shape
    #[error("Malformed {service} response: {message}")]
    MalformedResponse { service: Service, message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The prompt context could not be encoded
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl TravelPlannerError {
    /// Create a new place-not-found error
    pub fn place_not_found<S: Into<String>>(destination: S) -> Self {
        Self::PlaceNotFound {
            destination: destination.into(),
        }
    }

    /// Create a new missing-credential error
    pub fn missing_credential<S: Into<String>>(name: S) -> Self {
        Self::MissingCredential { name: name.into() }
    }

    /// Create a new transport error
    pub fn transport(service: Service, source: reqwest::Error) -> Self {
        Self::Transport { service, source }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(service: Service, message: S) -> Self {
        Self::MalformedResponse {
            service,
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlannerError::PlaceNotFound { destination } => {
                format!("Could not find {destination}. Please check the spelling or try a nearby city.")
            }
            TravelPlannerError::MissingCredential { name } => {
                format!("{name} is not set. Add it to your environment or config file.")
            }
            TravelPlannerError::Http { service, status, .. } => {
                format!("The {service} service rejected the request (HTTP {status}).")
            }
            TravelPlannerError::Transport { service, .. } => {
                format!(
                    "Unable to reach the {service} service. Please check your internet connection."
                )
            }
            TravelPlannerError::MalformedResponse { service, .. } => {
                format!("The {service} service sent an unexpected response.")
            }
            TravelPlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TravelPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelPlannerError::Serialization { .. } => {
                "Internal error while preparing the request.".to_string()
            }
        }
    }
}

impl From<config::ConfigError> for TravelPlannerError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let not_found = TravelPlannerError::place_not_found("Atlantis");
        assert!(matches!(not_found, TravelPlannerError::PlaceNotFound { .. }));
        assert_eq!(not_found.to_string(), "Could not find Atlantis");

        let missing = TravelPlannerError::missing_credential("OPENROUTER_API_KEY");
        assert!(matches!(missing, TravelPlannerError::MissingCredential { .. }));

        let malformed = TravelPlannerError::malformed(Service::Weather, "missing daily");
        assert_eq!(
            malformed.to_string(),
            "Malformed weather response: missing daily"
        );
    }

    #[test]
    fn test_user_messages() {
        let not_found = TravelPlannerError::place_not_found("Nowhereville");
        assert!(not_found.user_message().contains("Nowhereville"));

        let http = TravelPlannerError::Http {
            service: Service::Geocoding,
            status: 429,
            body: String::new(),
        };
        assert!(http.user_message().contains("geocoding"));
        assert!(http.user_message().contains("429"));

        let validation = TravelPlannerError::validation("end before start");
        assert!(validation.user_message().contains("end before start"));

        let config = TravelPlannerError::config("test");
        assert!(config.user_message().contains("Configuration error"));
    }
}
