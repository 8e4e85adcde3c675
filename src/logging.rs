//! Tracing subscriber setup for the command-line binary
//!
//! Logs go to stderr so stdout only carries the itinerary.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;
use crate::{Result, TravelPlannerError};

/// Filter directives: `RUST_LOG` wins, then `--verbose`, then the configured level
#[must_use]
pub fn filter_directive(config: &LoggingConfig, verbose: bool, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directive) => directive.to_string(),
        None if verbose => "debug,hyper=info,reqwest=info".to_string(),
        None => format!("warn,travel_planner={}", config.level),
    }
}

/// Install the global subscriber
pub fn configure_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(config, verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| TravelPlannerError::config(format!("Invalid log filter '{directive}': {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .try_init()
    };

    result.map_err(|e| TravelPlannerError::config(format!("Failed to initialize logging: {e}")))
}
