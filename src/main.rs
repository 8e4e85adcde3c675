use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{debug, error};

use travel_planner::logging::configure_logging;
use travel_planner::{TravelPlannerConfig, TravelPlannerError, TripPlanner, TripRequest};

const NOT_SPECIFIED: &str = "not specified";

/// Weather-aware travel itinerary planner
#[derive(Debug, Parser)]
#[command(name = "travel-planner", version, about)]
struct Cli {
    /// Where you are going, e.g. "Paris" or "Lisbon, Portugal"
    destination: String,

    /// First day of the trip (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    start: NaiveDate,

    /// Last day of the trip (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    end: NaiveDate,

    /// Arrival details, e.g. "Flight lands CDG 09:30"
    #[arg(long, default_value = NOT_SPECIFIED)]
    arrival: String,

    /// Departure details, e.g. "Train from Gare du Nord 18:00"
    #[arg(long, default_value = NOT_SPECIFIED)]
    departure: String,

    /// Path to a TOML config file
    #[arg(long, env = "TRAVEL_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{value}': {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(itinerary) => {
            println!("{itinerary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let message = err
                .downcast_ref::<TravelPlannerError>()
                .map_or_else(|| format!("{err:#}"), TravelPlannerError::user_message);
            error!("{err:#}");
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = TravelPlannerConfig::load_from_path(cli.config.clone())?;
    configure_logging(&config.logging, cli.verbose)?;
    debug!("Using model {} via {}", config.llm.model, config.llm.base_url);

    let planner = TripPlanner::new(&config)?;
    let request = TripRequest::new(
        cli.destination,
        cli.start,
        cli.end,
        cli.arrival,
        cli.departure,
    );

    let itinerary = planner
        .plan_trip(&request)
        .await
        .with_context(|| format!("Planning trip to {} failed", request.destination))?;

    Ok(itinerary)
}
