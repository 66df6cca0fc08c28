//! Waypoint CLI
//!
//! Computes single legs and whole trip routes from the command line and
//! prints them as JSON.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use application::RouteService;
use clap::{Parser, Subcommand};
use domain::{GeoLocation, Stop, TransportMode};
use infrastructure::{AppConfig, RoutingConfig, build_route_service, init_logging};
use tracing::{debug, info};

/// Waypoint CLI
#[derive(Debug, Parser)]
#[command(name = "waypoint-cli")]
#[command(author, version, about = "Multi-modal trip route calculator", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: config.toml in the working directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable all routing backends and use geometric estimates only
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Route a single leg between two coordinates
    ///
    /// Example: waypoint-cli leg --from 52.52,13.405 --to 48.1351,11.582 --mode BICYCLE
    Leg {
        /// Origin as LAT,LON
        #[arg(long, value_parser = parse_location, allow_hyphen_values = true)]
        from: GeoLocation,

        /// Destination as LAT,LON
        #[arg(long, value_parser = parse_location, allow_hyphen_values = true)]
        to: GeoLocation,

        /// Transport mode (DRIVING, WALKING, BICYCLE, PUBLIC_TRANSPORT, FLIGHT, TRAIN)
        #[arg(short, long, default_value = "DRIVING")]
        mode: TransportMode,
    },

    /// Route a whole trip read from a JSON array of stops
    ///
    /// Example: waypoint-cli trip ./itinerary.json
    Trip {
        /// Path to the stops file
        file: PathBuf,
    },
}

/// Log filter override from the verbosity count; wins over `RUST_LOG`
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Parse `LAT,LON` into a validated location
fn parse_location(value: &str) -> Result<GeoLocation, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{value}'"))?;

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

    GeoLocation::new(lat, lon).map_err(|e| e.to_string())
}

/// Read the stops of a trip from a JSON file
fn read_stops(path: &Path) -> anyhow::Result<Vec<Stop>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse stops from {}", path.display()))
}

/// Resolve the effective configuration from file, environment and flags
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if cli.offline {
        config.routing = RoutingConfig::offline();
    }

    Ok(config)
}

/// Cancel in-flight calculations when the user hits Ctrl-C
fn cancel_on_ctrl_c(service: &Arc<RouteService>) {
    let service = Arc::clone(service);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling pending calculations");
            service.cancel_pending();
        }
    });
}

async fn run(cli: Cli, service: Arc<RouteService>) -> anyhow::Result<()> {
    match cli.command {
        Commands::Leg { from, to, mode } => {
            let origin = Stop::new("from", "Origin").with_location(from);
            let destination = Stop::new("to", "Destination").with_location(to);

            let segment = service
                .calculate_route(&origin, &destination, mode)
                .await
                .context("route calculation failed")?;

            println!("{}", serde_json::to_string_pretty(&segment)?);
        },

        Commands::Trip { file } => {
            let stops = read_stops(&file)?;
            debug!(stops = stops.len(), "Loaded trip");

            let trip = service
                .calculate_trip_route(&stops)
                .await
                .context("trip calculation failed")?;

            println!("{}", serde_json::to_string_pretty(&trip)?);
        },
    }

    let stats = service.cache_stats().await;
    debug!(hits = stats.hits, misses = stats.misses, "Route cache statistics");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config.telemetry, log_filter_from_verbosity(cli.verbose))?;

    let service = Arc::new(build_route_service(&config)?);
    cancel_on_ctrl_c(&service);

    run(cli, service).await
}
