use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use move_core::config::{
    MapsConfig, RateConfig, DEFAULT_MAPS_ENDPOINT, DEFAULT_MAPS_TIMEOUT_SECS, MAPS_API_KEY_ENV,
    MAPS_ENDPOINT_ENV, MAPS_TIMEOUT_ENV,
};
use move_core::lifecycle::{check_transition, compute_cancellation_outcome, BookingStatus};
use move_core::pricing::Money;
use move_core::routing::{GeoResolver, Location};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod job;

use job::{quote_job, JobDocument};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "movequote",
    about = "Price moving jobs and check booking status changes",
    long_about = "Command-line front end for the moving-service pricing core.\n\
                  Every subcommand prints JSON on stdout; logs go to stderr\n\
                  (set RUST_LOG=debug for resolution and pricing details)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a job document against a provider's rate card
    Quote {
        /// Rate configuration JSON (providers, categories, per-floor rate)
        #[arg(long)]
        rates: PathBuf,
        /// Transport provider whose rate card to use
        #[arg(long)]
        provider: String,
        /// Job document JSON (distance or origin/destination, items, floors, schedule)
        #[arg(long)]
        request: PathBuf,
        #[command(flatten)]
        maps: MapsArgs,
    },
    /// Resolve the distance between two locations ("lat,lng" or an address)
    Distance {
        #[arg(long)]
        from: Location,
        #[arg(long)]
        to: Location,
        #[command(flatten)]
        maps: MapsArgs,
    },
    /// Compute the refund and fee for cancelling a booking
    Cancel {
        /// Current booking status (e.g. CONFIRMED)
        #[arg(long)]
        status: BookingStatus,
        /// Last quoted price in minor units
        #[arg(long)]
        final_price: Option<Money>,
        /// Scheduled pickup time (RFC 3339)
        #[arg(long)]
        scheduled_at: Option<DateTime<FixedOffset>>,
        /// Evaluation time (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<DateTime<FixedOffset>>,
    },
    /// Check whether a status change is legal
    Transition {
        #[arg(long)]
        from: BookingStatus,
        #[arg(long)]
        to: BookingStatus,
    },
}

#[derive(Args)]
struct MapsArgs {
    /// Maps web service base URL
    #[arg(long, env = MAPS_ENDPOINT_ENV, default_value = DEFAULT_MAPS_ENDPOINT)]
    maps_endpoint: String,
    /// Maps API key; without it only coordinates can be resolved
    #[arg(long, env = MAPS_API_KEY_ENV, hide_env_values = true)]
    maps_api_key: Option<String>,
    /// Per-request timeout for the maps provider, in whole seconds (>= 1)
    #[arg(
        long,
        env = MAPS_TIMEOUT_ENV,
        default_value_t = DEFAULT_MAPS_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    maps_timeout_secs: u64,
}

impl MapsArgs {
    fn config(&self) -> MapsConfig {
        MapsConfig {
            endpoint: self.maps_endpoint.clone(),
            api_key: self.maps_api_key.clone(),
            timeout_secs: self.maps_timeout_secs,
        }
    }
}

#[derive(Serialize)]
struct TransitionOutput {
    from: BookingStatus,
    to: BookingStatus,
    allowed: bool,
    successors: &'static [BookingStatus],
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[cfg(feature = "maps")]
fn build_resolver(config: &MapsConfig) -> GeoResolver {
    use move_core::routing::maps::MapsClient;

    if !config.is_configured() {
        tracing::debug!("no maps API key; only coordinates will resolve");
        return GeoResolver::offline();
    }
    match MapsClient::new(config) {
        Ok(client) => GeoResolver::offline()
            .with_geocoder(client.clone())
            .with_router(client),
        Err(err) => {
            tracing::warn!(error = %err, "maps provider unavailable; only coordinates will resolve");
            GeoResolver::offline()
        }
    }
}

#[cfg(not(feature = "maps"))]
fn build_resolver(config: &MapsConfig) -> GeoResolver {
    if config.is_configured() {
        tracing::warn!("built without the `maps` feature; ignoring maps API key");
    }
    GeoResolver::offline()
}

// ── commands ───────────────────────────────────────────────────────

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Quote {
            rates,
            provider,
            request,
            maps,
        } => {
            let rates = RateConfig::from_path(&rates)?;
            let json = std::fs::read_to_string(&request)
                .with_context(|| format!("failed to read {}", request.display()))?;
            let job = JobDocument::from_json_str(&json)?;
            let resolver = build_resolver(&maps.config());
            print_json(&quote_job(&rates, &provider, job, &resolver)?)
        }
        Commands::Distance { from, to, maps } => {
            let resolver = build_resolver(&maps.config());
            let result = resolver
                .resolve_distance(&from, &to)
                .with_context(|| format!("resolving distance {from} -> {to}"))?;
            print_json(&result)
        }
        Commands::Cancel {
            status,
            final_price,
            scheduled_at,
            now,
        } => {
            let now: DateTime<FixedOffset> = now.unwrap_or_else(|| Utc::now().into());
            let outcome =
                compute_cancellation_outcome(status, final_price, scheduled_at.as_ref(), &now);
            print_json(&outcome)
        }
        Commands::Transition { from, to } => {
            let checked = check_transition(from, to);
            print_json(&TransitionOutput {
                from,
                to,
                allowed: checked.is_ok(),
                successors: from.successors(),
            })?;
            Ok(checked?)
        }
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        exit(1);
    }
}
