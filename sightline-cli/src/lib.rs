//! Command-line interface for resolving sighting trails to addresses.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod trail;

pub use error::CliError;
use trail::{TrailArgs, run_trail};

const ARG_COORDS: &str = "coords";
const ARG_COORDS_FILE: &str = "coords-file";
const ARG_LAT: &str = "lat";
const ARG_LNG: &str = "lng";
const ARG_NOMINATIM_URL: &str = "nominatim-url";
const ARG_USER_AGENT: &str = "user-agent";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_DELAY_MS: &str = "delay-ms";
const ARG_MAX_CONCURRENT: &str = "max-concurrent";
const ARG_NEGATIVE_TTL_SECS: &str = "negative-ttl-secs";
const ENV_COORDS: &str = "SIGHTLINE_CMDS_TRAIL_COORDS";
const ENV_LNG: &str = "SIGHTLINE_CMDS_TRAIL_LNG";
const ENV_LAT: &str = "SIGHTLINE_CMDS_TRAIL_LAT";

/// Run the Sightline CLI with the current process arguments and environment.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Trail(args) => run_trail(args).await,
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sightline",
    about = "Resolve dog sighting coordinates to short postal addresses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a numbered, address-annotated list of sightings.
    Trail(TrailArgs),
}

#[cfg(test)]
mod tests;
