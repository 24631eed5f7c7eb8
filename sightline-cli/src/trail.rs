//! Trail command implementation for the Sightline CLI.

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sightline_core::{
    AddressResolver, Coordinate, NegativeCachePolicy, ResolverConfig, ReverseGeocoder,
    SightingTrail,
};
use sightline_data::nominatim::{NominatimConfig, NominatimGeocoder};

use crate::{
    ARG_COORDS, ARG_COORDS_FILE, ARG_DELAY_MS, ARG_LAT, ARG_LNG, ARG_MAX_CONCURRENT,
    ARG_NEGATIVE_TTL_SECS, ARG_NOMINATIM_URL, ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError,
    ENV_COORDS, ENV_LAT, ENV_LNG,
};

/// CLI arguments for the `trail` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve a sequence of sighting coordinates to short postal \
                 addresses and print one numbered row per sighting. \
                 Coordinates come from a JSON array of {\"lat\", \"lng\"} \
                 objects, a file holding such an array, or a single \
                 --lat/--lng pair.",
    about = "Print the address trail of a set of sightings"
)]
#[ortho_config(prefix = "SIGHTLINE")]
pub(crate) struct TrailArgs {
    /// JSON array of coordinates, e.g. '[{"lat": -23.5, "lng": -46.6}]'.
    #[arg(long = ARG_COORDS, value_name = "json")]
    #[serde(default)]
    pub(crate) coords: Option<String>,
    /// Path to a file containing a JSON array of coordinates.
    #[arg(long = ARG_COORDS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) coords_file: Option<PathBuf>,
    /// Latitude of a single sighting.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of a single sighting.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Base URL of the Nominatim server.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// User agent identifying this client to the provider.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Pause before each provider request, in milliseconds.
    #[arg(long = ARG_DELAY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) delay_ms: Option<u64>,
    /// Maximum number of provider requests in flight.
    #[arg(long = ARG_MAX_CONCURRENT, value_name = "count")]
    #[serde(default)]
    pub(crate) max_concurrent: Option<usize>,
    /// How long failed lookups stay cached; 0 disables caching of failures.
    #[arg(long = ARG_NEGATIVE_TTL_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) negative_ttl_secs: Option<u64>,
}

impl TrailArgs {
    pub(crate) fn into_config(self) -> Result<TrailConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        TrailConfig::try_from(merged)
    }
}

/// Where the trail's coordinates come from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TrailInput {
    /// Inline JSON array.
    Inline(String),
    /// File containing a JSON array.
    File(PathBuf),
    /// A single coordinate.
    Single(Coordinate),
}

impl TrailInput {
    fn from_args(args: &TrailArgs) -> Result<Self, CliError> {
        let single = match (args.lat, args.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            (Some(_), None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_LNG,
                    env: ENV_LNG,
                });
            }
            (None, Some(_)) => {
                return Err(CliError::MissingArgument {
                    field: ARG_LAT,
                    env: ENV_LAT,
                });
            }
            (None, None) => None,
        };
        match (&args.coords, &args.coords_file, single) {
            (Some(json), None, None) => Ok(Self::Inline(json.clone())),
            (None, Some(path), None) => Ok(Self::File(path.clone())),
            (None, None, Some(coordinate)) => Ok(Self::Single(coordinate)),
            (None, None, None) => Err(CliError::MissingArgument {
                field: ARG_COORDS,
                env: ENV_COORDS,
            }),
            (Some(_), Some(_), _) => Err(CliError::ConflictingInputs {
                first: ARG_COORDS,
                second: ARG_COORDS_FILE,
            }),
            (Some(_), None, Some(_)) => Err(CliError::ConflictingInputs {
                first: ARG_COORDS,
                second: ARG_LAT,
            }),
            (None, Some(_), Some(_)) => Err(CliError::ConflictingInputs {
                first: ARG_COORDS_FILE,
                second: ARG_LAT,
            }),
        }
    }

    /// Produce the coordinates in input order.
    pub(crate) fn load(&self) -> Result<Vec<Coordinate>, CliError> {
        match self {
            Self::Inline(json) => parse_coordinates(json, "--coords"),
            Self::File(path) => {
                let json = read_coordinates_file(path)?;
                parse_coordinates(&json, &format!("{}", path.display()))
            }
            Self::Single(coordinate) => Ok(vec![*coordinate]),
        }
    }
}

fn read_coordinates_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadCoordinates {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_coordinates(json: &str, origin: &str) -> Result<Vec<Coordinate>, CliError> {
    serde_json::from_str(json).map_err(|source| CliError::ParseCoordinates {
        origin: origin.to_owned(),
        source,
    })
}

/// Resolved `trail` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrailConfig {
    /// Coordinate source.
    pub(crate) input: TrailInput,
    /// Provider settings.
    pub(crate) nominatim: NominatimConfig,
    /// Resolver pacing and caching settings.
    pub(crate) resolver: ResolverConfig,
}

impl TryFrom<TrailArgs> for TrailConfig {
    type Error = CliError;

    fn try_from(args: TrailArgs) -> Result<Self, Self::Error> {
        let input = TrailInput::from_args(&args)?;

        let mut nominatim = NominatimConfig::default();
        if let Some(base_url) = args.nominatim_url {
            nominatim.base_url = base_url;
        }
        if let Some(user_agent) = args.user_agent {
            nominatim = nominatim.with_user_agent(user_agent);
        }
        if let Some(secs) = args.timeout_secs {
            nominatim = nominatim.with_timeout(Duration::from_secs(secs));
        }

        let mut resolver = ResolverConfig::default();
        if let Some(ms) = args.delay_ms {
            resolver = resolver.with_polite_delay(Duration::from_millis(ms));
        }
        if let Some(count) = args.max_concurrent {
            let limit = NonZeroUsize::new(count).ok_or(CliError::InvalidArgument {
                field: ARG_MAX_CONCURRENT,
                reason: "must be at least 1",
            })?;
            resolver = resolver.with_max_concurrent_lookups(limit);
        }
        if let Some(secs) = args.negative_ttl_secs {
            let policy = if secs == 0 {
                NegativeCachePolicy::Disabled
            } else {
                NegativeCachePolicy::Ttl(Duration::from_secs(secs))
            };
            resolver = resolver.with_negative_cache(policy);
        }

        Ok(Self {
            input,
            nominatim,
            resolver,
        })
    }
}

/// Builds a geocoder for the current trail invocation.
pub(crate) trait GeocoderBuilder {
    fn build(&self, config: &NominatimConfig) -> Result<Box<dyn ReverseGeocoder>, CliError>;
}

pub(crate) struct DefaultGeocoderBuilder;

impl GeocoderBuilder for DefaultGeocoderBuilder {
    fn build(&self, config: &NominatimConfig) -> Result<Box<dyn ReverseGeocoder>, CliError> {
        let geocoder = NominatimGeocoder::with_config(config.clone()).map_err(|source| {
            CliError::BuildGeocoder {
                base_url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(geocoder))
    }
}

pub(crate) async fn run_trail(args: TrailArgs) -> Result<(), CliError> {
    let builder = DefaultGeocoderBuilder;
    let mut stdout = std::io::stdout().lock();
    run_trail_with(args, &builder, &mut stdout).await
}

pub(crate) async fn run_trail_with(
    args: TrailArgs,
    builder: &dyn GeocoderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let trail = execute_trail(&config, builder).await?;
    write_trail(writer, &trail)
}

async fn execute_trail(
    config: &TrailConfig,
    builder: &dyn GeocoderBuilder,
) -> Result<SightingTrail, CliError> {
    let coordinates = config.input.load()?;
    let geocoder = builder.build(&config.nominatim)?;
    let resolver = AddressResolver::with_config(geocoder, config.resolver.clone());
    info!("resolving a trail of {} sightings", coordinates.len());
    Ok(SightingTrail::resolve(&resolver, &coordinates).await)
}

fn write_trail(writer: &mut dyn Write, trail: &SightingTrail) -> Result<(), CliError> {
    for entry in trail {
        writeln!(writer, "{entry}").map_err(CliError::WriteTrailOutput)?;
    }
    writer.flush().map_err(CliError::WriteTrailOutput)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<TrailConfig, CliError> {
    let merged = TrailArgs::merge_from_layers(layers).map_err(CliError::from)?;
    TrailConfig::try_from(merged)
}
