//! Error types emitted by the Sightline CLI.

use std::path::PathBuf;
use std::sync::Arc;

use sightline_data::nominatim::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the Sightline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// More than one coordinate source was supplied.
    #[error("--{first} cannot be combined with --{second}")]
    ConflictingInputs {
        first: &'static str,
        second: &'static str,
    },
    /// An option carried a value outside its accepted range.
    #[error("invalid value for --{field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },
    /// Reading the coordinates file failed.
    #[error("failed to read coordinates from {path:?}: {source}")]
    ReadCoordinates {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Coordinates JSON could not be decoded.
    #[error("failed to parse coordinates JSON from {origin}: {source}")]
    ParseCoordinates {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    /// Constructing the geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Writing the trail output failed.
    #[error("failed to write trail output: {0}")]
    WriteTrailOutput(#[source] std::io::Error),
}
