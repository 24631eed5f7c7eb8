//! Test helpers shared by the trail unit and behaviour tests.

use super::*;
use std::sync::Arc;

use sightline_core::test_support::StubGeocoder;
use sightline_core::ReverseGeocoder;
use sightline_data::nominatim::NominatimConfig;

/// Hands out clones of a shared stub so tests can inspect calls afterwards.
#[derive(Debug)]
pub(super) struct StubGeocoderBuilder {
    pub(super) stub: Arc<StubGeocoder>,
    pub(super) seen_config: std::cell::RefCell<Option<NominatimConfig>>,
}

impl StubGeocoderBuilder {
    pub(super) fn new(stub: StubGeocoder) -> Self {
        Self {
            stub: Arc::new(stub),
            seen_config: std::cell::RefCell::new(None),
        }
    }
}

impl GeocoderBuilder for StubGeocoderBuilder {
    fn build(&self, config: &NominatimConfig) -> Result<Box<dyn ReverseGeocoder>, CliError> {
        self.seen_config.replace(Some(config.clone()));
        Ok(Box::new(Arc::clone(&self.stub)))
    }
}

/// Drive a future to completion on a current-thread runtime.
pub(super) fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
        .block_on(future)
}

/// Parse `argv` and run the trail command against `builder`, capturing stdout.
pub(super) fn run_trail_argv(
    argv: &[&str],
    builder: &StubGeocoderBuilder,
) -> (Result<(), CliError>, String) {
    let mut stdout = Vec::new();
    let result = Cli::try_parse_from(argv)
        .map_err(CliError::from)
        .and_then(|cli| match cli.command {
            Command::Trail(args) => block_on(run_trail_with(args, builder, &mut stdout)),
        });
    let output = String::from_utf8(stdout).expect("stdout utf-8");
    (result, output)
}
