//! Shared test harness modules for the Sightline CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use crate::trail::{
    GeocoderBuilder, TrailConfig, TrailInput, config_from_layers_for_test, run_trail_with,
};

mod helpers;
mod trail_steps;
