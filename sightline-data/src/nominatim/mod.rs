//! Reverse geocoding through Nominatim.
//!
//! This module provides [`NominatimGeocoder`], an implementation of
//! [`sightline_core::ReverseGeocoder`] that queries the `/reverse` endpoint of
//! a Nominatim server (the public OpenStreetMap instance by default).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use sightline_core::{AddressResolver, Coordinate};
//! use sightline_data::nominatim::{NominatimConfig, NominatimGeocoder};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NominatimConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("dog-sightings/1.0 (ops@example.com)");
//! let resolver = AddressResolver::new(NominatimGeocoder::with_config(config)?);
//!
//! let address = resolver.resolve_one(Coordinate::new(-23.527, -46.933)).await;
//! println!("{address}");
//! # Ok(())
//! # }
//! ```

mod provider;
mod response;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, DEFAULT_ZOOM, NominatimConfig, NominatimGeocoder,
    ProviderBuildError,
};
pub use response::ReverseResponse;
