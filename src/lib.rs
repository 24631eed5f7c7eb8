//! Facade crate for the Sightline address resolver.
//!
//! This crate re-exports the core domain types and exposes the optional
//! Nominatim adapter behind a feature flag.

#![forbid(unsafe_code)]

pub use sightline_core::{
    AddressComponents, AddressResolver, CachedAddress, Coordinate, CoordinateKey, GeocodeError,
    LookupOutcome, NegativeCachePolicy, PlaceDetails, ResolutionCache, ResolvedAddresses,
    ResolverConfig, ReverseGeocoder, SightingTrail, TrailEntry, fallback_label, short_address,
};

#[cfg(feature = "nominatim")]
pub use sightline_data::nominatim::{NominatimConfig, NominatimGeocoder, ProviderBuildError};
