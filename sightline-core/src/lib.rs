//! Core domain types for the Sightline address resolver.
//!
//! The resolver maps coordinates to short postal addresses through a
//! [`ReverseGeocoder`] port. Lookups are deduplicated by [`CoordinateKey`],
//! paced by a polite delay, and memoised in an explicitly owned
//! [`ResolutionCache`]. Provider failures never reach the caller; they degrade
//! to the numeric [`fallback_label`].

pub mod address;
pub mod cache;
pub mod coordinate;
pub mod geocoder;
pub mod resolver;
pub mod trail;

#[doc(hidden)]
pub mod test_support;

pub use address::{AddressComponents, PlaceDetails, short_address};
pub use cache::{CachedAddress, LookupOutcome, NegativeCachePolicy, ResolutionCache};
pub use coordinate::{Coordinate, CoordinateKey, fallback_label};
pub use geocoder::{GeocodeError, ReverseGeocoder};
pub use resolver::{AddressResolver, ResolvedAddresses, ResolverConfig};
pub use trail::{SightingTrail, TrailEntry};
