//! Look up place details for a coordinate.
//!
//! The [`ReverseGeocoder`] trait abstracts the provider behind the resolver.
//! Implementations report transport, status and decoding failures through
//! [`GeocodeError`]; the resolver collapses all of them into the same
//! numeric fallback.

mod error;
mod provider;

pub use error::GeocodeError;
pub use provider::ReverseGeocoder;
