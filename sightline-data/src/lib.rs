//! Provider adapters for the Sightline address resolver.
//!
//! The [`nominatim`] module implements
//! [`ReverseGeocoder`](sightline_core::ReverseGeocoder) against the
//! Nominatim reverse endpoint.

pub mod nominatim;
