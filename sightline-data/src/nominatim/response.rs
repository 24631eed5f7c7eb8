//! Nominatim reverse API response types.
//!
//! This module provides deserialisation types for the `format=jsonv2`
//! response of the `/reverse` endpoint. Only the fields needed to compose a
//! short address are kept; everything else is ignored.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Reverse/>

use serde::Deserialize;
use sightline_core::{AddressComponents, PlaceDetails};

/// Nominatim reverse API response.
///
/// Successful lookups carry `display_name` and, with `addressdetails=1`, an
/// `address` object. Coordinates the server cannot place (for example open
/// sea) produce `{"error": "Unable to geocode"}` with a success status.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReverseResponse {
    /// Structured address breakdown.
    pub address: Option<AddressComponents>,
    /// Full, comma-separated description of the place.
    pub display_name: Option<String>,
    /// Error reported in place of a result.
    pub error: Option<String>,
}

impl ReverseResponse {
    /// Whether the server reported that it could not place the coordinate.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Convert into provider-neutral place details.
    ///
    /// An error response yields empty details so the caller falls back to
    /// the coordinate.
    #[must_use]
    pub fn into_place(self) -> PlaceDetails {
        if self.is_error() {
            return PlaceDetails::default();
        }
        PlaceDetails {
            address: self.address,
            display_name: self.display_name,
        }
    }
}
