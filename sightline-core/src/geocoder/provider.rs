//! Reverse-geocoding port implemented by provider adapters.

use async_trait::async_trait;

use crate::address::PlaceDetails;
use crate::coordinate::Coordinate;

use super::error::GeocodeError;

/// Fetch place details for a single coordinate.
///
/// Implementations perform exactly one provider request per call; pacing,
/// caching and deduplication are the resolver's concern.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use sightline_core::{
///     AddressComponents, Coordinate, GeocodeError, PlaceDetails, ReverseGeocoder,
/// };
///
/// struct FixedTown;
///
/// #[async_trait]
/// impl ReverseGeocoder for FixedTown {
///     async fn reverse(&self, _coordinate: Coordinate) -> Result<PlaceDetails, GeocodeError> {
///         Ok(PlaceDetails::with_address(AddressComponents {
///             town: Some("Cotia".into()),
///             ..AddressComponents::default()
///         }))
///     }
/// }
/// ```
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Return the place details for `coordinate`.
    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceDetails, GeocodeError>;
}

#[async_trait]
impl<G> ReverseGeocoder for std::sync::Arc<G>
where
    G: ReverseGeocoder + ?Sized,
{
    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceDetails, GeocodeError> {
        (**self).reverse(coordinate).await
    }
}

#[async_trait]
impl<G> ReverseGeocoder for Box<G>
where
    G: ReverseGeocoder + ?Sized,
{
    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceDetails, GeocodeError> {
        (**self).reverse(coordinate).await
    }
}
