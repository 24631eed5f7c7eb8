//! Test utilities for reverse geocoders.
//!
//! This module provides [`StubGeocoder`], a deterministic test double for
//! [`ReverseGeocoder`] that returns pre-configured responses without making
//! HTTP requests, and records when each call started and finished.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
    AddressComponents, Coordinate, CoordinateKey, GeocodeError, PlaceDetails, ReverseGeocoder,
};

/// A single call observed by [`StubGeocoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Coordinate passed to the geocoder.
    pub coordinate: Coordinate,
    /// When the call was entered.
    pub started_at: Instant,
    /// When the call returned.
    pub finished_at: Instant,
}

/// Stub `ReverseGeocoder` for testing.
///
/// Responses can be configured per coordinate key; every other coordinate
/// receives the default response. An optional latency is awaited inside each
/// call so tests can observe pacing on a paused Tokio clock.
///
/// # Example
///
/// ```
/// use sightline_core::test_support::StubGeocoder;
/// use sightline_core::{Coordinate, ReverseGeocoder};
///
/// # tokio_test_block_on(async {
/// let stub = StubGeocoder::with_display_name("X, Y, Z");
/// let place = stub.reverse(Coordinate::new(0.0, 0.0)).await.unwrap();
/// assert_eq!(place.display_name.as_deref(), Some("X, Y, Z"));
/// assert_eq!(stub.call_count(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread()
/// #         .enable_all()
/// #         .build()
/// #         .unwrap()
/// #         .block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct StubGeocoder {
    default_response: Result<PlaceDetails, GeocodeError>,
    responses: HashMap<CoordinateKey, Result<PlaceDetails, GeocodeError>>,
    latency: Duration,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubGeocoder {
    /// Create a stub that answers every coordinate with `place`.
    #[must_use]
    pub fn with_place(place: PlaceDetails) -> Self {
        Self::with_response(Ok(place))
    }

    /// Create a stub that fails every coordinate with `error`.
    #[must_use]
    pub fn with_error(error: GeocodeError) -> Self {
        Self::with_response(Err(error))
    }

    /// Create a stub answering with only a display name.
    #[must_use]
    pub fn with_display_name(display_name: &str) -> Self {
        Self::with_place(PlaceDetails::with_display_name(display_name))
    }

    /// Create a stub answering with a structured address naming `road`.
    #[must_use]
    pub fn with_road(road: &str) -> Self {
        Self::with_place(PlaceDetails::with_address(AddressComponents {
            road: Some(road.to_owned()),
            ..AddressComponents::default()
        }))
    }

    /// Create a stub whose requests are refused at the transport level.
    #[must_use]
    pub fn refusing() -> Self {
        Self::with_error(GeocodeError::Network {
            url: "http://stub.invalid/reverse".to_owned(),
            message: "connection refused".to_owned(),
        })
    }

    fn with_response(default_response: Result<PlaceDetails, GeocodeError>) -> Self {
        Self {
            default_response,
            responses: HashMap::new(),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Answer `coordinate` with `place` instead of the default response.
    #[must_use]
    pub fn respond_to(mut self, coordinate: Coordinate, place: PlaceDetails) -> Self {
        self.responses.insert(coordinate.key(), Ok(place));
        self
    }

    /// Fail `coordinate` with `error` instead of the default response.
    #[must_use]
    pub fn fail_for(mut self, coordinate: Coordinate, error: GeocodeError) -> Self {
        self.responses.insert(coordinate.key(), Err(error));
        self
    }

    /// Simulate a provider round trip of `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Calls received so far, in completion order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    /// Highest number of calls observed running at the same time.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<PlaceDetails, GeocodeError> {
        let started_at = Instant::now();
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.lock_calls().push(RecordedCall {
            coordinate,
            started_at,
            finished_at: Instant::now(),
        });
        self.responses
            .get(&coordinate.key())
            .unwrap_or(&self.default_response)
            .clone()
    }
}
