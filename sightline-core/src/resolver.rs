//! Resolve coordinates to short addresses through a [`ReverseGeocoder`].
//!
//! [`AddressResolver`] deduplicates coordinates by [`CoordinateKey`], serves
//! repeated keys from its [`ResolutionCache`], waits a polite delay before
//! every provider request, and bounds how many requests are in flight. Any
//! provider failure is absorbed and replaced with the numeric
//! [`fallback_label`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use sightline_core::test_support::StubGeocoder;
//! use sightline_core::{AddressResolver, Coordinate, ResolverConfig};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread()
//! #     .enable_all()
//! #     .build()?;
//! # runtime.block_on(async {
//! let config = ResolverConfig::default().with_polite_delay(Duration::ZERO);
//! let resolver = AddressResolver::with_config(StubGeocoder::with_road("Rua A"), config);
//!
//! let trail = [Coordinate::new(-23.527, -46.933), Coordinate::new(-23.527, -46.933)];
//! let addresses = resolver.resolve_batch(&trail).await;
//!
//! assert_eq!(addresses.len(), 1);
//! assert_eq!(resolver.geocoder().call_count(), 1);
//! # });
//! # Ok::<(), std::io::Error>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use log::{debug, warn};
use tokio::sync::Semaphore;

use crate::address::short_address;
use crate::cache::{LookupOutcome, NegativeCachePolicy, ResolutionCache};
use crate::coordinate::{Coordinate, CoordinateKey, fallback_label};
use crate::geocoder::ReverseGeocoder;

/// Mapping from each unique coordinate key to its resolved address.
pub type ResolvedAddresses = HashMap<CoordinateKey, String>;

/// Default pause before each provider request.
pub const DEFAULT_POLITE_DELAY: Duration = Duration::from_millis(250);

/// Configuration for [`AddressResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Pause before every provider request, including the first of a batch.
    pub polite_delay: Duration,
    /// Maximum number of provider requests in flight at once.
    pub max_concurrent_lookups: NonZeroUsize,
    /// How long failed lookups stay cached.
    pub negative_cache: NegativeCachePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            polite_delay: DEFAULT_POLITE_DELAY,
            max_concurrent_lookups: NonZeroUsize::MIN,
            negative_cache: NegativeCachePolicy::Permanent,
        }
    }
}

impl ResolverConfig {
    /// Set the pause before each provider request.
    #[must_use]
    pub const fn with_polite_delay(mut self, delay: Duration) -> Self {
        self.polite_delay = delay;
        self
    }

    /// Set the in-flight request bound.
    #[must_use]
    pub const fn with_max_concurrent_lookups(mut self, limit: NonZeroUsize) -> Self {
        self.max_concurrent_lookups = limit;
        self
    }

    /// Set the policy for cached fallbacks.
    #[must_use]
    pub const fn with_negative_cache(mut self, policy: NegativeCachePolicy) -> Self {
        self.negative_cache = policy;
        self
    }
}

/// Cached, paced reverse-geocoding front end.
///
/// The resolver owns its cache; share one resolver (for example behind an
/// `Arc`) to share cached results between callers. The in-flight bound
/// applies across all callers of the same resolver.
#[derive(Debug)]
pub struct AddressResolver<G> {
    geocoder: G,
    config: ResolverConfig,
    cache: ResolutionCache,
    permits: Semaphore,
}

impl<G: ReverseGeocoder> AddressResolver<G> {
    /// Create a resolver with the default configuration.
    #[must_use]
    pub fn new(geocoder: G) -> Self {
        Self::with_config(geocoder, ResolverConfig::default())
    }

    /// Create a resolver with explicit configuration.
    #[must_use]
    pub fn with_config(geocoder: G, config: ResolverConfig) -> Self {
        Self {
            cache: ResolutionCache::new(config.negative_cache),
            permits: Semaphore::new(config.max_concurrent_lookups.get()),
            geocoder,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Cache backing this resolver.
    #[must_use]
    pub const fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Underlying geocoder.
    #[must_use]
    pub const fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve a single coordinate to an address.
    ///
    /// Cached keys return immediately. Otherwise the resolver waits for a
    /// lookup permit and the polite delay, queries the geocoder and caches
    /// whatever it ends up returning. This never fails: provider errors
    /// yield the numeric fallback label.
    pub async fn resolve_one(&self, coordinate: Coordinate) -> String {
        let key = coordinate.key();
        if let Some(address) = self.cache.lookup(&key) {
            debug!("address cache hit for {key}");
            return address;
        }

        let Ok(_permit) = self.permits.acquire().await else {
            // The semaphore is owned by `self` and never closed.
            return fallback_label(coordinate);
        };
        // Another caller may have filled the key while we queued.
        if let Some(address) = self.cache.lookup(&key) {
            debug!("address cache hit for {key} after queueing");
            return address;
        }

        let (address, outcome) = self.lookup(coordinate, &key).await;
        self.cache.store(key, address.clone(), outcome);
        address
    }

    /// Resolve every unique coordinate in `coordinates`.
    ///
    /// Coordinates are deduplicated by key in first-seen order and resolved
    /// one after another (or up to `max_concurrent_lookups` at a time). A
    /// failed coordinate never stops the batch. The returned mapping holds
    /// one entry per unique key; callers re-derive keys to look up each of
    /// their original inputs.
    pub async fn resolve_batch(&self, coordinates: &[Coordinate]) -> ResolvedAddresses {
        let unique = unique_by_key(coordinates);
        debug!(
            "resolving {} unique coordinates out of {}",
            unique.len(),
            coordinates.len()
        );
        stream::iter(unique)
            .map(|(key, coordinate)| async move { (key, self.resolve_one(coordinate).await) })
            .buffered(self.config.max_concurrent_lookups.get())
            .collect()
            .await
    }

    async fn lookup(&self, coordinate: Coordinate, key: &CoordinateKey) -> (String, LookupOutcome) {
        if !self.config.polite_delay.is_zero() {
            tokio::time::sleep(self.config.polite_delay).await;
        }
        debug!("reverse geocoding {key}");
        match self.geocoder.reverse(coordinate).await {
            Ok(place) => (short_address(&place, coordinate), LookupOutcome::Resolved),
            Err(err) => {
                warn!("reverse geocoding {key} failed, using coordinates: {err}");
                (fallback_label(coordinate), LookupOutcome::Fallback)
            }
        }
    }
}

fn unique_by_key(coordinates: &[Coordinate]) -> Vec<(CoordinateKey, Coordinate)> {
    let mut seen = HashSet::with_capacity(coordinates.len());
    coordinates
        .iter()
        .map(|coordinate| (coordinate.key(), *coordinate))
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect()
}
