//! In-memory memo of resolved addresses keyed by [`CoordinateKey`].
//!
//! The cache is owned by whoever composes the resolver; there is no global
//! instance. Successful resolutions never expire. Fallback labels written
//! after a failed lookup are governed by a [`NegativeCachePolicy`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::coordinate::CoordinateKey;

/// How a cached address was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The provider answered and an address was formatted from its reply.
    Resolved,
    /// The lookup failed and the numeric fallback label was stored.
    Fallback,
}

/// Policy applied to cached fallback labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeCachePolicy {
    /// Keep fallbacks for the lifetime of the cache; failed keys are never
    /// retried.
    #[default]
    Permanent,
    /// Serve a fallback until it is older than the given duration, then
    /// retry the lookup.
    Ttl(Duration),
    /// Never serve fallbacks from the cache; every request retries.
    Disabled,
}

impl NegativeCachePolicy {
    fn serves(self, stored_at: Instant, now: Instant) -> bool {
        match self {
            Self::Permanent => true,
            Self::Ttl(ttl) => now.saturating_duration_since(stored_at) < ttl,
            Self::Disabled => false,
        }
    }
}

/// A cache entry together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAddress {
    /// Address string returned to callers.
    pub address: String,
    /// Whether the address came from the provider or the fallback.
    pub outcome: LookupOutcome,
    /// When the entry was written.
    pub stored_at: Instant,
}

/// Process-local memo of coordinate lookups.
///
/// All access goes through an internal mutex, so a single cache can be
/// shared between concurrent callers. The lock is never held across an
/// `.await`.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<CoordinateKey, CachedAddress>>,
    policy: NegativeCachePolicy,
}

impl ResolutionCache {
    /// Create an empty cache applying `policy` to fallback entries.
    #[must_use]
    pub fn new(policy: NegativeCachePolicy) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            policy,
        }
    }

    /// Policy applied to fallback entries.
    #[must_use]
    pub const fn policy(&self) -> NegativeCachePolicy {
        self.policy
    }

    /// Return the address for `key` if the cache may serve it.
    ///
    /// Resolved entries are always served. Fallback entries are served
    /// according to the negative-cache policy.
    #[must_use]
    pub fn lookup(&self, key: &CoordinateKey) -> Option<String> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .filter(|entry| match entry.outcome {
                LookupOutcome::Resolved => true,
                LookupOutcome::Fallback => self.policy.serves(entry.stored_at, now),
            })
            .map(|entry| entry.address.clone())
    }

    /// Record `address` for `key`, replacing any previous entry.
    pub fn store(&self, key: CoordinateKey, address: impl Into<String>, outcome: LookupOutcome) {
        let entry = CachedAddress {
            address: address.into(),
            outcome,
            stored_at: Instant::now(),
        };
        self.lock().insert(key, entry);
    }

    /// Inspect the raw entry for `key`, ignoring the policy.
    #[must_use]
    pub fn peek(&self, key: &CoordinateKey) -> Option<CachedAddress> {
        self.lock().get(key).cloned()
    }

    /// Number of stored entries, including expired fallbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CoordinateKey, CachedAddress>> {
        // Entries are plain values; a panic mid-insert cannot leave them torn.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
