// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for derived address ranges.
//!
//! Address discovery dApps poll `avalanche_getAddressesInRange` with the
//! same clamped range over and over; deriving a hundred keys per poll is
//! wasted work. Entries expire after a TTL so a provider swap (dev to
//! production) never serves stale addresses for long.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use super::{AddressRange, DerivedAddresses};

/// Cached entry: derived addresses + insertion timestamp.
struct CacheEntry {
    addresses: DerivedAddresses,
    inserted_at: Instant,
}

/// In-process LRU cache keyed by the clamped derivation range.
pub struct AddressCache {
    cache: Mutex<LruCache<AddressRange, CacheEntry>>,
    ttl: Duration,
}

impl AddressCache {
    /// Create a new cache with the given capacity and TTL.
    ///
    /// - `capacity`: Max number of distinct ranges to cache.
    /// - `ttl`: Time-to-live for each cache entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Get the cached addresses for a range.
    ///
    /// Returns `None` if not cached or expired.
    pub fn get(&self, range: &AddressRange) -> Option<DerivedAddresses> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(range) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.addresses.clone());
            }
            // Expired entry, drop it
            cache.pop(range);
        }
        None
    }

    /// Store the derived addresses for a range.
    pub fn put(&self, range: AddressRange, addresses: DerivedAddresses) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                range,
                CacheEntry {
                    addresses,
                    inserted_at: Instant::now(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(external_start: u32) -> AddressRange {
        AddressRange {
            external_start,
            internal_start: 0,
            external_limit: 2,
            internal_limit: 1,
        }
    }

    fn addresses() -> DerivedAddresses {
        DerivedAddresses {
            external: vec!["avax1aaa".to_string(), "avax1bbb".to_string()],
            internal: vec!["avax1ccc".to_string()],
        }
    }

    #[test]
    fn cache_put_and_get() {
        let cache = AddressCache::new(10, Duration::from_secs(300));

        assert!(cache.get(&range(0)).is_none());

        cache.put(range(0), addresses());

        let result = cache.get(&range(0)).unwrap();
        assert_eq!(result.external.len(), 2);
        assert_eq!(result.internal[0], "avax1ccc");

        // A different range is a different key.
        assert!(cache.get(&range(5)).is_none());
    }

    #[test]
    fn cache_ttl_expiry() {
        let cache = AddressCache::new(10, Duration::from_millis(1));
        cache.put(range(0), addresses());

        // Wait for TTL to expire
        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get(&range(0)).is_none());
    }

    #[test]
    fn cache_evicts_least_recently_used() {
        let cache = AddressCache::new(1, Duration::from_secs(300));
        cache.put(range(0), addresses());
        cache.put(range(1), addresses());

        assert!(cache.get(&range(0)).is_none());
        assert!(cache.get(&range(1)).is_some());
    }
}
