//! TTL response cache for rendered page views.
//!
//! Entries expire lazily: an expired entry is dropped the next time its key
//! is read. Values are cloned out, so callers store cheap handles
//! (`Arc<...>`) rather than large payloads.

mod lock;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::config::{CacheConfig, MAX_CACHE_TTL_SECS};
use crate::metrics::CACHE_REQUESTS;
use lock::mutex_lock;

/// Named cache slots. Each holds one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheSlot {
    Index,
    TrendingMovies,
    BrowseMovies,
}

impl CacheSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheSlot::Index => "index",
            CacheSlot::TrendingMovies => "trendingMovies",
            CacheSlot::BrowseMovies => "browseMovies",
        }
    }
}

impl fmt::Display for CacheSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a lookup was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    /// Cache disabled or request not cacheable.
    Bypass,
}

impl CacheOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Bypass => "bypass",
        }
    }
}

/// Record a lookup outcome for a slot.
pub fn record(slot: CacheSlot, outcome: CacheOutcome) {
    CACHE_REQUESTS
        .with_label_values(&[slot.as_str(), outcome.as_str()])
        .inc();
}

struct CacheEntry<V> {
    value: V,
    /// `None` when the deadline is past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Key-value cache with a fixed time-to-live per entry.
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<CacheSlot, CacheEntry<V>>>,
    ttl: Duration,
    max_entries: usize,
    enabled: bool,
}

impl<V: Clone> ResponseCache<V> {
    /// `ttl` is capped at [`MAX_CACHE_TTL_SECS`].
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: ttl.min(Duration::from_secs(MAX_CACHE_TTL_SECS)),
            max_entries: max_entries.max(1),
            enabled: true,
        }
    }

    /// Build from configuration; a disabled cache never stores anything.
    pub fn from_config(config: &CacheConfig) -> Self {
        let mut cache = Self::new(config.ttl(), config.max_entries);
        cache.enabled = config.enabled;
        cache
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for a slot, if any.
    pub fn get(&self, slot: CacheSlot) -> Option<V> {
        if !self.enabled {
            return None;
        }
        let mut entries = mutex_lock(&self.entries, "get");
        match entries.get(&slot) {
            Some(entry) if entry.is_fresh(Instant::now()) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&slot);
                debug!(slot = %slot, "Cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Store a value, replacing any previous one and restarting its TTL.
    pub fn set(&self, slot: CacheSlot, value: V) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        let mut entries = mutex_lock(&self.entries, "set");

        if !entries.contains_key(&slot) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| entry.is_fresh(now));
            if entries.len() >= self.max_entries {
                let evict = entries
                    .iter()
                    .min_by_key(|(_, entry)| (entry.expires_at.is_none(), entry.expires_at))
                    .map(|(slot, _)| *slot);
                if let Some(evict) = evict {
                    entries.remove(&evict);
                }
            }
        }

        entries.insert(
            slot,
            CacheEntry {
                value,
                expires_at: now.checked_add(self.ttl),
            },
        );
    }

    pub fn clear(&self) {
        mutex_lock(&self.entries, "clear").clear();
    }

    /// Entries currently held, expired ones included until they are read.
    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached value for `slot`, or compute and store it.
    ///
    /// The lock is not held while `compute` runs. Errors are returned to the
    /// caller and never stored; the next call computes again.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        slot: CacheSlot,
        compute: F,
    ) -> Result<(V, CacheOutcome), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !self.enabled {
            let value = compute().await?;
            record(slot, CacheOutcome::Bypass);
            return Ok((value, CacheOutcome::Bypass));
        }

        if let Some(value) = self.get(slot) {
            record(slot, CacheOutcome::Hit);
            return Ok((value, CacheOutcome::Hit));
        }

        record(slot, CacheOutcome::Miss);
        let value = compute().await?;
        self.set(slot, value.clone());
        debug!(slot = %slot, ttl = ?self.ttl, "Cached response");
        Ok((value, CacheOutcome::Miss))
    }
}
