//! TTL'd cache of composed public pages.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use super::hook::{CacheError, InvalidationHook};
use super::path::PathSpec;

#[derive(Debug, Clone)]
struct CachedPage {
    body: Arc<Value>,
    cached_at: Instant,
}

/// In-memory page cache keyed by logical render path.
///
/// Every invalidation advances a generation counter. Callers read
/// [`generation`](Self::generation) before composing a page and hand it to
/// [`insert`](Self::insert), which refuses bodies composed before an
/// invalidation that ran while they were being built.
#[derive(Debug)]
pub struct RenderCache {
    pages: DashMap<String, CachedPage>,
    ttl: Duration,
    max_entries: usize,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidated: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidated: u64,
}

impl RenderCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            pages: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidated: AtomicU64::new(0),
        }
    }

    /// Returns the cached body for `path` unless it is missing or expired.
    pub fn get(&self, path: &str) -> Option<Arc<Value>> {
        let fresh = self.pages.get(path).and_then(|entry| {
            (entry.cached_at.elapsed() <= self.ttl).then(|| Arc::clone(&entry.body))
        });
        match fresh {
            Some(body) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(body)
            }
            None => {
                // Drop an expired entry, if any. The read guard above is released.
                self.pages
                    .remove_if(path, |_, entry| entry.cached_at.elapsed() > self.ttl);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Current invalidation generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Stores a body composed while `generation` was current. Returns `false`
    /// (and stores nothing) when an invalidation has happened since.
    pub fn insert(&self, path: impl Into<String>, body: Arc<Value>, generation: u64) -> bool {
        if self.generation() != generation {
            return false;
        }
        let path = path.into();
        if self.pages.len() >= self.max_entries && !self.pages.contains_key(&path) {
            self.evict();
        }
        self.pages.insert(
            path.clone(),
            CachedPage {
                body: Arc::clone(&body),
                cached_at: Instant::now(),
            },
        );
        // An invalidation may have slipped in between the check and the write.
        if self.generation() != generation {
            self.pages
                .remove_if(&path, |_, entry| Arc::ptr_eq(&entry.body, &body));
            return false;
        }
        true
    }

    /// Removes every cached path matched by any of `specs`. Returns how many
    /// entries were dropped.
    pub fn invalidate_matching(&self, specs: &[PathSpec]) -> usize {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let before = self.pages.len();
        self.pages
            .retain(|path, _| !specs.iter().any(|spec| spec.matches(path)));
        let removed = before.saturating_sub(self.pages.len());
        self.invalidated.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.pages.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidated: self.invalidated.load(Ordering::Relaxed),
        }
    }

    /// Makes room for one entry: expired pages first, then the oldest.
    fn evict(&self) {
        self.pages
            .retain(|_, entry| entry.cached_at.elapsed() <= self.ttl);
        if self.pages.len() < self.max_entries {
            return;
        }
        let oldest = self
            .pages
            .iter()
            .min_by_key(|entry| entry.cached_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.pages.remove(&key);
        }
    }
}

#[async_trait]
impl InvalidationHook for RenderCache {
    async fn invalidate(&self, paths: &[PathSpec]) -> Result<(), CacheError> {
        let removed = self.invalidate_matching(paths);
        tracing::debug!(
            specs = ?paths.iter().map(ToString::to_string).collect::<Vec<_>>(),
            removed,
            "render cache invalidated"
        );
        Ok(())
    }
}
