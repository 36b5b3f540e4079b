// Gitabase Reader - Scripture Library Core
// Copyright (C) 2025 Gitabase contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Bounded cache of open Gitabase handles
//!
//! Readers hop between databases (texts in two languages, the help
//! database, the shop listing), and opening SQLite on every query is too
//! slow on device storage. The cache keeps up to `capacity` handles open,
//! access-ordered: a `get` refreshes recency, and a miss at capacity closes
//! the least recently used handle before opening the new one.
//!
//! One mutex serializes every operation, and it stays held across the open
//! itself, so the same id can never be opened twice concurrently and the
//! open-handle ceiling is never exceeded, not even transiently.

use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::Path;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::identity::GitabaseId;
use crate::storage::handle::GitabaseHandle;

/// Default number of simultaneously open databases
pub const DEFAULT_MAX_OPEN_HANDLES: usize = 3;

struct CacheState {
    inner: LruCache<GitabaseId, GitabaseHandle>,
}

/// LRU cache of open database handles, keyed by identity
pub struct ConnectionCache {
    state: Mutex<CacheState>,
}

impl ConnectionCache {
    /// Create a cache holding at most `capacity` open handles
    ///
    /// A zero capacity is clamped to one; a cache that can hold nothing
    /// cannot satisfy any `get`.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                inner: LruCache::new(capacity),
            }),
        }
    }

    /// Get the handle for `id`, opening the file at `path` on a miss
    ///
    /// A hit refreshes recency and returns a clone of the cached handle. A
    /// miss at capacity first evicts and closes the least recently used
    /// entry, then opens `path` read-only and inserts the new handle as
    /// most recently used. Eviction is best-effort and never fails the
    /// `get` that triggered it.
    pub async fn get(&self, id: &GitabaseId, path: &Path) -> Result<GitabaseHandle> {
        let mut state = self.state.lock().await;

        if let Some(handle) = state.inner.get(id) {
            tracing::debug!(gitabase = %id, "connection cache hit");
            return Ok(handle.clone());
        }

        if state.inner.len() >= state.inner.cap().get() {
            if let Some((evicted_id, evicted)) = state.inner.pop_lru() {
                tracing::info!(evicted = %evicted_id, "evicting least recently used gitabase");
                evicted.close().await;
            }
        }

        let handle = GitabaseHandle::open(id.clone(), path).await?;
        state.inner.put(id.clone(), handle.clone());
        tracing::debug!(gitabase = %id, open = state.inner.len(), "opened and cached gitabase");
        Ok(handle)
    }

    /// Close and drop the handle for `id`, if cached
    ///
    /// Safe to call for ids that were never cached or were already closed.
    pub async fn close(&self, id: &GitabaseId) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.inner.pop(id) {
            handle.close().await;
            tracing::debug!(gitabase = %id, "closed cached gitabase");
        }
    }

    /// Close every cached handle whose id is not in `keep`
    ///
    /// Used after a rescan so handles for databases that vanished from the
    /// folder do not linger open.
    pub async fn retain(&self, keep: &HashSet<GitabaseId>) {
        let mut state = self.state.lock().await;

        let stale: Vec<GitabaseId> = state
            .inner
            .iter()
            .filter(|(id, _)| !keep.contains(id))
            .map(|(id, _)| id.clone())
            .collect();

        for id in stale {
            if let Some(handle) = state.inner.pop(&id) {
                handle.close().await;
                tracing::info!(gitabase = %id, "closed gitabase missing from latest scan");
            }
        }
    }

    /// Close and drop every cached handle
    pub async fn close_all(&self) {
        let mut state = self.state.lock().await;
        while let Some((id, handle)) = state.inner.pop_lru() {
            handle.close().await;
            tracing::debug!(gitabase = %id, "closed cached gitabase");
        }
    }

    /// Number of currently open handles
    pub async fn len(&self) -> usize {
        self.state.lock().await.inner.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.inner.is_empty()
    }

    /// Whether `id` is cached, without touching its recency
    pub async fn contains(&self, id: &GitabaseId) -> bool {
        self.state.lock().await.inner.contains(id)
    }

    /// Maximum number of simultaneously open handles
    pub async fn capacity(&self) -> usize {
        self.state.lock().await.inner.cap().get()
    }
}

impl Default for ConnectionCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OPEN_HANDLES)
    }
}
