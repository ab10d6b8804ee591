//! In-memory track registry
//!
//! Tracks are keyed by integer IDs handed out in strictly increasing order
//! starting at 0. The registry only grows: there is no update or delete.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::tracks::Track;

pub type TrackId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("track {0} not found")]
    NotFound(TrackId),
}

/// Hands out unique, strictly increasing IDs starting at 0
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> TrackId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    ids: IdAllocator,
    tracks: BTreeMap<TrackId, Arc<Track>>,
}

/// Shared handle to the track registry; clones refer to the same registry
///
/// A single lock covers both ID allocation and insertion, so an ID is never
/// observable before its track is.
#[derive(Debug, Clone, Default)]
pub struct TrackStore {
    state: Arc<RwLock<StoreState>>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a track under a freshly allocated ID and return the ID
    pub fn add(&self, track: Track) -> TrackId {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let id = state.ids.next_id();
        state.tracks.insert(id, Arc::new(track));
        id
    }

    pub fn get(&self, id: TrackId) -> Result<Arc<Track>, StoreError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.tracks.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// All IDs in ascending order
    pub fn list_ids(&self) -> Vec<TrackId> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.tracks.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
