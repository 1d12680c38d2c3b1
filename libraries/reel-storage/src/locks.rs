//! Per-playlist write serialization
//!
//! Two writers appending to the same playlist would both read the same item
//! count. Every write that reads or shifts sequences holds the playlist's
//! guard for the whole transaction.
//!
//! An entry whose mutex nobody holds or waits for is only referenced by the
//! map itself; such entries are dropped on the next acquire.

use reel_core::PlaylistId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct PlaylistLocks {
    locks: Mutex<HashMap<PlaylistId, Arc<AsyncMutex<()>>>>,
}

impl PlaylistLocks {
    /// Wait for exclusive write access to `playlist_id`
    pub(crate) async fn acquire(&self, playlist_id: &PlaylistId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(playlist_id.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Guards for several playlists, taken in id order so two batch writers
    /// cannot deadlock each other
    pub(crate) async fn acquire_many(&self, playlist_ids: &[PlaylistId]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids = playlist_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in &ids {
            guards.push(self.acquire(id).await);
        }
        guards
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
