use crate::locks::PlaylistLocks;
use crate::{playlist_items, playlists, videos};
use async_trait::async_trait;
use reel_core::{
    error::Result,
    storage::{PlaylistItemStore, PlaylistStore, VideoStore},
    types::*,
    PlaylistItemValidator, ReelError, Validator,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Local storage context using `SQLite`
///
/// Cheap to clone; clones share the pool and the playlist locks, so every
/// clone sees the same write serialization.
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
    validator: Arc<dyn Validator<PlaylistItem>>,
    locks: Arc<PlaylistLocks>,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_validator(pool, Arc::new(PlaylistItemValidator::new()))
    }

    /// Use a custom item validator instead of the default rules
    pub fn with_validator(pool: SqlitePool, validator: Arc<dyn Validator<PlaylistItem>>) -> Self {
        Self {
            pool,
            validator,
            locks: Arc::new(PlaylistLocks::default()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Owning playlist of a stored item. An item never changes playlist, so
    /// the answer stays valid once the playlist lock is held.
    async fn owner(&self, id: &PlaylistItemId) -> Result<PlaylistId> {
        playlist_items::playlist_of(&self.pool, id)
            .await?
            .ok_or_else(|| ReelError::PlaylistItemNotFound(id.clone()))
    }
}

#[async_trait]
impl VideoStore for LocalStorageContext {
    async fn get_video(&self, id: &VideoId) -> Result<Option<Video>> {
        videos::get_by_id(&self.pool, id).await
    }

    async fn save_video(&self, video: &Video) -> Result<Video> {
        videos::save(&self.pool, video).await
    }
}

#[async_trait]
impl PlaylistStore for LocalStorageContext {
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, id).await
    }

    async fn save_playlist(&self, playlist: &Playlist) -> Result<()> {
        playlists::save(&self.pool, playlist).await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        let _guard = self.locks.acquire(id).await;
        playlists::delete(&self.pool, id).await
    }
}

#[async_trait]
impl PlaylistItemStore for LocalStorageContext {
    async fn get_item(&self, id: &PlaylistItemId) -> Result<Option<PlaylistItem>> {
        playlist_items::get_by_id(&self.pool, id).await
    }

    async fn get_items(&self, playlist_id: &PlaylistId) -> Result<Vec<PlaylistItem>> {
        playlist_items::get_by_playlist(&self.pool, playlist_id).await
    }

    async fn save_item(&self, item: &mut ItemMut<'_>) -> Result<PlaylistItemId> {
        // Rejected items must not wait on a lock
        self.validator.validate(item)?;
        let playlist_id = item.playlist_id().cloned().ok_or(ReelError::NotAttached)?;

        let _guard = self.locks.acquire(&playlist_id).await;
        playlist_items::create(&self.pool, self.validator.as_ref(), item).await
    }

    async fn update_item(&self, item: &PlaylistItem) -> Result<()> {
        self.validator.validate(item)?;
        let id = item.id().ok_or(ReelError::Unsaved)?;
        let playlist_id = self.owner(id).await?;

        let _guard = self.locks.acquire(&playlist_id).await;
        playlist_items::update(&self.pool, self.validator.as_ref(), item).await
    }

    async fn delete_item(&self, id: &PlaylistItemId) -> Result<()> {
        let playlist_id = self.owner(id).await?;

        let _guard = self.locks.acquire(&playlist_id).await;
        playlist_items::delete(&self.pool, id).await
    }

    async fn delete_items(&self, ids: &[PlaylistItemId]) -> Result<()> {
        let mut owners = Vec::with_capacity(ids.len());
        for id in ids {
            owners.push(self.owner(id).await?);
        }

        let _guards = self.locks.acquire_many(&owners).await;
        playlist_items::delete_many(&self.pool, ids).await
    }

    async fn move_item(&self, id: &PlaylistItemId, sequence: Sequence) -> Result<()> {
        let playlist_id = self.owner(id).await?;

        let _guard = self.locks.acquire(&playlist_id).await;
        playlist_items::move_to(&self.pool, id, sequence).await
    }
}
