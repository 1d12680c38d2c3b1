//! Storage interfaces consumed by the sequencing core

use crate::error::{ReelError, Result};
use crate::types::{
    ItemMut, Playlist, PlaylistId, PlaylistItem, PlaylistItemId, Sequence, Video, VideoId,
};
use async_trait::async_trait;

/// Shared video metadata.
///
/// Videos are insert-only: once a video id is stored its fields never change.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Get a video by its external ID
    async fn get_video(&self, id: &VideoId) -> Result<Option<Video>>;

    /// Store `video` unless its ID is already known.
    ///
    /// Returns the stored record, which is the earlier one when the ID
    /// already existed.
    async fn save_video(&self, video: &Video) -> Result<Video>;
}

/// Playlist containers
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Get a playlist with its items in sequence order
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Insert or update the playlist row. Items are persisted separately.
    async fn save_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Delete a playlist and every item in it
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()>;
}

/// Persistence gateway for playlist items.
///
/// Writes are validated before any storage access, and every write runs in
/// one transaction together with the sequence repair it needs.
#[async_trait]
pub trait PlaylistItemStore: Send + Sync {
    /// Get an item by ID
    async fn get_item(&self, id: &PlaylistItemId) -> Result<Option<PlaylistItem>>;

    /// Items of a playlist ordered by sequence
    async fn get_items(&self, playlist_id: &PlaylistId) -> Result<Vec<PlaylistItem>>;

    /// Insert a new item and assign its identity
    async fn save_item(&self, item: &mut ItemMut<'_>) -> Result<PlaylistItemId>;

    /// Overwrite the title and sequence of a saved item
    async fn update_item(&self, item: &PlaylistItem) -> Result<()>;

    /// Delete an item and repair its siblings' sequences
    async fn delete_item(&self, id: &PlaylistItemId) -> Result<()>;

    /// Delete several items in one transaction
    async fn delete_items(&self, ids: &[PlaylistItemId]) -> Result<()>;

    /// Move a saved item to `sequence`, shifting the items in between
    async fn move_item(&self, id: &PlaylistItemId, sequence: Sequence) -> Result<()>;

    /// Delete a saved item and remove it from the in-memory `playlist` too,
    /// so both copies are repaired the same way.
    ///
    /// Fails with `PlaylistItemNotFound` before touching storage when the item
    /// is not in `playlist`.
    async fn remove_from_playlist(
        &self,
        playlist: &mut Playlist,
        id: &PlaylistItemId,
    ) -> Result<PlaylistItem> {
        if playlist.find(id).is_none() {
            return Err(ReelError::PlaylistItemNotFound(id.clone()));
        }
        self.delete_item(id).await?;
        playlist
            .remove_item(id)?
            .ok_or_else(|| ReelError::PlaylistItemNotFound(id.clone()))
    }
}
