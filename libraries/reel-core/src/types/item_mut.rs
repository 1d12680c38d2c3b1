//! Restricted mutable access to a playlist item

use super::ids::PlaylistItemId;
use super::playlist_item::PlaylistItem;
use super::video::Video;
use crate::error::Result;
use std::ops::Deref;

/// Mutable handle to a playlist item.
///
/// Only the title, the identity, and the video can change through it. The
/// sequence and the owning playlist stay with the sequencer, and the item
/// cannot be swapped out of its slot.
#[derive(Debug)]
pub struct ItemMut<'a> {
    item: &'a mut PlaylistItem,
}

impl<'a> ItemMut<'a> {
    pub(crate) fn new(item: &'a mut PlaylistItem) -> Self {
        Self { item }
    }

    /// Rename the item
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.item.set_title(title);
    }

    /// Record the identity handed out by the store
    ///
    /// # Errors
    /// `AlreadyPersisted` when the item already has an identity.
    pub fn assign_id(&mut self, id: PlaylistItemId) -> Result<()> {
        self.item.assign_id(id)
    }

    /// Swap in the authoritative video record returned by the store
    pub fn replace_video(&mut self, video: Video) {
        self.item.replace_video(video);
    }
}

impl Deref for ItemMut<'_> {
    type Target = PlaylistItem;

    fn deref(&self) -> &PlaylistItem {
        self.item
    }
}

/// Items outside any playlist are the caller's to change freely
impl<'a> From<&'a mut PlaylistItem> for ItemMut<'a> {
    fn from(item: &'a mut PlaylistItem) -> Self {
        Self::new(item)
    }
}
