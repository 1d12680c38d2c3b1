//! Playlist item entity

use super::ids::{PlaylistId, PlaylistItemId};
use super::video::Video;
use crate::error::{ReelError, Result};
use serde::{Deserialize, Serialize};

/// Zero-based position of an item within its playlist
pub type Sequence = i32;

/// Sequence carried by an item that has not been added to a playlist yet
pub const UNSEQUENCED: Sequence = -1;

/// One entry in a playlist.
///
/// The title belongs to the item and may differ from the video's title. The
/// playlist is referenced by id only: the playlist owns its items, never the
/// other way around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    id: Option<PlaylistItemId>,
    title: String,
    #[serde(default = "unsequenced")]
    sequence: Sequence,
    #[serde(default)]
    playlist_id: Option<PlaylistId>,
    #[serde(default)]
    video: Option<Video>,
}

fn unsequenced() -> Sequence {
    UNSEQUENCED
}

impl PlaylistItem {
    /// Create an unattached item for `video`
    pub fn new(title: impl Into<String>, video: Video) -> Self {
        Self {
            id: None,
            title: title.into(),
            sequence: UNSEQUENCED,
            playlist_id: None,
            video: Some(video),
        }
    }

    /// Rebuild a persisted item (for database loading)
    pub fn with_id(
        id: PlaylistItemId,
        title: impl Into<String>,
        sequence: Sequence,
        playlist_id: PlaylistId,
        video: Video,
    ) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            sequence,
            playlist_id: Some(playlist_id),
            video: Some(video),
        }
    }

    pub fn id(&self) -> Option<&PlaylistItemId> {
        self.id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw sequence value, `UNSEQUENCED` while unattached
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn playlist_id(&self) -> Option<&PlaylistId> {
        self.playlist_id.as_ref()
    }

    pub fn video(&self) -> Option<&Video> {
        self.video.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.playlist_id.is_some()
    }

    /// Position of the item as an index into its playlist.
    ///
    /// # Errors
    /// `NotAttached` when the item has not been added to a playlist.
    pub fn position(&self) -> Result<usize> {
        if self.playlist_id.is_none() {
            return Err(ReelError::NotAttached);
        }
        usize::try_from(self.sequence).map_err(|_| ReelError::SequenceOutOfRange {
            sequence: self.sequence,
            len: 0,
        })
    }

    /// Rename the item. The sequence is left untouched.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub(crate) fn attach(&mut self, playlist_id: PlaylistId, sequence: Sequence) {
        self.playlist_id = Some(playlist_id);
        self.sequence = sequence;
    }

    pub(crate) fn detach(&mut self) {
        self.playlist_id = None;
        self.sequence = UNSEQUENCED;
    }

    pub(crate) fn set_sequence(&mut self, sequence: Sequence) {
        self.sequence = sequence;
    }

    /// Record the identity handed out by the store
    pub fn assign_id(&mut self, id: PlaylistItemId) -> Result<()> {
        if let Some(existing) = &self.id {
            return Err(ReelError::AlreadyPersisted(existing.clone()));
        }
        self.id = Some(id);
        Ok(())
    }

    /// Swap in the authoritative video record returned by the store
    pub fn replace_video(&mut self, video: Video) {
        self.video = Some(video);
    }
}
