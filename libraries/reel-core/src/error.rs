//! Core error types for Reel
use crate::types::{PlaylistId, PlaylistItemId, Sequence, VideoId};
use crate::validation::ValidationError;
use thiserror::Error;

/// Result type alias using `ReelError`
pub type Result<T> = std::result::Result<T, ReelError>;

/// Core error type for Reel
#[derive(Error, Debug)]
pub enum ReelError {
    /// An item failed validation before a write; nothing was persisted
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Playlist item not found
    #[error("Playlist item not found: {0}")]
    PlaylistItemNotFound(PlaylistItemId),

    /// Video not found
    #[error("Video not found: {0}")]
    VideoNotFound(VideoId),

    /// Item is already part of a playlist
    #[error("Item already belongs to playlist {playlist_id}")]
    AlreadyAttached { playlist_id: PlaylistId },

    /// Item has not been added to a playlist
    #[error("Item is not attached to a playlist")]
    NotAttached,

    /// Sequence does not address an item of the playlist
    #[error("Sequence {sequence} out of range for playlist of {len} items")]
    SequenceOutOfRange { sequence: Sequence, len: usize },

    /// The playlist changed since the caller read it
    #[error("Sequence conflict: playlist expects sequence {expected}, item has {found}")]
    SequenceConflict { expected: Sequence, found: Sequence },

    /// Item has no identity yet, so there is nothing to update
    #[error("Item has not been saved")]
    Unsaved,

    /// Item already has an identity and cannot be inserted again
    #[error("Item already saved as {0}")]
    AlreadyPersisted(PlaylistItemId),

    /// Repair was asked to close a gap that is not there
    #[error("No gap at sequence {sequence} to repair")]
    NoGap { sequence: Sequence },

    /// Items handed to a playlist do not occupy exactly `0..len`
    #[error("Items of playlist {0} are not contiguous")]
    NotContiguous(PlaylistId),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl ReelError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this is a validation failure the caller can fix and retry
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation details, if this is a validation failure
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the error reports a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PlaylistNotFound(_) | Self::PlaylistItemNotFound(_) | Self::VideoNotFound(_)
        )
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ReelError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
