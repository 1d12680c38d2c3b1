//! Video metadata shared by playlist items

use super::ids::VideoId;
use serde::{Deserialize, Serialize};

/// Immutable video metadata.
///
/// Many items across many playlists may point at the same video. The fields
/// are fixed by the first save; the store hands back that record on every
/// later save regardless of what the caller passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    id: VideoId,
    title: String,
    duration_seconds: u32,
}

impl Video {
    pub fn new(id: VideoId, title: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            id,
            title: title.into(),
            duration_seconds,
        }
    }

    pub fn id(&self) -> &VideoId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}
