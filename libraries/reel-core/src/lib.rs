//! Reel Core
//!
//! Domain types, ordering rules, and storage interfaces for Reel playlists.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `PlaylistItem`, `Video`
//! - **Sequencer**: keeps item sequences contiguous per playlist
//! - **Validation**: the checks every item write must pass
//! - **Storage Traits**: `VideoStore`, `PlaylistStore`, `PlaylistItemStore`
//! - **Error Handling**: Unified `ReelError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use reel_core::types::{Playlist, PlaylistItem, Video, VideoId};
//!
//! let mut playlist = Playlist::new("Road trip");
//! let video = Video::new(VideoId::new("dQw4w9WgXcQ"), "Never Gonna Give You Up", 213);
//!
//! let item = playlist.add_item(PlaylistItem::new("Opener", video)).unwrap();
//! assert_eq!(item.sequence(), 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod sequencer;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{ReelError, Result};
pub use storage::{PlaylistItemStore, PlaylistStore, VideoStore};
pub use validation::{PlaylistItemValidator, Rule, ValidationError, Validator};

pub use types::{
    ItemMut, Playlist, PlaylistId, PlaylistItem, PlaylistItemId, Sequence, Video, VideoId,
    UNSEQUENCED,
};
