mod ids;
mod item_mut;
mod playlist;
mod playlist_item;
mod video;

pub use ids::{PlaylistId, PlaylistItemId, VideoId};
pub use item_mut::ItemMut;
pub use playlist::Playlist;
pub use playlist_item::{PlaylistItem, Sequence, UNSEQUENCED};
pub use video::Video;
