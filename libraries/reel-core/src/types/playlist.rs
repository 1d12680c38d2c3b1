//! Playlist container

use super::ids::{PlaylistId, PlaylistItemId};
use super::item_mut::ItemMut;
use super::playlist_item::{PlaylistItem, Sequence};
use crate::error::{ReelError, Result};
use crate::sequencer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered collection of playlist items.
///
/// Items are kept in sequence order: `items[i].sequence() == i`.
/// Deserializing rejects payloads whose items break that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PlaylistData")]
pub struct Playlist {
    id: PlaylistId,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pub(crate) items: Vec<PlaylistItem>,
}

impl Playlist {
    /// Create a new, empty playlist
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    /// Create a playlist with a specific ID (for database loading)
    pub fn with_id(
        id: PlaylistId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            created_at,
            updated_at,
            items: Vec::new(),
        }
    }

    /// Install items loaded from storage, ordered by their stored sequence.
    ///
    /// # Errors
    /// `NotContiguous` unless the items occupy exactly `0..len` and all
    /// belong to this playlist.
    pub fn with_items(mut self, mut items: Vec<PlaylistItem>) -> Result<Self> {
        let foreign = items
            .iter()
            .any(|item| item.playlist_id() != Some(&self.id));
        if foreign || !sequencer::is_contiguous(&items) {
            return Err(ReelError::NotContiguous(self.id));
        }

        items.sort_by_key(PlaylistItem::sequence);
        self.items = items;
        Ok(self)
    }

    pub fn id(&self) -> &PlaylistId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `sequence`
    pub fn get(&self, sequence: Sequence) -> Option<&PlaylistItem> {
        usize::try_from(sequence)
            .ok()
            .and_then(|index| self.items.get(index))
    }

    /// Handle to the item at `sequence` that cannot change its position
    pub fn get_mut(&mut self, sequence: Sequence) -> Option<ItemMut<'_>> {
        usize::try_from(sequence)
            .ok()
            .and_then(|index| self.items.get_mut(index))
            .map(ItemMut::new)
    }

    /// Find a persisted item by identity
    pub fn find(&self, id: &PlaylistItemId) -> Option<&PlaylistItem> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Append `item`, returning it attached and sequenced.
    ///
    /// # Errors
    /// `AlreadyAttached` if the item already belongs to a playlist.
    pub fn add_item(&mut self, item: PlaylistItem) -> Result<ItemMut<'_>> {
        let sequence = sequencer::append(self, item)?;
        self.touch();
        let index = self.items.len() - 1;
        debug_assert_eq!(usize::try_from(sequence).ok(), Some(index));
        Ok(ItemMut::new(&mut self.items[index]))
    }

    /// Remove the item at `sequence` and close the gap it leaves
    pub fn remove_at(&mut self, sequence: Sequence) -> Result<PlaylistItem> {
        let removed = sequencer::remove(self, sequence)?;
        self.touch();
        Ok(removed)
    }

    /// Remove a persisted item by identity and close the gap it leaves.
    ///
    /// Returns `None` when no item in this playlist has that identity.
    pub fn remove_item(&mut self, id: &PlaylistItemId) -> Result<Option<PlaylistItem>> {
        let Some(sequence) = self.find(id).map(PlaylistItem::sequence) else {
            return Ok(None);
        };
        self.remove_at(sequence).map(Some)
    }

    /// Move the item at `from` to `to`, shifting everything in between
    pub fn move_item(&mut self, from: Sequence, to: Sequence) -> Result<()> {
        sequencer::move_to(self, from, to)?;
        self.touch();
        Ok(())
    }

    /// Item after `sequence`, wrapping to the first item
    pub fn next(&self, sequence: Sequence) -> Option<&PlaylistItem> {
        let index = sequencer::next_index(self.items.len(), sequence)?;
        self.items.get(index)
    }

    /// Item before `sequence`, wrapping to the last item
    pub fn previous(&self, sequence: Sequence) -> Option<&PlaylistItem> {
        let index = sequencer::previous_index(self.items.len(), sequence)?;
        self.items.get(index)
    }

    /// Whether the items occupy exactly `0..len`
    pub fn is_contiguous(&self) -> bool {
        sequencer::is_contiguous(&self.items)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Wire form of [`Playlist`], checked before it becomes one
#[derive(Deserialize)]
struct PlaylistData {
    id: PlaylistId,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

impl TryFrom<PlaylistData> for Playlist {
    type Error = ReelError;

    fn try_from(data: PlaylistData) -> Result<Self> {
        Playlist::with_id(data.id, data.title, data.created_at, data.updated_at)
            .with_items(data.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Video, VideoId};

    fn item(title: &str) -> PlaylistItem {
        PlaylistItem::new(title, Video::new(VideoId::new(title), title, 60))
    }

    fn titles(playlist: &Playlist) -> Vec<&str> {
        playlist.items().iter().map(PlaylistItem::title).collect()
    }

    #[test]
    fn add_item_attaches_and_sequences() {
        let mut playlist = Playlist::new("Mix");
        let playlist_id = playlist.id().clone();

        let added = playlist.add_item(item("a")).unwrap();
        assert_eq!(added.sequence(), 0);
        assert!(added.is_attached());

        let added = playlist.add_item(item("b")).unwrap();
        assert_eq!(added.sequence(), 1);
        assert_eq!(added.playlist_id(), Some(&playlist_id));
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn adding_attached_item_to_another_playlist_fails() {
        let mut first = Playlist::new("First");
        let mut second = Playlist::new("Second");
        let attached = first.add_item(item("a")).unwrap().clone();

        let err = second.add_item(attached).unwrap_err();

        assert!(matches!(err, ReelError::AlreadyAttached { .. }));
        assert!(second.is_empty());
    }

    #[test]
    fn remove_item_by_id_repairs_order() {
        let mut playlist = Playlist::new("Mix");
        for title in ["a", "b", "c"] {
            playlist.add_item(item(title)).unwrap();
        }
        let id = PlaylistItemId::new("b-id");
        playlist.get_mut(1).unwrap().assign_id(id.clone()).unwrap();

        let removed = playlist.remove_item(&id).unwrap().unwrap();

        assert_eq!(removed.title(), "b");
        assert!(!removed.is_attached());
        assert_eq!(titles(&playlist), ["a", "c"]);
        assert!(playlist.is_contiguous());
    }

    #[test]
    fn remove_unknown_id_is_none() {
        let mut playlist = Playlist::new("Mix");
        playlist.add_item(item("a")).unwrap();

        let removed = playlist.remove_item(&PlaylistItemId::new("missing")).unwrap();

        assert!(removed.is_none());
        assert_eq!(playlist.len(), 1);
    }

    #[test]
    fn single_item_is_its_own_neighbour() {
        let mut playlist = Playlist::new("Solo");
        playlist.add_item(item("only")).unwrap();

        assert_eq!(playlist.next(0).map(PlaylistItem::title), Some("only"));
        assert_eq!(playlist.previous(0).map(PlaylistItem::title), Some("only"));
    }

    #[test]
    fn neighbours_wrap_around() {
        let mut playlist = Playlist::new("Loop");
        for title in ["a", "b", "c"] {
            playlist.add_item(item(title)).unwrap();
        }

        assert_eq!(playlist.next(2).map(PlaylistItem::title), Some("a"));
        assert_eq!(playlist.previous(0).map(PlaylistItem::title), Some("c"));
        assert_eq!(playlist.next(0).map(PlaylistItem::title), Some("b"));
        assert!(playlist.next(3).is_none());
    }

    #[test]
    fn with_items_orders_by_sequence() {
        let id = PlaylistId::new("p");
        let video = Video::new(VideoId::new("v"), "v", 1);
        let items = vec![
            PlaylistItem::with_id(PlaylistItemId::new("2"), "second", 1, id.clone(), video.clone()),
            PlaylistItem::with_id(PlaylistItemId::new("1"), "first", 0, id.clone(), video),
        ];

        let playlist = Playlist::with_id(id, "Loaded", Utc::now(), Utc::now())
            .with_items(items)
            .unwrap();

        assert_eq!(titles(&playlist), ["first", "second"]);
        assert!(playlist.is_contiguous());
    }

    #[test]
    fn with_items_rejects_gaps_and_duplicates() {
        let id = PlaylistId::new("p");
        let video = Video::new(VideoId::new("v"), "v", 1);
        let loaded = |sequences: &[Sequence]| {
            let items = sequences
                .iter()
                .enumerate()
                .map(|(n, &sequence)| {
                    PlaylistItem::with_id(
                        PlaylistItemId::new(n.to_string()),
                        "item",
                        sequence,
                        id.clone(),
                        video.clone(),
                    )
                })
                .collect();
            Playlist::with_id(id.clone(), "Loaded", Utc::now(), Utc::now()).with_items(items)
        };

        assert!(matches!(loaded(&[0, 2]), Err(ReelError::NotContiguous(_))));
        assert!(matches!(loaded(&[0, 0]), Err(ReelError::NotContiguous(_))));
        assert!(loaded(&[1, 0]).is_ok());
    }

    #[test]
    fn with_items_rejects_items_of_another_playlist() {
        let video = Video::new(VideoId::new("v"), "v", 1);
        let items = vec![PlaylistItem::with_id(
            PlaylistItemId::new("1"),
            "stray",
            0,
            PlaylistId::new("other"),
            video,
        )];

        let result = Playlist::with_id(PlaylistId::new("p"), "Loaded", Utc::now(), Utc::now())
            .with_items(items);

        assert!(matches!(result, Err(ReelError::NotContiguous(_))));
    }

    #[test]
    fn get_mut_changes_title_but_keeps_position() {
        let mut playlist = Playlist::new("Mix");
        for title in ["a", "b"] {
            playlist.add_item(item(title)).unwrap();
        }

        let mut handle = playlist.get_mut(0).unwrap();
        handle.set_title("renamed");

        assert_eq!(titles(&playlist), ["renamed", "b"]);
        assert_eq!(playlist.get(0).map(PlaylistItem::sequence), Some(0));
        assert!(playlist.is_contiguous());
    }

    #[test]
    fn deserializing_rejects_non_contiguous_items() {
        let mut playlist = Playlist::new("Wire");
        for title in ["a", "b", "c"] {
            playlist.add_item(item(title)).unwrap();
        }
        let mut value = serde_json::to_value(&playlist).unwrap();
        value["items"][1]["sequence"] = serde_json::json!(7);

        let result: std::result::Result<Playlist, _> = serde_json::from_value(value);
        assert!(result.is_err());

        let round_trip: Playlist =
            serde_json::from_value(serde_json::to_value(&playlist).unwrap()).unwrap();
        assert_eq!(round_trip.items(), playlist.items());
    }
}
