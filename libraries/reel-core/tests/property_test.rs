//! Property-based tests for the sequencer
//!
//! Random append/remove/move scripts are replayed against a playlist and a
//! plain `Vec` model. After every step the sequences must be exactly
//! `0..len` and the order must match the model.

use proptest::prelude::*;
use reel_core::types::{Playlist, PlaylistItem, Sequence, Video, VideoId};

#[derive(Debug, Clone)]
enum Op {
    Append,
    Remove(usize),
    Move(usize, usize),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Append),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Op::Move(from, to)),
    ]
}

fn new_item(n: usize) -> PlaylistItem {
    let title = format!("item-{n}");
    PlaylistItem::new(title.clone(), Video::new(VideoId::new(title), "shared", 120))
}

fn to_sequence(index: usize) -> Sequence {
    Sequence::try_from(index).unwrap()
}

fn titles(playlist: &Playlist) -> Vec<String> {
    playlist
        .items()
        .iter()
        .map(|item| item.title().to_string())
        .collect()
}

proptest! {
    /// Property: sequences stay contiguous and match the model order
    #[test]
    fn sequences_stay_contiguous(ops in prop::collection::vec(arbitrary_op(), 1..80)) {
        let mut playlist = Playlist::new("Property");
        let mut model: Vec<String> = Vec::new();
        let mut counter = 0;

        for op in ops {
            match op {
                Op::Append => {
                    let expected = to_sequence(model.len());
                    let item = new_item(counter);
                    model.push(item.title().to_string());
                    counter += 1;

                    let added = playlist.add_item(item).unwrap();
                    prop_assert_eq!(added.sequence(), expected);
                }
                Op::Remove(seed) => {
                    if model.is_empty() {
                        prop_assert!(playlist.remove_at(0).is_err());
                        continue;
                    }
                    let index = seed % model.len();
                    let removed = playlist.remove_at(to_sequence(index)).unwrap();
                    let expected = model.remove(index);

                    prop_assert_eq!(removed.title(), expected.as_str());
                    prop_assert!(!removed.is_attached());
                }
                Op::Move(from_seed, to_seed) => {
                    if model.is_empty() {
                        continue;
                    }
                    let from = from_seed % model.len();
                    let to = to_seed % model.len();
                    playlist.move_item(to_sequence(from), to_sequence(to)).unwrap();

                    let moved = model.remove(from);
                    model.insert(to, moved);
                }
            }

            prop_assert!(playlist.is_contiguous(), "gap or duplicate after step");
            prop_assert_eq!(titles(&playlist), model.clone());
        }
    }

    /// Property: deleting any position of an n-item playlist leaves 0..n-1
    #[test]
    fn delete_any_position_repairs(len in 1usize..40, seed in any::<usize>()) {
        let mut playlist = Playlist::new("Delete");
        for n in 0..len {
            playlist.add_item(new_item(n)).unwrap();
        }

        let target = seed % len;
        playlist.remove_at(to_sequence(target)).unwrap();

        prop_assert_eq!(playlist.len(), len - 1);
        for (index, item) in playlist.items().iter().enumerate() {
            prop_assert_eq!(item.sequence(), to_sequence(index));
            let original = if index < target { index } else { index + 1 };
            prop_assert_eq!(item.title(), format!("item-{original}"));
        }
    }

    /// Property: appending to k items assigns sequence k
    #[test]
    fn append_assigns_next_index(existing in 0usize..60) {
        let mut playlist = Playlist::new("Append");
        for n in 0..existing {
            playlist.add_item(new_item(n)).unwrap();
        }

        let added = playlist.add_item(new_item(existing)).unwrap();

        prop_assert_eq!(added.sequence(), to_sequence(existing));
    }
}
