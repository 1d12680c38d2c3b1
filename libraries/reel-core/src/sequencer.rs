//! Sequence assignment and repair
//!
//! Every operation here keeps one invariant: the items of a playlist occupy
//! exactly the sequences `0..len`, each once. Each function takes
//! `&mut Playlist`, so a removal and the repair that follows it happen under
//! a single borrow and nobody can observe the gap in between.
//!
//! Neighbour lookups are computed from the sequence on demand. There are no
//! stored next/previous links that could drift from the sequence.

use crate::error::{ReelError, Result};
use crate::types::{Playlist, PlaylistItem, Sequence};

/// Append `item` to `playlist` and return the sequence it was given.
///
/// The new sequence is the playlist's length before insertion.
///
/// # Errors
/// `AlreadyAttached` when the item already has a playlist; the item is
/// dropped and `playlist` is left unchanged.
pub fn append(playlist: &mut Playlist, mut item: PlaylistItem) -> Result<Sequence> {
    if let Some(owner) = item.playlist_id() {
        return Err(ReelError::AlreadyAttached {
            playlist_id: owner.clone(),
        });
    }

    let len = playlist.items.len();
    let sequence = Sequence::try_from(len).map_err(|_| ReelError::SequenceOutOfRange {
        sequence: Sequence::MAX,
        len,
    })?;

    item.attach(playlist.id().clone(), sequence);
    playlist.items.push(item);
    Ok(sequence)
}

/// Close the gap left by removing the item at `removed`.
///
/// Every remaining item with a greater sequence moves down by one.
///
/// # Errors
/// `SequenceOutOfRange` unless `0 <= removed <= remaining len`.
/// `NoGap` unless the remaining items occupy exactly `0..=len` without
/// `removed`; the playlist is left unchanged.
pub fn repair(playlist: &mut Playlist, removed: Sequence) -> Result<()> {
    let len = playlist.items.len();
    match usize::try_from(removed) {
        Ok(index) if index <= len => {}
        _ => {
            return Err(ReelError::SequenceOutOfRange {
                sequence: removed,
                len,
            })
        }
    }

    if !has_gap_at(&playlist.items, removed) {
        return Err(ReelError::NoGap { sequence: removed });
    }

    for item in &mut playlist.items {
        if item.sequence() > removed {
            item.set_sequence(item.sequence() - 1);
        }
    }
    Ok(())
}

/// Remove the item at `sequence` and repair the rest.
///
/// The returned item is detached: no playlist, no sequence. Its identity is
/// kept so callers can still refer to it.
pub fn remove(playlist: &mut Playlist, sequence: Sequence) -> Result<PlaylistItem> {
    let index = checked_index(playlist.items.len(), sequence)?;
    let mut removed = playlist.items.remove(index);
    repair(playlist, sequence)?;
    removed.detach();
    Ok(removed)
}

/// Move the item at `from` so it ends up at `to`.
///
/// Items between the two positions shift by one toward `from`.
pub fn move_to(playlist: &mut Playlist, from: Sequence, to: Sequence) -> Result<()> {
    let len = playlist.items.len();
    let from_index = checked_index(len, from)?;
    let to_index = checked_index(len, to)?;
    if from_index == to_index {
        return Ok(());
    }

    let item = playlist.items.remove(from_index);
    playlist.items.insert(to_index, item);

    let (low, high) = if from_index < to_index {
        (from_index, to_index)
    } else {
        (to_index, from_index)
    };
    for index in low..=high {
        // index < len, which already fit in a Sequence above
        let sequence = Sequence::try_from(index).map_err(|_| ReelError::SequenceOutOfRange {
            sequence: Sequence::MAX,
            len,
        })?;
        playlist.items[index].set_sequence(sequence);
    }
    Ok(())
}

/// Whether the sequences of `items` are exactly `{0, 1, ..., len - 1}`.
///
/// Order of `items` does not matter.
pub fn is_contiguous(items: &[PlaylistItem]) -> bool {
    let mut sequences: Vec<Sequence> = items.iter().map(PlaylistItem::sequence).collect();
    sequences.sort_unstable();
    sequences
        .iter()
        .enumerate()
        .all(|(index, &sequence)| usize::try_from(sequence) == Ok(index))
}

/// Index following `sequence` in a playlist of `len` items, wrapping around
pub fn next_index(len: usize, sequence: Sequence) -> Option<usize> {
    let index = checked_index(len, sequence).ok()?;
    Some((index + 1) % len)
}

/// Index preceding `sequence` in a playlist of `len` items, wrapping around
pub fn previous_index(len: usize, sequence: Sequence) -> Option<usize> {
    let index = checked_index(len, sequence).ok()?;
    Some((index + len - 1) % len)
}

/// Whether `items` hold every sequence of `0..=len` except `gap`
fn has_gap_at(items: &[PlaylistItem], gap: Sequence) -> bool {
    let mut sequences: Vec<Sequence> = items.iter().map(PlaylistItem::sequence).collect();
    sequences.sort_unstable();
    sequences
        .iter()
        .enumerate()
        .all(|(index, &sequence)| {
            let expected = if usize::try_from(gap).is_ok_and(|gap| index >= gap) {
                index + 1
            } else {
                index
            };
            usize::try_from(sequence) == Ok(expected)
        })
}

fn checked_index(len: usize, sequence: Sequence) -> Result<usize> {
    match usize::try_from(sequence) {
        Ok(index) if index < len => Ok(index),
        _ => Err(ReelError::SequenceOutOfRange { sequence, len }),
    }
}
