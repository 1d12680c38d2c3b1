//! Playlist item queries
//!
//! Each write runs in one transaction together with the sequence repair it
//! needs, so no reader ever sees a gap. Callers that can race on the same
//! playlist must serialize around these functions; `LocalStorageContext`
//! does that with a per-playlist lock.

use crate::{playlists, videos};
use crate::begin_write;
use reel_core::{
    error::Result, ItemMut, PlaylistId, PlaylistItem, PlaylistItemId, ReelError, Sequence,
    Validator, Video, VideoId,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const SELECT_ITEMS: &str = r#"
    SELECT
        i.id, i.playlist_id, i.title, i.sequence,
        v.id AS video_id, v.title AS video_title, v.duration_seconds
    FROM playlist_items i
    INNER JOIN videos v ON v.id = i.video_id
"#;

/// Get item by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistItemId) -> Result<Option<PlaylistItem>> {
    let row = sqlx::query(&format!("{SELECT_ITEMS} WHERE i.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(from_row).transpose()
}

/// Get the items of a playlist ordered by sequence
pub async fn get_by_playlist(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
) -> Result<Vec<PlaylistItem>> {
    let mut conn = pool.acquire().await?;
    fetch_by_playlist(&mut conn, playlist_id).await
}

/// Playlist an item belongs to, if the item exists
pub async fn playlist_of(pool: &SqlitePool, id: &PlaylistItemId) -> Result<Option<PlaylistId>> {
    let row = sqlx::query("SELECT playlist_id FROM playlist_items WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|row| row.try_get::<PlaylistId, _>("playlist_id"))
        .transpose()
        .map_err(Into::into)
}

/// Insert a new item.
///
/// The item is validated before anything touches the database. Inside the
/// transaction its video is stored if unknown (never updated), and its
/// sequence must equal the playlist's current item count. On success the
/// item receives its identity and the authoritative video record.
pub async fn create(
    pool: &SqlitePool,
    validator: &dyn Validator<PlaylistItem>,
    item: &mut ItemMut<'_>,
) -> Result<PlaylistItemId> {
    validator.validate(item)?;

    if let Some(existing) = item.id() {
        return Err(ReelError::AlreadyPersisted(existing.clone()));
    }
    let playlist_id = item.playlist_id().cloned().ok_or(ReelError::NotAttached)?;
    let video = item
        .video()
        .cloned()
        .ok_or_else(|| ReelError::storage("validated item has no video"))?;

    let mut tx = begin_write(pool).await?;

    if !playlists::exists(&mut tx, &playlist_id).await? {
        return Err(ReelError::PlaylistNotFound(playlist_id));
    }

    let stored_video = videos::insert_if_absent(&mut tx, &video).await?;

    let expected = count_in(&mut tx, &playlist_id).await?;
    if item.sequence() != expected {
        warn!(
            playlist_id = %playlist_id,
            expected,
            found = item.sequence(),
            "rejecting save from a stale playlist copy"
        );
        return Err(ReelError::SequenceConflict {
            expected,
            found: item.sequence(),
        });
    }

    let id = PlaylistItemId::generate();
    sqlx::query(
        r#"
        INSERT INTO playlist_items (id, playlist_id, video_id, title, sequence)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&playlist_id)
    .bind(stored_video.id())
    .bind(item.title())
    .bind(item.sequence())
    .execute(&mut *tx)
    .await?;

    playlists::touch(&mut tx, &playlist_id).await?;
    tx.commit().await?;

    item.assign_id(id.clone())?;
    item.replace_video(stored_video);

    debug!(item_id = %id, playlist_id = %playlist_id, sequence = item.sequence(), "created playlist item");
    Ok(id)
}

/// Overwrite the title and sequence of a saved item.
///
/// The video and the owning playlist are never rewritten. A changed sequence
/// is applied as a move so the playlist stays contiguous.
pub async fn update(
    pool: &SqlitePool,
    validator: &dyn Validator<PlaylistItem>,
    item: &PlaylistItem,
) -> Result<()> {
    validator.validate(item)?;
    let id = item.id().ok_or(ReelError::Unsaved)?;

    let mut tx = begin_write(pool).await?;

    let (playlist_id, current) = locate(&mut tx, id).await?;
    let target = item.sequence();
    if target != current {
        shift(&mut tx, &playlist_id, current, target).await?;
    }

    sqlx::query("UPDATE playlist_items SET title = ?, sequence = ? WHERE id = ?")
        .bind(item.title())
        .bind(target)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    playlists::touch(&mut tx, &playlist_id).await?;
    tx.commit().await?;

    debug!(item_id = %id, sequence = target, "updated playlist item");
    Ok(())
}

/// Move a saved item to `sequence`
pub async fn move_to(pool: &SqlitePool, id: &PlaylistItemId, sequence: Sequence) -> Result<()> {
    let mut tx = begin_write(pool).await?;

    let (playlist_id, current) = locate(&mut tx, id).await?;
    if current == sequence {
        return Ok(());
    }
    shift(&mut tx, &playlist_id, current, sequence).await?;

    sqlx::query("UPDATE playlist_items SET sequence = ? WHERE id = ?")
        .bind(sequence)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    playlists::touch(&mut tx, &playlist_id).await?;
    tx.commit().await?;

    debug!(item_id = %id, from = current, to = sequence, "moved playlist item");
    Ok(())
}

/// Delete an item and close the gap it leaves
pub async fn delete(pool: &SqlitePool, id: &PlaylistItemId) -> Result<()> {
    let mut tx = begin_write(pool).await?;

    let (playlist_id, removed) = locate(&mut tx, id).await?;

    sqlx::query("DELETE FROM playlist_items WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    // Repair
    sqlx::query(
        r#"
        UPDATE playlist_items
        SET sequence = sequence - 1
        WHERE playlist_id = ?
          AND sequence > ?
        "#,
    )
    .bind(&playlist_id)
    .bind(removed)
    .execute(&mut *tx)
    .await?;

    playlists::touch(&mut tx, &playlist_id).await?;
    tx.commit().await?;

    debug!(item_id = %id, playlist_id = %playlist_id, sequence = removed, "deleted playlist item");
    Ok(())
}

/// Delete several items in one transaction.
///
/// Repeated IDs count once. If any ID is unknown nothing is deleted.
/// Affected playlists are renumbered once at the end.
pub async fn delete_many(pool: &SqlitePool, ids: &[PlaylistItemId]) -> Result<()> {
    let ids: BTreeSet<&PlaylistItemId> = ids.iter().collect();
    let mut tx = begin_write(pool).await?;
    let mut affected = BTreeSet::new();

    for id in &ids {
        let (playlist_id, _) = locate(&mut tx, id).await?;
        sqlx::query("DELETE FROM playlist_items WHERE id = ?")
            .bind(*id)
            .execute(&mut *tx)
            .await?;
        affected.insert(playlist_id);
    }

    for playlist_id in &affected {
        renumber(&mut tx, playlist_id).await?;
        playlists::touch(&mut tx, playlist_id).await?;
    }

    tx.commit().await?;

    debug!(count = ids.len(), playlists = affected.len(), "deleted playlist items");
    Ok(())
}

pub(crate) async fn fetch_by_playlist(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
) -> Result<Vec<PlaylistItem>> {
    let rows = sqlx::query(&format!(
        "{SELECT_ITEMS} WHERE i.playlist_id = ? ORDER BY i.sequence, i.id"
    ))
    .bind(playlist_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(from_row).collect()
}

async fn count_in(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<Sequence> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM playlist_items WHERE playlist_id = ?")
        .bind(playlist_id)
        .fetch_one(&mut *conn)
        .await?;

    let count: i64 = row.try_get("count")?;
    to_sequence(count)
}

/// Owning playlist and current sequence of an item
async fn locate(conn: &mut SqliteConnection, id: &PlaylistItemId) -> Result<(PlaylistId, Sequence)> {
    let row = sqlx::query("SELECT playlist_id, sequence FROM playlist_items WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| ReelError::PlaylistItemNotFound(id.clone()))?;

    let playlist_id: PlaylistId = row.try_get("playlist_id")?;
    let sequence: Sequence = row.try_get("sequence")?;
    Ok((playlist_id, sequence))
}

/// Make room for an item moving from `from` to `to`.
///
/// Afterwards the caller writes `to` onto the moving item.
async fn shift(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    from: Sequence,
    to: Sequence,
) -> Result<()> {
    let len = count_in(conn, playlist_id).await?;
    if to < 0 || to >= len {
        return Err(ReelError::SequenceOutOfRange {
            sequence: to,
            len: usize::try_from(len).unwrap_or_default(),
        });
    }

    if to < from {
        // Moving up: shift items down
        sqlx::query(
            r#"
            UPDATE playlist_items
            SET sequence = sequence + 1
            WHERE playlist_id = ?
              AND sequence >= ?
              AND sequence < ?
            "#,
        )
        .bind(playlist_id)
        .bind(to)
        .bind(from)
        .execute(&mut *conn)
        .await?;
    } else {
        // Moving down: shift items up
        sqlx::query(
            r#"
            UPDATE playlist_items
            SET sequence = sequence - 1
            WHERE playlist_id = ?
              AND sequence > ?
              AND sequence <= ?
            "#,
        )
        .bind(playlist_id)
        .bind(from)
        .bind(to)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Rewrite sequences as `0..count` keeping the current order
async fn renumber(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<()> {
    let rows = sqlx::query(
        "SELECT id FROM playlist_items WHERE playlist_id = ? ORDER BY sequence, id",
    )
    .bind(playlist_id)
    .fetch_all(&mut *conn)
    .await?;

    for (index, row) in rows.iter().enumerate() {
        let id: PlaylistItemId = row.try_get("id")?;
        let sequence = to_sequence(index)?;

        sqlx::query("UPDATE playlist_items SET sequence = ? WHERE id = ?")
            .bind(sequence)
            .bind(&id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

fn to_sequence<N>(n: N) -> Result<Sequence>
where
    Sequence: TryFrom<N>,
{
    Sequence::try_from(n).map_err(|_| ReelError::storage("playlist too large to sequence"))
}

fn from_row(row: &SqliteRow) -> Result<PlaylistItem> {
    let video = Video::new(
        row.try_get::<VideoId, _>("video_id")?,
        row.try_get::<String, _>("video_title")?,
        row.try_get::<u32, _>("duration_seconds")?,
    );

    Ok(PlaylistItem::with_id(
        row.try_get::<PlaylistItemId, _>("id")?,
        row.try_get::<String, _>("title")?,
        row.try_get::<Sequence, _>("sequence")?,
        row.try_get::<PlaylistId, _>("playlist_id")?,
        video,
    ))
}
