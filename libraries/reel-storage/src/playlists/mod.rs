use crate::playlist_items;
use chrono::{DateTime, Utc};
use reel_core::{error::Result, Playlist, PlaylistId, ReelError};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, error};

/// Get playlist by ID with its items in sequence order
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let mut conn = pool.acquire().await?;

    let row = sqlx::query("SELECT id, title, created_at, updated_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let playlist = Playlist::with_id(
        row.try_get::<PlaylistId, _>("id")?,
        row.try_get::<String, _>("title")?,
        timestamp(row.try_get("created_at")?)?,
        timestamp(row.try_get("updated_at")?)?,
    );

    let items = playlist_items::fetch_by_playlist(&mut conn, id).await?;
    let playlist = playlist.with_items(items).inspect_err(|_| {
        error!(playlist_id = %id, "stored item sequences are not contiguous");
    })?;

    Ok(Some(playlist))
}

/// Insert the playlist row, or update its title if it already exists
pub async fn save(pool: &SqlitePool, playlist: &Playlist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playlists (id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(playlist.id())
    .bind(playlist.title())
    .bind(playlist.created_at().timestamp())
    .bind(playlist.updated_at().timestamp())
    .execute(pool)
    .await?;

    debug!(playlist_id = %playlist.id(), "saved playlist");
    Ok(())
}

/// Delete playlist; its items go with it
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ReelError::PlaylistNotFound(id.clone()));
    }

    debug!(playlist_id = %id, "deleted playlist");
    Ok(())
}

pub(crate) async fn exists(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.is_some())
}

/// Bump `updated_at` after an item change
pub(crate) async fn touch(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(Utc::now().timestamp())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| ReelError::storage("Invalid timestamp"))
}
