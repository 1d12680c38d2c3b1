//! Video metadata queries
//!
//! Videos are insert-only. A save for a known id is ignored and the stored
//! record is returned instead.

use reel_core::{error::Result, ReelError, Video, VideoId};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::debug;

/// Get video by its external ID
pub async fn get_by_id(pool: &SqlitePool, id: &VideoId) -> Result<Option<Video>> {
    let mut conn = pool.acquire().await?;
    find(&mut conn, id).await
}

/// Store a video unless its ID already exists, returning the stored record
pub async fn save(pool: &SqlitePool, video: &Video) -> Result<Video> {
    let mut tx = crate::begin_write(pool).await?;
    let stored = insert_if_absent(&mut tx, video).await?;
    tx.commit().await?;
    Ok(stored)
}

pub(crate) async fn find(conn: &mut SqliteConnection, id: &VideoId) -> Result<Option<Video>> {
    let row = sqlx::query("SELECT id, title, duration_seconds FROM videos WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(from_row).transpose()
}

pub(crate) async fn insert_if_absent(conn: &mut SqliteConnection, video: &Video) -> Result<Video> {
    let result = sqlx::query(
        r#"
        INSERT INTO videos (id, title, duration_seconds)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(video.id())
    .bind(video.title())
    .bind(video.duration_seconds())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        debug!(video_id = %video.id(), "video already stored, keeping existing record");
    } else {
        debug!(video_id = %video.id(), "stored new video");
    }

    find(conn, video.id())
        .await?
        .ok_or_else(|| ReelError::VideoNotFound(video.id().clone()))
}

fn from_row(row: &SqliteRow) -> Result<Video> {
    Ok(Video::new(
        row.try_get::<VideoId, _>("id")?,
        row.try_get::<String, _>("title")?,
        row.try_get::<u32, _>("duration_seconds")?,
    ))
}
