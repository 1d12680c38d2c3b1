//! Reel Storage
//!
//! `SQLite` persistence gateway for Reel playlists.
//!
//! Each table owns a vertical slice (`videos`, `playlists`, `playlist_items`)
//! with its own queries. `LocalStorageContext` ties the slices together
//! behind the store traits from `reel-core` and serializes writes per
//! playlist.
//!
//! # Example
//!
//! ```rust,no_run
//! use reel_core::{Playlist, PlaylistItem, PlaylistItemStore, PlaylistStore, Video, VideoId};
//! use reel_storage::{connect, LocalStorageContext, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect(&StorageConfig::load(None)?).await?;
//! let storage = LocalStorageContext::new(pool);
//!
//! let mut playlist = Playlist::new("Road trip");
//! storage.save_playlist(&playlist).await?;
//!
//! let video = Video::new(VideoId::new("dQw4w9WgXcQ"), "Never Gonna Give You Up", 213);
//! let mut item = playlist.add_item(PlaylistItem::new("Opener", video))?;
//! storage.save_item(&mut item).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod context;
mod error;
mod locks;

// Vertical slices
pub mod playlist_items;
pub mod playlists;
pub mod videos;

pub use config::StorageConfig;
pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
};
use sqlx::Transaction;
use std::str::FromStr;
use tracing::{debug, info};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Open the configured database and bring its schema up to date
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the connection fails,
/// or a migration fails
pub async fn connect(config: &StorageConfig) -> error::Result<SqlitePool> {
    config.validate()?;
    let pool = open_pool(config).await?;
    run_migrations(&pool).await?;
    info!(database_url = %config.database_url, "storage ready");
    Ok(pool)
}

/// Start a transaction that holds the database write lock from `BEGIN`.
///
/// Under WAL a deferred transaction that reads first fails its upgrade to a
/// writer without waiting, so every read-then-write path starts here.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

async fn open_pool(config: &StorageConfig) -> Result<SqlitePool, sqlx::Error> {
    debug!(database_url = %config.database_url, "creating pool");

    // Foreign keys carry the playlist to item cascade
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.busy_timeout());

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}
