//! SQLite persistence for the local library.

mod playlists;
mod settings;

pub use playlists::LocalPlaylistManager;
pub use settings::AppSettings;

use crate::library::{LibraryError, Result};
use std::path::{Path, PathBuf};

const DATA_DIR_ENV: &str = "STREAMSHELF_DATA_DIR";
const DATABASE_FILE: &str = "streamshelf.db";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS streams (
        uid INTEGER PRIMARY KEY AUTOINCREMENT,
        service_id INTEGER NOT NULL DEFAULT 0,
        url TEXT NOT NULL,
        title TEXT NOT NULL,
        uploader TEXT,
        duration_secs INTEGER NOT NULL DEFAULT 0,
        thumbnail_url TEXT NOT NULL DEFAULT '',
        UNIQUE (service_id, url)
    );

    CREATE TABLE IF NOT EXISTS playlists (
        uid INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        thumbnail_url TEXT NOT NULL,
        thumbnail_permanent INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS playlist_stream_join (
        playlist_id INTEGER NOT NULL REFERENCES playlists (uid) ON DELETE CASCADE,
        stream_id INTEGER NOT NULL REFERENCES streams (uid) ON DELETE CASCADE,
        join_index INTEGER NOT NULL,
        PRIMARY KEY (playlist_id, join_index)
    );

    CREATE INDEX IF NOT EXISTS idx_playlist_stream_join_stream
        ON playlist_stream_join (stream_id);

    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Create tables and enable the pragmas the schema relies on.
pub fn initialize_database(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn open_connection(path: &Path) -> Result<rusqlite::Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = rusqlite::Connection::open(path)?;
    initialize_database(&conn)?;
    Ok(conn)
}

/// Application data directory.
///
/// `STREAMSHELF_DATA_DIR` wins; otherwise the platform data directory is
/// used, falling back to a dot-directory in the working directory.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }

    dirs::data_dir()
        .map(|dir| dir.join("streamshelf"))
        .unwrap_or_else(|| PathBuf::from(".streamshelf"))
}

pub fn database_path() -> PathBuf {
    data_dir().join(DATABASE_FILE)
}

pub(crate) fn lock_poisoned() -> LibraryError {
    LibraryError::task("database connection lock poisoned")
}
