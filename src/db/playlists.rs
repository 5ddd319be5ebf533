use super::{initialize_database, lock_poisoned, open_connection, settings, AppSettings};
use crate::diagnostics::log_perf;
use crate::library::{
    LibraryError, MediaItemRef, PlaylistId, PlaylistStore, PlaylistStream, PlaylistSummary,
    Result, PLACEHOLDER_THUMBNAIL,
};
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::watch;

/// Playlist store backed by a local SQLite database.
///
/// Cloning is cheap; clones share the connection and the change feed.
#[derive(Clone)]
pub struct LocalPlaylistManager {
    conn: Arc<Mutex<Connection>>,
    changes: Arc<watch::Sender<u64>>,
}

impl std::fmt::Debug for LocalPlaylistManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPlaylistManager")
            .field("revision", &*self.changes.borrow())
            .finish_non_exhaustive()
    }
}

impl PartialEq for LocalPlaylistManager {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }
}

impl LocalPlaylistManager {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = open_connection(path)?;
        tracing::info!(path = %path.display(), "opened playlist database");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_database(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        let (changes, _) = watch::channel(0u64);
        Self {
            conn: Arc::new(Mutex::new(conn)),
            changes: Arc::new(changes),
        }
    }

    /// Run `op` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, scope: &'static str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let started_at = Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| lock_poisoned())?;
            op(&mut *guard)
        })
        .await
        .map_err(|err| LibraryError::task(err.to_string()))?;
        log_perf(scope, started_at, "");
        result
    }

    fn notify_changed(&self) {
        self.changes.send_modify(|revision| *revision = revision.wrapping_add(1));
    }

    pub async fn load_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        self.with_conn("load_playlists", |conn| query_playlists(conn))
            .await
    }

    pub async fn playlist(&self, id: PlaylistId) -> Result<Option<PlaylistSummary>> {
        self.with_conn("playlist", move |conn| {
            let summary = conn
                .query_row(
                    "SELECT p.uid, p.name, p.thumbnail_url, COUNT(j.stream_id)
                     FROM playlists p
                     LEFT JOIN playlist_stream_join j ON j.playlist_id = p.uid
                     WHERE p.uid = ?1
                     GROUP BY p.uid",
                    [id],
                    summary_from_row,
                )
                .optional()?;
            Ok(summary)
        })
        .await
    }

    /// Streams of a playlist in playback order.
    pub async fn playlist_items(&self, id: PlaylistId) -> Result<Vec<MediaItemRef>> {
        self.with_conn("playlist_items", move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT s.service_id, s.url, s.title, s.uploader, s.duration_secs, s.thumbnail_url
                 FROM playlist_stream_join j
                 JOIN streams s ON s.uid = j.stream_id
                 WHERE j.playlist_id = ?1
                 ORDER BY j.join_index",
            )?;
            let items = stmt
                .query_map([id], item_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
        .await
    }

    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.with_conn("delete_playlist", move |conn| {
            let removed = conn.execute("DELETE FROM playlists WHERE uid = ?1", [id])?;
            if removed == 0 {
                return Err(LibraryError::PlaylistNotFound(id));
            }
            Ok(())
        })
        .await?;
        tracing::info!(playlist = %id, "deleted playlist");
        self.notify_changed();
        Ok(())
    }

    /// Remember a stream so it can be picked in the library view.
    pub async fn save_stream(&self, item: MediaItemRef) -> Result<()> {
        if item.url.trim().is_empty() {
            return Err(LibraryError::invalid_input("stream url must not be empty"));
        }
        self.with_conn("save_stream", move |conn| {
            upsert_stream(conn, &item)?;
            Ok(())
        })
        .await
    }

    /// Most recently saved streams first.
    pub async fn streams(&self, limit: u32) -> Result<Vec<MediaItemRef>> {
        self.with_conn("streams", move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT service_id, url, title, uploader, duration_secs, thumbnail_url
                 FROM streams
                 ORDER BY uid DESC
                 LIMIT ?1",
            )?;
            let items = stmt
                .query_map([limit], item_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
        .await
    }

    pub async fn load_settings(&self) -> Result<AppSettings> {
        self.with_conn("load_settings", |conn| settings::load(conn))
            .await
    }

    pub async fn save_settings(&self, settings: AppSettings) -> Result<()> {
        self.with_conn("save_settings", move |conn| settings::save(conn, &settings))
            .await
    }
}

#[async_trait]
impl PlaylistStore for LocalPlaylistManager {
    fn playlists(&self) -> PlaylistStream {
        // Subscribe before the first load so no write can slip between them.
        let changes = self.changes.subscribe();
        let manager = self.clone();
        stream::unfold(
            (manager, changes, true),
            |(manager, mut changes, first)| async move {
                if !first && changes.changed().await.is_err() {
                    return None;
                }
                let listing = manager.load_playlists().await;
                Some((listing, (manager, changes, false)))
            },
        )
        .boxed()
    }

    async fn duplicate_playlists(&self, url: &str) -> Result<Vec<PlaylistId>> {
        let url = url.to_string();
        self.with_conn("duplicate_playlists", move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT DISTINCT j.playlist_id
                 FROM playlist_stream_join j
                 JOIN streams s ON s.uid = j.stream_id
                 WHERE s.url = ?1
                 ORDER BY j.playlist_id",
            )?;
            let ids = stmt
                .query_map([url], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<PlaylistId>>>()?;
            Ok(ids)
        })
        .await
    }

    async fn count_duplicates(&self, playlist: PlaylistId, url: &str) -> Result<usize> {
        let url = url.to_string();
        self.with_conn("count_duplicates", move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*)
                 FROM playlist_stream_join j
                 JOIN streams s ON s.uid = j.stream_id
                 WHERE j.playlist_id = ?1 AND s.url = ?2",
                params![playlist, url],
                |row| row.get(0),
            )?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
        .await
    }

    async fn append_to_playlist(&self, playlist: PlaylistId, items: &[MediaItemRef]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let items = items.to_vec();
        let count = items.len();
        self.with_conn("append_to_playlist", move |conn| {
            let tx = conn.transaction()?;
            append_items(&tx, playlist, &items)?;
            tx.commit()?;
            Ok(())
        })
        .await?;
        tracing::info!(playlist = %playlist, count, "appended streams to playlist");
        self.notify_changed();
        Ok(())
    }

    async fn change_thumbnail(
        &self,
        playlist: PlaylistId,
        url: &str,
        permanent: bool,
    ) -> Result<()> {
        let url = url.to_string();
        self.with_conn("change_thumbnail", move |conn| {
            let updated = conn.execute(
                "UPDATE playlists SET thumbnail_url = ?2, thumbnail_permanent = ?3 WHERE uid = ?1",
                params![playlist, url, permanent],
            )?;
            if updated == 0 {
                return Err(LibraryError::PlaylistNotFound(playlist));
            }
            Ok(())
        })
        .await?;
        tracing::debug!(playlist = %playlist, permanent, "changed playlist thumbnail");
        self.notify_changed();
        Ok(())
    }

    async fn create_playlist(&self, name: &str, items: &[MediaItemRef]) -> Result<PlaylistId> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LibraryError::invalid_input("playlist name must not be empty"));
        }
        let thumbnail = items
            .first()
            .map(|item| item.thumbnail_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string());
        let items = items.to_vec();
        let log_name = name.clone();
        let id = self
            .with_conn("create_playlist", move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO playlists (name, thumbnail_url, thumbnail_permanent)
                     VALUES (?1, ?2, 0)",
                    params![name, thumbnail],
                )?;
                let id = PlaylistId::new(tx.last_insert_rowid());
                append_items(&tx, id, &items)?;
                tx.commit()?;
                Ok(id)
            })
            .await?;
        tracing::info!(playlist = %id, name = %log_name, "created playlist");
        self.notify_changed();
        Ok(id)
    }
}

fn query_playlists(conn: &Connection) -> Result<Vec<PlaylistSummary>> {
    let mut stmt = conn.prepare_cached(
        "SELECT p.uid, p.name, p.thumbnail_url, COUNT(j.stream_id)
         FROM playlists p
         LEFT JOIN playlist_stream_join j ON j.playlist_id = p.uid
         GROUP BY p.uid
         ORDER BY p.name COLLATE NOCASE, p.uid",
    )?;
    let playlists = stmt
        .query_map([], summary_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(playlists)
}

fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlaylistSummary> {
    Ok(PlaylistSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        thumbnail_url: row.get(2)?,
        stream_count: row.get(3)?,
    })
}

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaItemRef> {
    Ok(MediaItemRef {
        service_id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
        uploader: row.get(3)?,
        duration_secs: row.get(4)?,
        thumbnail_url: row.get(5)?,
    })
}

/// Insert or refresh a stream row and return its uid.
fn upsert_stream(conn: &Connection, item: &MediaItemRef) -> rusqlite::Result<i64> {
    conn.query_row(
        "INSERT INTO streams (service_id, url, title, uploader, duration_secs, thumbnail_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (service_id, url) DO UPDATE SET
             title = excluded.title,
             uploader = COALESCE(excluded.uploader, streams.uploader),
             duration_secs = excluded.duration_secs,
             thumbnail_url = CASE
                 WHEN excluded.thumbnail_url = '' THEN streams.thumbnail_url
                 ELSE excluded.thumbnail_url
             END
         RETURNING uid",
        params![
            item.service_id,
            item.url,
            item.title,
            item.uploader,
            item.duration_secs,
            item.thumbnail_url
        ],
        |row| row.get(0),
    )
}

/// Append `items` after the playlist's current last entry.
fn append_items(conn: &Connection, playlist: PlaylistId, items: &[MediaItemRef]) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM playlists WHERE uid = ?1)",
        [playlist],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(LibraryError::PlaylistNotFound(playlist));
    }

    let mut next_index: i64 = conn.query_row(
        "SELECT COALESCE(MAX(join_index) + 1, 0) FROM playlist_stream_join WHERE playlist_id = ?1",
        [playlist],
        |row| row.get(0),
    )?;
    let mut insert = conn.prepare_cached(
        "INSERT INTO playlist_stream_join (playlist_id, stream_id, join_index) VALUES (?1, ?2, ?3)",
    )?;
    for item in items {
        let stream_id = upsert_stream(conn, item)?;
        insert.execute(params![playlist, stream_id, next_index])?;
        next_index += 1;
    }
    Ok(())
}
