use serde::{Deserialize, Serialize};
use std::fmt;

/// Thumbnail stored on playlists that have no image of their own yet.
pub const PLACEHOLDER_THUMBNAIL: &str = "drawable://placeholder_thumbnail_playlist";

/// Playlist identifier (SQLite rowid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(i64);

impl PlaylistId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl rusqlite::ToSql for PlaylistId {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl rusqlite::types::FromSql for PlaylistId {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        i64::column_result(value).map(PlaylistId)
    }
}

/// A media item the library already knows about.
///
/// `url` is the identity used for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItemRef {
    #[serde(default)]
    pub service_id: i32,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration_secs: u32,
    #[serde(default)]
    pub thumbnail_url: String,
}

impl MediaItemRef {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            service_id: 0,
            url: url.into(),
            title: title.into(),
            uploader: None,
            duration_secs: 0,
            thumbnail_url: String::new(),
        }
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = thumbnail_url.into();
        self
    }

    pub fn with_uploader(mut self, uploader: impl Into<String>) -> Self {
        self.uploader = Some(uploader.into());
        self
    }

    pub fn with_duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }
}

/// Read-only projection of a playlist as shown in pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: PlaylistId,
    pub name: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub stream_count: u32,
}

impl PlaylistSummary {
    pub fn has_placeholder_thumbnail(&self) -> bool {
        self.thumbnail_url == PLACEHOLDER_THUMBNAIL
    }
}
