use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::error::Result;
use super::models::{MediaItemRef, PlaylistId, PlaylistSummary};

/// Stream of full playlist listings, one item per store change.
pub type PlaylistStream = BoxStream<'static, Result<Vec<PlaylistSummary>>>;

/// Playlist operations the dialogs depend on.
///
/// Implementations run queries off the UI thread; every write must cause
/// live [`PlaylistStore::playlists`] streams to emit a fresh listing.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Current playlists, emitted immediately and again after each change.
    fn playlists(&self) -> PlaylistStream;

    /// Ids of every playlist that already holds a stream with `url`.
    async fn duplicate_playlists(&self, url: &str) -> Result<Vec<PlaylistId>>;

    /// How many times `url` occurs in `playlist`.
    async fn count_duplicates(&self, playlist: PlaylistId, url: &str) -> Result<usize>;

    async fn append_to_playlist(&self, playlist: PlaylistId, items: &[MediaItemRef]) -> Result<()>;

    /// Replace the playlist thumbnail. `permanent` marks a user choice that
    /// later automatic updates should keep.
    async fn change_thumbnail(&self, playlist: PlaylistId, url: &str, permanent: bool)
        -> Result<()>;

    async fn create_playlist(&self, name: &str, items: &[MediaItemRef]) -> Result<PlaylistId>;
}
