//! Integration tests for the SQLite playlist store
//!
//! Covers listing order, duplicate lookups, thumbnails and the live
//! playlist stream.

mod test_helpers;

use std::time::Duration;

use futures_util::StreamExt;
use streamshelf::library::{
    LibraryError, MediaItemRef, PlaylistId, PlaylistStore, PLACEHOLDER_THUMBNAIL,
};
use test_helpers::*;

#[tokio::test]
async fn test_create_playlist_and_list_by_name() {
    let library = TestLibrary::new();

    library.playlist_with("zebra mix", &[item("a")]).await;
    library.playlist_with("Alpha", &[item("a"), item("b")]).await;
    library.playlist_with("middle", &[]).await;

    let playlists = library.manager.load_playlists().await.unwrap();
    let names: Vec<_> = playlists.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "middle", "zebra mix"]);

    let alpha = &playlists[0];
    assert_eq!(alpha.stream_count, 2);
    assert_eq!(alpha.thumbnail_url, "a/thumb.jpg");
    assert_eq!(playlists[1].stream_count, 0);
    assert!(playlists[1].has_placeholder_thumbnail());
}

#[tokio::test]
async fn test_create_playlist_trims_and_rejects_blank_names() {
    let library = TestLibrary::new();

    let summary = library.playlist_with("  Chill  ", &[item("a")]).await;
    assert_eq!(summary.name, "Chill");

    let result = library.manager.create_playlist("   ", &[item("a")]).await;
    assert!(matches!(result, Err(LibraryError::InvalidInput(_))));
    assert_eq!(library.manager.load_playlists().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_first_item_without_thumbnail_gets_placeholder() {
    let library = TestLibrary::new();

    let summary = library
        .playlist_with("Bare", &[MediaItemRef::new("x", "No art")])
        .await;
    assert_eq!(summary.thumbnail_url, PLACEHOLDER_THUMBNAIL);
}

#[tokio::test]
async fn test_duplicate_lookups() {
    let library = TestLibrary::new();
    let a = library.playlist_with("A", &[item("x"), item("y")]).await;
    let b = library.playlist_with("B", &[item("y")]).await;
    let c = library.playlist_with("C", &[item("x"), item("x")]).await;

    let holding_x = library.manager.duplicate_playlists("x").await.unwrap();
    assert_eq!(holding_x, vec![a.id, c.id]);

    assert_eq!(library.manager.count_duplicates(c.id, "x").await.unwrap(), 2);
    assert_eq!(library.manager.count_duplicates(b.id, "x").await.unwrap(), 0);
    assert!(library
        .manager
        .duplicate_playlists("missing")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_append_keeps_order_and_allows_duplicates() {
    let library = TestLibrary::new();
    let playlist = library.playlist_with("Queue", &[item("a")]).await;

    library
        .manager
        .append_to_playlist(playlist.id, &[item("b"), item("a")])
        .await
        .unwrap();

    let urls: Vec<_> = library
        .manager
        .playlist_items(playlist.id)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.url)
        .collect();
    assert_eq!(urls, vec!["a", "b", "a"]);
    assert_eq!(library.summary(playlist.id).await.stream_count, 3);
}

#[tokio::test]
async fn test_append_to_missing_playlist_fails() {
    let library = TestLibrary::new();

    let result = library
        .manager
        .append_to_playlist(PlaylistId::new(404), &[item("a")])
        .await;
    assert!(matches!(
        result,
        Err(LibraryError::PlaylistNotFound(id)) if id == PlaylistId::new(404)
    ));
}

#[tokio::test]
async fn test_change_thumbnail() {
    let library = TestLibrary::new();
    let playlist = library.playlist_with("Art", &[]).await;

    library
        .manager
        .change_thumbnail(playlist.id, "https://img/new.jpg", false)
        .await
        .unwrap();
    assert_eq!(
        library.summary(playlist.id).await.thumbnail_url,
        "https://img/new.jpg"
    );

    let missing = library
        .manager
        .change_thumbnail(PlaylistId::new(999), "x", true)
        .await;
    assert!(matches!(missing, Err(LibraryError::PlaylistNotFound(_))));
}

#[tokio::test]
async fn test_delete_playlist() {
    let library = TestLibrary::new();
    let playlist = library.playlist_with("Gone", &[item("a")]).await;

    library.manager.delete_playlist(playlist.id).await.unwrap();
    assert!(library.manager.playlist(playlist.id).await.unwrap().is_none());
    assert!(library.manager.duplicate_playlists("a").await.unwrap().is_empty());

    let again = library.manager.delete_playlist(playlist.id).await;
    assert!(matches!(again, Err(LibraryError::PlaylistNotFound(_))));
}

#[tokio::test]
async fn test_saved_streams_newest_first() {
    let library = TestLibrary::new();

    library.manager.save_stream(item("first")).await.unwrap();
    library.manager.save_stream(item("second")).await.unwrap();
    // Saving again updates in place.
    library
        .manager
        .save_stream(MediaItemRef::new("first", "Renamed"))
        .await
        .unwrap();

    let streams = library.manager.streams(10).await.unwrap();
    let titles: Vec<_> = streams.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Title of second", "Renamed"]);
    assert_eq!(streams[1].thumbnail_url, "first/thumb.jpg");

    let blank = library.manager.save_stream(MediaItemRef::new(" ", "x")).await;
    assert!(matches!(blank, Err(LibraryError::InvalidInput(_))));
}

#[tokio::test]
async fn test_settings_round_trip() {
    let library = TestLibrary::new();

    let mut settings = library.manager.load_settings().await.unwrap();
    assert_eq!(settings.toast_duration_ms, 2500);

    settings.library_page_size = 50;
    library.manager.save_settings(settings.clone()).await.unwrap();
    assert_eq!(library.manager.load_settings().await.unwrap(), settings);
}

#[tokio::test]
async fn test_playlist_stream_emits_after_each_write() {
    let library = TestLibrary::new();
    let mut playlists = library.manager.playlists();

    let initial = playlists.next().await.unwrap().unwrap();
    assert!(initial.is_empty());

    let created = library.playlist_with("Live", &[]).await;
    let after_create = tokio::time::timeout(Duration::from_secs(2), playlists.next())
        .await
        .expect("stream should emit after create")
        .unwrap()
        .unwrap();
    assert_eq!(after_create.len(), 1);
    assert_eq!(after_create[0].stream_count, 0);

    library
        .manager
        .append_to_playlist(created.id, &[item("a")])
        .await
        .unwrap();
    let after_append = tokio::time::timeout(Duration::from_secs(2), playlists.next())
        .await
        .expect("stream should emit after append")
        .unwrap()
        .unwrap();
    assert_eq!(after_append[0].stream_count, 1);
}
