//! Test helpers and fixtures for library and dialog integration tests
//!
//! Stores are backed by REAL SQLite files in a temp dir, the same way the
//! app opens them.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use streamshelf::db::LocalPlaylistManager;
use streamshelf::dialog::{DialogHost, DuplicatePrompt, Notice, PlaylistListView, PlaylistRow};
use streamshelf::library::{MediaItemRef, PlaylistId, PlaylistStore, PlaylistSummary};
use tempfile::TempDir;

/// Playlist store that cleans up its database on drop
pub struct TestLibrary {
    pub manager: LocalPlaylistManager,
    _temp_dir: TempDir,
}

impl TestLibrary {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let manager = LocalPlaylistManager::open(&temp_dir.path().join("test.db"))
            .expect("Failed to open playlist database");
        Self {
            manager,
            _temp_dir: temp_dir,
        }
    }

    pub fn store(&self) -> Arc<dyn PlaylistStore> {
        Arc::new(self.manager.clone())
    }

    /// Test fixture: create a playlist holding `items`
    pub async fn playlist_with(&self, name: &str, items: &[MediaItemRef]) -> PlaylistSummary {
        let id = self
            .manager
            .create_playlist(name, items)
            .await
            .expect("Failed to create playlist");
        self.summary(id).await
    }

    pub async fn summary(&self, id: PlaylistId) -> PlaylistSummary {
        self.manager
            .playlist(id)
            .await
            .expect("Failed to load playlist")
            .expect("Playlist should exist")
    }
}

/// Test fixture: a stream with a thumbnail derived from its url
pub fn item(url: &str) -> MediaItemRef {
    MediaItemRef::new(url, format!("Title of {url}")).with_thumbnail(format!("{url}/thumb.jpg"))
}

/// Dialog host that records everything it is asked to show
#[derive(Default)]
pub struct RecordingHost {
    pub notices: Mutex<Vec<Notice>>,
    pub prompts: Mutex<Vec<DuplicatePrompt>>,
    pub prompt_dismissals: AtomicUsize,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<DuplicatePrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

impl DialogHost for RecordingHost {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn prompt_duplicates(&self, prompt: DuplicatePrompt) {
        self.prompts.lock().unwrap().push(prompt);
    }

    fn dismiss_prompt(&self) {
        self.prompt_dismissals.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory list view; `updates` counts completed emissions
#[derive(Default)]
pub struct RecordingListView {
    pub rows: Mutex<Vec<PlaylistRow>>,
    pub visible: AtomicBool,
    pub detached: AtomicBool,
    pub updates: AtomicUsize,
}

impl RecordingListView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rows(&self) -> Vec<PlaylistRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn checked_names(&self) -> Vec<String> {
        self.rows()
            .into_iter()
            .filter(|row| row.checked)
            .map(|row| row.playlist.name)
            .collect()
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

impl PlaylistListView for RecordingListView {
    fn replace_rows(&self, playlists: &[PlaylistSummary]) {
        *self.rows.lock().unwrap() = playlists.iter().cloned().map(PlaylistRow::new).collect();
    }

    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn row_id(&self, index: usize) -> Option<PlaylistId> {
        self.rows.lock().unwrap().get(index).map(|row| row.playlist.id)
    }

    fn set_checkmark(&self, index: usize, visible: bool) {
        if let Some(row) = self.rows.lock().unwrap().get_mut(index) {
            row.checked = visible;
        }
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Timed out waiting for condition");
}
