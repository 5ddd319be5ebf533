use crate::library::{PlaylistId, PlaylistSummary};
use std::collections::HashSet;

/// A playlist as rendered in a picker row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRow {
    pub playlist: PlaylistSummary,
    /// Checkmark shown when the playlist already holds the item being added.
    pub checked: bool,
}

impl PlaylistRow {
    pub fn new(playlist: PlaylistSummary) -> Self {
        Self {
            playlist,
            checked: false,
        }
    }
}

/// List view the append dialog renders into.
///
/// Row indices refer to the order of the last `replace_rows` call.
pub trait PlaylistListView: Send + Sync {
    fn replace_rows(&self, playlists: &[PlaylistSummary]);

    fn row_count(&self) -> usize;

    /// Stable id of the row at `index`.
    fn row_id(&self, index: usize) -> Option<PlaylistId>;

    fn set_checkmark(&self, index: usize, visible: bool);

    fn set_visible(&self, visible: bool);

    /// Drop selection callbacks; called once when the dialog closes.
    fn detach(&self);
}

/// Flag exactly the rows whose playlist is in `duplicates`.
pub fn flag_duplicate_rows(view: &dyn PlaylistListView, duplicates: &HashSet<PlaylistId>) {
    for index in 0..view.row_count() {
        if let Some(id) = view.row_id(index) {
            view.set_checkmark(index, duplicates.contains(&id));
        }
    }
}
