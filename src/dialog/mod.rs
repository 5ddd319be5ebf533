//! Playlist dialogs: append to an existing playlist or create a new one.

mod append;
mod create;
mod dismiss;
mod disposables;
mod error;
mod host;
mod list_view;

pub use append::{AppendDialog, DialogState, Selection};
pub use create::CreateDialog;
pub use dismiss::{DismissHandle, DismissSlot};
pub use disposables::Disposables;
pub use error::{DialogError, Result};
pub use host::{DialogHost, DuplicatePrompt, Notice};
pub use list_view::{flag_duplicate_rows, PlaylistListView, PlaylistRow};
