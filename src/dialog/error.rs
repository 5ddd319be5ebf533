use thiserror::Error;

use crate::library::LibraryError;

pub type Result<T> = std::result::Result<T, DialogError>;

#[derive(Error, Debug)]
pub enum DialogError {
    #[error(transparent)]
    Store(#[from] LibraryError),

    #[error("Please enter a playlist name.")]
    EmptyName,

    #[error("The dialog is already closed.")]
    Closed,

    #[error("No async runtime is available to load playlists.")]
    NoRuntime,
}
