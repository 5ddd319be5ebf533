//! Dioxus front-end: the library page and the playlist dialogs.

mod app;
mod icons;
mod library_view;
mod playlist_append_dialog;
mod playlist_create_dialog;
mod toasts;

pub use app::*;
pub use icons::*;
pub use library_view::*;
pub use playlist_append_dialog::*;
pub use playlist_create_dialog::*;
pub use toasts::*;
