//! StreamShelf: a local stream library with playlists.

pub mod components;
pub mod db;
pub mod diagnostics;
pub mod dialog;
pub mod library;
