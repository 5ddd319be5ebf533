//! Library data types and the playlist store contract.

pub mod error;
pub mod models;
pub mod store;

pub use error::{LibraryError, Result};
pub use models::*;
pub use store::{PlaylistStore, PlaylistStream};
