use super::dismiss::{DismissHandle, DismissSlot};
use super::error::{DialogError, Result};
use super::host::{DialogHost, Notice};
use crate::library::{MediaItemRef, PlaylistId, PlaylistStore};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Inner {
    items: Vec<MediaItemRef>,
    store: Arc<dyn PlaylistStore>,
    host: Arc<dyn DialogHost>,
    dismiss: DismissSlot,
    closed: AtomicBool,
}

/// Dialog that creates a new playlist holding the given items.
#[derive(Clone)]
pub struct CreateDialog {
    inner: Arc<Inner>,
}

impl PartialEq for CreateDialog {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CreateDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateDialog")
            .field("items", &self.inner.items.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl CreateDialog {
    pub fn new(
        items: Vec<MediaItemRef>,
        store: Arc<dyn PlaylistStore>,
        host: Arc<dyn DialogHost>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                items,
                store,
                host,
                dismiss: DismissSlot::default(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn items(&self) -> &[MediaItemRef] {
        &self.inner.items
    }

    pub fn set_on_dismiss(&self, handle: DismissHandle) -> Option<DismissHandle> {
        self.inner.dismiss.set(handle)
    }

    pub fn has_dismiss_callback(&self) -> bool {
        self.inner.dismiss.is_set()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Create a playlist named `name` holding the items, then close.
    ///
    /// A blank name is rejected and the dialog stays open.
    pub async fn submit(&self, name: &str) -> Result<PlaylistId> {
        if self.is_closed() {
            return Err(DialogError::Closed);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(DialogError::EmptyName);
        }

        let id = match self.inner.store.create_playlist(name, &self.inner.items).await {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(name, "failed to create playlist: {}", err);
                self.inner.host.notify(Notice::Failed {
                    message: format!("Could not create \"{name}\": {err}"),
                });
                return Err(err.into());
            }
        };

        self.inner.host.notify(Notice::PlaylistCreated {
            name: name.to_string(),
        });
        self.close();
        Ok(id)
    }

    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.dismiss.fire();
    }
}
