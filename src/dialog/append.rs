//! Dialog that appends a fixed set of items to an existing playlist.

use super::create::CreateDialog;
use super::dismiss::{DismissHandle, DismissSlot};
use super::disposables::Disposables;
use super::error::{DialogError, Result};
use super::host::{DialogHost, DuplicatePrompt, Notice};
use super::list_view::{flag_duplicate_rows, PlaylistListView};
use crate::library::{MediaItemRef, PlaylistId, PlaylistStore, PlaylistStream, PlaylistSummary};
use futures_util::StreamExt;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Lifecycle of an [`AppendDialog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Created,
    Shown,
    /// Waiting for the user to answer a duplicate prompt.
    Confirming {
        playlist: PlaylistSummary,
        duplicates: usize,
    },
    Appending,
    CreatingNew,
    Closed,
}

/// What happened after a row was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Appended,
    AwaitingConfirmation { duplicates: usize },
    /// Nothing to do: no items, the dialog is busy, or it was closed.
    Ignored,
}

#[derive(Default)]
struct Listing {
    playlists: Vec<PlaylistSummary>,
    duplicates: HashSet<PlaylistId>,
}

struct Inner {
    items: Vec<MediaItemRef>,
    store: Arc<dyn PlaylistStore>,
    host: Arc<dyn DialogHost>,
    state: Mutex<DialogState>,
    view: Mutex<Option<Arc<dyn PlaylistListView>>>,
    listing: Mutex<Listing>,
    disposables: Disposables,
    dismiss: DismissSlot,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Picker that adds `items` to a playlist chosen from a live list.
///
/// Cloning yields another handle to the same dialog.
#[derive(Clone)]
pub struct AppendDialog {
    inner: Arc<Inner>,
}

impl PartialEq for AppendDialog {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for AppendDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppendDialog")
            .field("items", &self.inner.items.len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl AppendDialog {
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
                state: Mutex::new(DialogState::Created),
                view: Mutex::new(None),
                listing: Mutex::new(Listing::default()),
                disposables: Disposables::default(),
                dismiss: DismissSlot::default(),
            }),
        }
    }

    pub fn items(&self) -> &[MediaItemRef] {
        &self.inner.items
    }

    pub fn state(&self) -> DialogState {
        lock(&self.inner.state).clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == DialogState::Closed
    }

    /// Install the dismiss callback, returning any callback it replaced.
    pub fn set_on_dismiss(&self, handle: DismissHandle) -> Option<DismissHandle> {
        self.inner.dismiss.set(handle)
    }

    pub fn has_dismiss_callback(&self) -> bool {
        self.inner.dismiss.is_set()
    }

    /// Playlists from the most recent store emission.
    pub fn playlists(&self) -> Vec<PlaylistSummary> {
        lock(&self.inner.listing).playlists.clone()
    }

    /// Whether `playlist` already contains the first item, as of the last
    /// emission.
    pub fn is_duplicate(&self, playlist: PlaylistId) -> bool {
        lock(&self.inner.listing).duplicates.contains(&playlist)
    }

    /// Attach `view` and start following the store's playlists.
    pub fn on_shown(&self, view: Arc<dyn PlaylistListView>) -> Result<()> {
        {
            let mut state = lock(&self.inner.state);
            match *state {
                DialogState::Created => {}
                DialogState::Closed => return Err(DialogError::Closed),
                _ => {
                    tracing::debug!("append dialog already shown");
                    return Ok(());
                }
            }
            *state = DialogState::Shown;
        }
        *lock(&self.inner.view) = Some(view);

        let playlists = self.inner.store.playlists();
        let inner = Arc::downgrade(&self.inner);
        if !self.inner.disposables.spawn(follow_playlists(inner, playlists)) {
            // Nothing is following the store; allow a later retry.
            lock(&self.inner.view).take();
            let mut state = lock(&self.inner.state);
            if *state == DialogState::Shown {
                *state = DialogState::Created;
            }
            return Err(DialogError::NoRuntime);
        }
        tracing::debug!(items = self.inner.items.len(), "append dialog subscribed to playlists");
        Ok(())
    }

    /// React to the user picking `playlist`.
    pub async fn on_row_selected(&self, playlist: PlaylistSummary) -> Result<Selection> {
        let Some(first) = self.inner.items.first() else {
            return Ok(Selection::Ignored);
        };
        if self.state() != DialogState::Shown {
            return Ok(Selection::Ignored);
        }

        let duplicates = self
            .inner
            .store
            .count_duplicates(playlist.id, &first.url)
            .await?;

        {
            let mut state = lock(&self.inner.state);
            if *state != DialogState::Shown {
                return Ok(Selection::Ignored);
            }
            *state = if duplicates > 0 {
                DialogState::Confirming {
                    playlist: playlist.clone(),
                    duplicates,
                }
            } else {
                DialogState::Appending
            };
        }

        if duplicates > 0 {
            tracing::debug!(playlist = %playlist.id, duplicates, "asking before adding duplicate");
            self.inner
                .host
                .prompt_duplicates(DuplicatePrompt { playlist, duplicates });
            return Ok(Selection::AwaitingConfirmation { duplicates });
        }

        self.append(playlist).await?;
        Ok(Selection::Appended)
    }

    /// The user accepted the duplicate prompt.
    pub async fn confirm_duplicate(&self) -> Result<bool> {
        let playlist = {
            let mut state = lock(&self.inner.state);
            let playlist = match &*state {
                DialogState::Confirming { playlist, .. } => playlist.clone(),
                _ => return Ok(false),
            };
            *state = DialogState::Appending;
            playlist
        };
        self.append(playlist).await?;
        Ok(true)
    }

    /// The user declined the duplicate prompt; nothing is written.
    pub fn cancel_duplicate(&self) {
        let mut state = lock(&self.inner.state);
        if matches!(*state, DialogState::Confirming { .. }) {
            *state = DialogState::Shown;
        }
    }

    /// Add every item to `playlist`, then close.
    ///
    /// A placeholder thumbnail is replaced by the first item's thumbnail.
    /// Both writes run concurrently.
    async fn append(&self, playlist: PlaylistSummary) -> Result<()> {
        let Some(first) = self.inner.items.first() else {
            return Ok(());
        };
        *lock(&self.inner.state) = DialogState::Appending;

        let store = &self.inner.store;
        let thumbnail = async {
            if playlist.has_placeholder_thumbnail() {
                store
                    .change_thumbnail(playlist.id, &first.thumbnail_url, false)
                    .await
            } else {
                Ok(())
            }
        };
        let append = store.append_to_playlist(playlist.id, &self.inner.items);
        let (thumbnail, appended) = futures_util::join!(thumbnail, append);

        if let Err(err) = thumbnail {
            tracing::warn!(playlist = %playlist.id, "failed to update playlist thumbnail: {}", err);
        }
        if let Err(err) = appended {
            tracing::error!(playlist = %playlist.id, "failed to append to playlist: {}", err);
            {
                let mut state = lock(&self.inner.state);
                if *state == DialogState::Appending {
                    *state = DialogState::Shown;
                }
            }
            self.inner.host.notify(Notice::Failed {
                message: format!("Unable to add to {}: {err}", playlist.name),
            });
            return Err(err.into());
        }

        self.inner.host.notify(Notice::AddedToPlaylist {
            playlist: playlist.name.clone(),
            items: self.inner.items.len(),
        });
        self.close();
        Ok(())
    }

    /// Close this dialog and hand the items and dismiss callback to a
    /// create-playlist dialog.
    pub fn open_create_new(&self) -> Option<CreateDialog> {
        if self.inner.items.is_empty() {
            return None;
        }
        {
            let mut state = lock(&self.inner.state);
            if *state == DialogState::Closed {
                return None;
            }
            *state = DialogState::CreatingNew;
        }

        let successor = CreateDialog::new(
            self.inner.items.clone(),
            Arc::clone(&self.inner.store),
            Arc::clone(&self.inner.host),
        );
        if let Some(handle) = self.inner.dismiss.take() {
            successor.set_on_dismiss(handle);
        }
        self.close();
        Some(successor)
    }

    /// Cancel subscriptions, detach the view and run the dismiss callback.
    pub fn close(&self) {
        let was_confirming = {
            let mut state = lock(&self.inner.state);
            if *state == DialogState::Closed {
                return;
            }
            let confirming = matches!(*state, DialogState::Confirming { .. });
            *state = DialogState::Closed;
            confirming
        };

        self.inner.disposables.dispose();
        if let Some(view) = lock(&self.inner.view).take() {
            view.detach();
        }
        *lock(&self.inner.listing) = Listing::default();
        if was_confirming {
            self.inner.host.dismiss_prompt();
        }
        tracing::debug!("append dialog closed");
        self.inner.dismiss.fire();
    }
}

impl Inner {
    /// Render one store emission. Holds the view lock for the whole update
    /// so `close` cannot interleave with it.
    fn apply_playlists(&self, playlists: Vec<PlaylistSummary>, duplicates: HashSet<PlaylistId>) {
        let attached = lock(&self.view);
        let Some(view) = attached.as_ref() else {
            return;
        };
        view.replace_rows(&playlists);
        flag_duplicate_rows(view.as_ref(), &duplicates);
        *lock(&self.listing) = Listing {
            playlists,
            duplicates,
        };
        view.set_visible(true);
    }
}

async fn follow_playlists(inner: Weak<Inner>, mut playlists: PlaylistStream) {
    while let Some(next) = playlists.next().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let playlists = match next {
            Ok(playlists) => playlists,
            Err(err) => {
                tracing::error!("playlist subscription failed: {}", err);
                break;
            }
        };

        let duplicates = match inner.items.first() {
            Some(first) => match inner.store.duplicate_playlists(&first.url).await {
                Ok(ids) => ids.into_iter().collect(),
                Err(err) => {
                    tracing::warn!("duplicate lookup failed: {}", err);
                    HashSet::new()
                }
            },
            None => HashSet::new(),
        };

        inner.apply_playlists(playlists, duplicates);
    }
    tracing::debug!("playlist subscription ended");
}
