use crate::components::{Icon, IconName, SignalDialogHost};
use crate::dialog::{
    AppendDialog, CreateDialog, DialogHost, DialogState, PlaylistListView, PlaylistRow,
};
use crate::library::{PlaylistId, PlaylistSummary};
use dioxus::prelude::*;
use std::sync::Arc;

/// List view backed by sync signals owned by the dialog component.
///
/// Every access tolerates the signals being gone, since the dialog may call
/// back while the component is unmounting.
#[derive(Clone, Copy)]
struct SignalListView {
    rows: SyncSignal<Vec<PlaylistRow>>,
    visible: SyncSignal<bool>,
    attached: SyncSignal<bool>,
}

impl PlaylistListView for SignalListView {
    fn replace_rows(&self, playlists: &[PlaylistSummary]) {
        let mut rows = self.rows;
        if let Ok(mut rows) = rows.try_write() {
            *rows = playlists.iter().cloned().map(PlaylistRow::new).collect();
        };
    }

    fn row_count(&self) -> usize {
        self.rows.try_peek().map(|rows| rows.len()).unwrap_or(0)
    }

    fn row_id(&self, index: usize) -> Option<PlaylistId> {
        self.rows
            .try_peek()
            .ok()
            .and_then(|rows| rows.get(index).map(|row| row.playlist.id))
    }

    fn set_checkmark(&self, index: usize, visible: bool) {
        let mut rows = self.rows;
        if let Ok(mut rows) = rows.try_write() {
            if let Some(row) = rows.get_mut(index) {
                row.checked = visible;
            }
        };
    }

    fn set_visible(&self, visible: bool) {
        let mut shown = self.visible;
        if let Ok(mut shown) = shown.try_write() {
            *shown = visible;
        };
    }

    fn detach(&self) {
        let mut attached = self.attached;
        if let Ok(mut attached) = attached.try_write() {
            *attached = false;
        };
    }
}

#[component]
pub fn PlaylistAppendDialogView(
    dialog: AppendDialog,
    on_create_new: EventHandler<CreateDialog>,
) -> Element {
    let host = use_context::<SignalDialogHost>();
    let rows = use_signal_sync(Vec::<PlaylistRow>::new);
    let visible = use_signal_sync(|| false);
    let attached = use_signal_sync(|| true);
    let busy = use_signal(|| false);

    {
        let dialog = dialog.clone();
        use_hook(move || {
            let view = SignalListView {
                rows,
                visible,
                attached,
            };
            if let Err(err) = dialog.on_shown(Arc::new(view)) {
                tracing::error!("could not show playlist picker: {}", err);
            }
        });
    }
    {
        let dialog = dialog.clone();
        use_drop(move || dialog.close());
    }

    let make_select = {
        let dialog = dialog.clone();
        move |playlist: PlaylistSummary| {
            let dialog = dialog.clone();
            let mut busy = busy;
            move |_: MouseEvent| {
                if busy() || !attached() {
                    return;
                }
                busy.set(true);
                let dialog = dialog.clone();
                let playlist = playlist.clone();
                spawn(async move {
                    if let Err(err) = dialog.on_row_selected(playlist).await {
                        tracing::warn!("adding to playlist failed: {}", err);
                    }
                    if let Ok(mut busy) = busy.try_write() {
                        *busy = false;
                    };
                });
            }
        }
    };

    let on_confirm = {
        let dialog = dialog.clone();
        let host = host.clone();
        let mut busy = busy;
        move |_: MouseEvent| {
            if busy() {
                return;
            }
            busy.set(true);
            host.dismiss_prompt();
            let dialog = dialog.clone();
            spawn(async move {
                if let Err(err) = dialog.confirm_duplicate().await {
                    tracing::warn!("adding duplicate failed: {}", err);
                }
                if let Ok(mut busy) = busy.try_write() {
                    *busy = false;
                };
            });
        }
    };

    let on_cancel_prompt = {
        let dialog = dialog.clone();
        let host = host.clone();
        move |_: MouseEvent| {
            dialog.cancel_duplicate();
            host.dismiss_prompt();
        }
    };

    let on_new_playlist = {
        let dialog = dialog.clone();
        move |_: MouseEvent| {
            if let Some(next) = dialog.open_create_new() {
                on_create_new.call(next);
            }
        }
    };

    let on_close = {
        let dialog = dialog.clone();
        move |_: MouseEvent| dialog.close()
    };

    let prompt = host
        .prompt()
        .filter(|_| matches!(dialog.state(), DialogState::Confirming { .. }));
    let item_label = match dialog.items() {
        [] => "Nothing selected".to_string(),
        [only] => only.title.clone(),
        [first, rest @ ..] => format!("{} and {} more", first.title, rest.len()),
    };
    let rows_snapshot = rows.read().clone();

    rsx! {
        div { class: "backdrop", onclick: on_close.clone(),
            div {
                class: "dialog",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                div { class: "dialog-header",
                    div { class: "min-w-0",
                        p { class: "eyebrow", "Add to playlist" }
                        h2 { class: "dialog-title truncate", "{item_label}" }
                    }
                    button { class: "icon-button", onclick: on_close,
                        Icon { name: IconName::X, class: "icon".to_string() }
                    }
                }

                if let Some(prompt) = prompt {
                    div { class: "prompt",
                        h3 { class: "prompt-title", "{prompt.title()}" }
                        p { class: "prompt-message", "{prompt.message()}" }
                        div { class: "prompt-actions",
                            button {
                                class: "button button-primary",
                                disabled: busy(),
                                onclick: on_confirm,
                                "Yes"
                            }
                            button { class: "button", onclick: on_cancel_prompt, "Cancel" }
                        }
                    }
                } else if !visible() {
                    div { class: "loading-row",
                        Icon { name: IconName::Loader, class: "icon".to_string() }
                        "Loading playlists..."
                    }
                } else if rows_snapshot.is_empty() {
                    p { class: "muted", "No playlists yet." }
                } else {
                    div { class: "playlist-list",
                        for row in rows_snapshot {
                            button {
                                key: "{row.playlist.id}",
                                class: "playlist-row",
                                disabled: busy(),
                                onclick: make_select(row.playlist.clone()),
                                if row.playlist.has_placeholder_thumbnail() || row.playlist.thumbnail_url.is_empty() {
                                    div { class: "thumb thumb-placeholder",
                                        Icon { name: IconName::Playlist, class: "icon-small".to_string() }
                                    }
                                } else {
                                    img {
                                        class: "thumb",
                                        src: "{row.playlist.thumbnail_url}",
                                        alt: "Playlist art",
                                    }
                                }
                                div { class: "min-w-0 grow",
                                    div { class: "row-title truncate", "{row.playlist.name}" }
                                    p { class: "row-subtitle", "{row.playlist.stream_count} items" }
                                }
                                if row.checked {
                                    span { class: "checkmark", title: "Already in this playlist",
                                        Icon { name: IconName::Check, class: "icon-small".to_string() }
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "dialog-footer",
                    button {
                        class: "button",
                        disabled: dialog.items().is_empty(),
                        onclick: on_new_playlist,
                        Icon { name: IconName::Plus, class: "icon-small".to_string() }
                        "New playlist"
                    }
                }
            }
        }
    }
}
