use crate::components::{Icon, IconName};
use crate::db::{AppSettings, LocalPlaylistManager};
use crate::library::MediaItemRef;
use dioxus::prelude::*;
use std::collections::BTreeSet;

/// Saved streams with entry points into the playlist dialogs.
#[component]
pub fn LibraryView(on_add: EventHandler<Vec<MediaItemRef>>) -> Element {
    let manager = use_context::<LocalPlaylistManager>();
    let app_settings = use_context::<Signal<AppSettings>>();
    let mut selected = use_signal(BTreeSet::<usize>::new);

    let mut new_url = use_signal(String::new);
    let mut new_title = use_signal(String::new);
    let mut new_thumbnail = use_signal(String::new);
    let mut form_error = use_signal(|| None::<String>);

    let mut streams = {
        let manager = manager.clone();
        use_resource(move || {
            let manager = manager.clone();
            let limit = app_settings().library_page_size;
            async move { manager.streams(limit).await }
        })
    };

    let on_save_stream = {
        let manager = manager.clone();
        move |_: MouseEvent| {
            let url = new_url().trim().to_string();
            let title = new_title().trim().to_string();
            if url.is_empty() {
                form_error.set(Some("A stream URL is required.".to_string()));
                return;
            }
            let title = if title.is_empty() { url.clone() } else { title };
            let item = MediaItemRef::new(url, title).with_thumbnail(new_thumbnail().trim());
            let manager = manager.clone();
            form_error.set(None);
            spawn(async move {
                match manager.save_stream(item).await {
                    Ok(()) => {
                        new_url.set(String::new());
                        new_title.set(String::new());
                        new_thumbnail.set(String::new());
                        selected.set(BTreeSet::new());
                        streams.restart();
                    }
                    Err(err) => {
                        tracing::error!("failed to save stream: {}", err);
                        form_error.set(Some(err.to_string()));
                    }
                }
            });
        }
    };

    let loaded: Vec<MediaItemRef> = match &*streams.read() {
        Some(Ok(items)) => items.clone(),
        _ => Vec::new(),
    };
    let load_error = match &*streams.read() {
        Some(Err(err)) => Some(err.to_string()),
        _ => None,
    };
    let is_loading = streams.read().is_none();
    let selection_count = selected().len();

    let on_add_selected = {
        let loaded = loaded.clone();
        move |_: MouseEvent| {
            let items: Vec<MediaItemRef> = selected()
                .iter()
                .filter_map(|index| loaded.get(*index).cloned())
                .collect();
            if !items.is_empty() {
                on_add.call(items);
            }
        }
    };

    rsx! {
        div { class: "page",
            header { class: "page-header",
                div {
                    h1 { class: "page-title", "Library" }
                    p { class: "muted", "Saved streams. Pick some and add them to a playlist." }
                }
                button {
                    class: "button button-primary",
                    disabled: selection_count == 0,
                    onclick: on_add_selected,
                    Icon { name: IconName::Playlist, class: "icon-small".to_string() }
                    if selection_count > 1 {
                        "Add {selection_count} to playlist"
                    } else {
                        "Add to playlist"
                    }
                }
            }

            section { class: "card",
                h2 { class: "card-title", "Save a stream" }
                div { class: "form-row",
                    input {
                        class: "text-input",
                        placeholder: "Stream URL",
                        value: "{new_url}",
                        oninput: move |evt| new_url.set(evt.value()),
                    }
                    input {
                        class: "text-input",
                        placeholder: "Title",
                        value: "{new_title}",
                        oninput: move |evt| new_title.set(evt.value()),
                    }
                    input {
                        class: "text-input",
                        placeholder: "Thumbnail URL (optional)",
                        value: "{new_thumbnail}",
                        oninput: move |evt| new_thumbnail.set(evt.value()),
                    }
                    button { class: "button", onclick: on_save_stream,
                        Icon { name: IconName::Plus, class: "icon-small".to_string() }
                        "Save"
                    }
                }
                if let Some(message) = form_error() {
                    p { class: "error-text", "{message}" }
                }
            }

            if is_loading {
                div { class: "loading-row",
                    Icon { name: IconName::Loader, class: "icon".to_string() }
                    "Loading library..."
                }
            } else if let Some(message) = load_error {
                p { class: "error-text", "Could not load the library: {message}" }
            } else if loaded.is_empty() {
                div { class: "empty-state",
                    Icon { name: IconName::Music, class: "icon-large".to_string() }
                    h2 { "Nothing saved yet" }
                    p { class: "muted", "Saved streams show up here." }
                }
            } else {
                div { class: "stream-list",
                    for (index, item) in loaded.into_iter().enumerate() {
                        StreamRow {
                            key: "{item.service_id}-{item.url}",
                            item: item.clone(),
                            checked: selected().contains(&index),
                            on_toggle: move |_| {
                                let mut current = selected.write();
                                if !current.remove(&index) {
                                    current.insert(index);
                                }
                            },
                            on_add: move |item: MediaItemRef| on_add.call(vec![item]),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StreamRow(
    item: MediaItemRef,
    checked: bool,
    on_toggle: EventHandler<()>,
    on_add: EventHandler<MediaItemRef>,
) -> Element {
    let subtitle = match (&item.uploader, item.duration_secs) {
        (Some(uploader), 0) => uploader.clone(),
        (Some(uploader), secs) => format!("{} • {}", uploader, format_duration(secs)),
        (None, 0) => item.url.clone(),
        (None, secs) => format_duration(secs),
    };

    rsx! {
        div { class: if checked { "stream-row stream-row-selected" } else { "stream-row" },
            input {
                r#type: "checkbox",
                checked,
                onchange: move |_| on_toggle.call(()),
            }
            if item.thumbnail_url.is_empty() {
                div { class: "thumb thumb-placeholder",
                    Icon { name: IconName::Music, class: "icon-small".to_string() }
                }
            } else {
                img { class: "thumb", src: "{item.thumbnail_url}", alt: "" }
            }
            div { class: "min-w-0 grow",
                div { class: "row-title truncate", "{item.title}" }
                p { class: "row-subtitle truncate", "{subtitle}" }
            }
            button {
                class: "icon-button",
                title: "Add to playlist",
                onclick: {
                    let item = item.clone();
                    move |_| on_add.call(item.clone())
                },
                Icon { name: IconName::Plus, class: "icon".to_string() }
            }
        }
    }
}

fn format_duration(secs: u32) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(75), "1:15");
        assert_eq!(format_duration(3_725), "1:02:05");
    }
}
