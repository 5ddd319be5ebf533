use crate::components::{Icon, IconName};
use crate::dialog::{CreateDialog, DialogError};
use dioxus::prelude::*;

#[component]
pub fn PlaylistCreateDialogView(dialog: CreateDialog) -> Element {
    let mut name = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    {
        let dialog = dialog.clone();
        use_drop(move || dialog.close());
    }

    let submit = {
        let dialog = dialog.clone();
        move || {
            if saving() {
                return;
            }
            saving.set(true);
            error.set(None);
            let dialog = dialog.clone();
            let value = name();
            spawn(async move {
                if let Err(err) = dialog.submit(&value).await {
                    // Closed means the dialog went away mid-submit; nothing to show.
                    if !matches!(err, DialogError::Closed) {
                        if let Ok(mut error) = error.try_write() {
                            *error = Some(err.to_string());
                        };
                    }
                }
                if let Ok(mut saving) = saving.try_write() {
                    *saving = false;
                };
            });
        }
    };

    let on_close = {
        let dialog = dialog.clone();
        move |_: MouseEvent| dialog.close()
    };
    let count = dialog.items().len();

    rsx! {
        div { class: "backdrop", onclick: on_close.clone(),
            div {
                class: "dialog",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                div { class: "dialog-header",
                    div {
                        p { class: "eyebrow", "New playlist" }
                        h2 { class: "dialog-title",
                            if count == 1 {
                                "Create a playlist for this item"
                            } else {
                                "Create a playlist for {count} items"
                            }
                        }
                    }
                    button { class: "icon-button", onclick: on_close,
                        Icon { name: IconName::X, class: "icon".to_string() }
                    }
                }

                input {
                    class: "text-input",
                    r#type: "text",
                    placeholder: "Playlist name",
                    value: "{name}",
                    autofocus: true,
                    oninput: move |evt| name.set(evt.value()),
                    onkeydown: {
                        let mut submit = submit.clone();
                        move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter {
                                submit();
                            }
                        }
                    },
                }

                if let Some(message) = error() {
                    p { class: "error-text", "{message}" }
                }

                div { class: "dialog-footer",
                    button {
                        class: "button button-primary",
                        disabled: saving(),
                        onclick: {
                            let mut submit = submit.clone();
                            move |_: MouseEvent| submit()
                        },
                        if saving() {
                            Icon { name: IconName::Loader, class: "icon-small".to_string() }
                        } else {
                            Icon { name: IconName::Plus, class: "icon-small".to_string() }
                        }
                        "Create"
                    }
                }
            }
        }
    }
}
