use crate::components::{
    Icon, IconName, LibraryView, PlaylistAppendDialogView, PlaylistCreateDialogView,
    SignalDialogHost, Toast, ToastStack,
};
use crate::db::{database_path, AppSettings, LocalPlaylistManager};
use crate::dialog::{AppendDialog, CreateDialog, DialogHost, DismissHandle, DuplicatePrompt};
use crate::library::{MediaItemRef, PlaylistStore};
use dioxus::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum ActiveDialog {
    Append(AppendDialog),
    Create(CreateDialog),
}

impl ActiveDialog {
    fn close(&self) {
        match self {
            ActiveDialog::Append(dialog) => dialog.close(),
            ActiveDialog::Create(dialog) => dialog.close(),
        }
    }
}

#[component]
pub fn AppShell() -> Element {
    let manager = use_hook(|| {
        let path = database_path();
        LocalPlaylistManager::open(&path).map_err(|err| {
            tracing::error!(path = %path.display(), "failed to open database: {}", err);
            format!("{} ({})", err, path.display())
        })
    });

    match manager {
        Ok(manager) => rsx! {
            LibraryShell { manager }
        },
        Err(message) => rsx! {
            div { class: "fatal",
                Icon { name: IconName::X, class: "icon-large".to_string() }
                h1 { "Could not open the library" }
                p { class: "muted", "{message}" }
            }
        },
    }
}

#[component]
fn LibraryShell(manager: LocalPlaylistManager) -> Element {
    let toasts = use_signal_sync(Vec::<Toast>::new);
    let prompt = use_signal_sync(|| None::<DuplicatePrompt>);
    let host = use_hook(|| SignalDialogHost::new(toasts, prompt));
    let mut app_settings = use_signal(AppSettings::default);
    let mut settings_loaded = use_signal(|| false);
    let active = use_signal_sync(|| None::<ActiveDialog>);

    use_context_provider(|| manager.clone());
    use_context_provider(|| host.clone());
    use_context_provider(|| app_settings);

    {
        let manager = manager.clone();
        use_effect(move || {
            let manager = manager.clone();
            spawn(async move {
                match manager.load_settings().await {
                    Ok(settings) => app_settings.set(settings),
                    Err(err) => tracing::warn!("failed to load settings, using defaults: {}", err),
                }
                settings_loaded.set(true);
            });
        });
    }

    // Persist settings once the stored copy has been read.
    {
        let manager = manager.clone();
        let host = host.clone();
        use_effect(move || {
            let settings = app_settings();
            host.set_toast_duration(settings.toast_duration_ms);
            if !settings_loaded() {
                return;
            }
            let manager = manager.clone();
            spawn(async move {
                if let Err(err) = manager.save_settings(settings).await {
                    tracing::warn!("failed to save settings: {}", err);
                }
            });
        });
    }

    let on_add = {
        let manager = manager.clone();
        let host = host.clone();
        move |items: Vec<MediaItemRef>| {
            let mut active = active;
            let previous = active.peek().clone();
            if let Some(previous) = previous {
                previous.close();
            }

            let store: Arc<dyn PlaylistStore> = Arc::new(manager.clone());
            let dialog_host: Arc<dyn DialogHost> = Arc::new(host.clone());
            let dialog = AppendDialog::new(items, store, dialog_host);
            dialog.set_on_dismiss(dismiss_into(active));
            active.set(Some(ActiveDialog::Append(dialog)));
        }
    };

    let on_create_new = move |dialog: CreateDialog| {
        let mut active = active;
        if !dialog.has_dismiss_callback() {
            dialog.set_on_dismiss(dismiss_into(active));
        }
        active.set(Some(ActiveDialog::Create(dialog)));
    };

    rsx! {
        div { class: "app",
            main { class: "app-main",
                LibraryView { on_add }
            }

            {match active() {
                Some(ActiveDialog::Append(dialog)) => rsx! {
                    PlaylistAppendDialogView { dialog, on_create_new }
                },
                Some(ActiveDialog::Create(dialog)) => rsx! {
                    PlaylistCreateDialogView { dialog }
                },
                None => rsx! {},
            }}

            ToastStack {}
        }
    }
}

/// Dismiss handle that clears the active dialog slot.
fn dismiss_into(active: SyncSignal<Option<ActiveDialog>>) -> DismissHandle {
    DismissHandle::new(move || {
        let mut active = active;
        if let Ok(mut slot) = active.try_write() {
            *slot = None;
        };
    })
}
