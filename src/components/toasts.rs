//! Toast stack and the signal-backed dialog host.

use crate::dialog::{DialogHost, DuplicatePrompt, Notice};
use dioxus::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TOAST_MS: u64 = 2500;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// [`DialogHost`] that publishes notices and prompts through signals.
///
/// Uses sync signals so dialogs may report from any thread.
#[derive(Clone)]
pub struct SignalDialogHost {
    toasts: SyncSignal<Vec<Toast>>,
    prompt: SyncSignal<Option<DuplicatePrompt>>,
    next_id: Arc<AtomicU64>,
    toast_ms: Arc<AtomicU64>,
}

impl SignalDialogHost {
    pub fn new(
        toasts: SyncSignal<Vec<Toast>>,
        prompt: SyncSignal<Option<DuplicatePrompt>>,
    ) -> Self {
        Self {
            toasts,
            prompt,
            next_id: Arc::new(AtomicU64::new(1)),
            toast_ms: Arc::new(AtomicU64::new(DEFAULT_TOAST_MS)),
        }
    }

    pub fn set_toast_duration(&self, ms: u64) {
        self.toast_ms.store(ms, Ordering::Relaxed);
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.read().clone()
    }

    pub fn prompt(&self) -> Option<DuplicatePrompt> {
        self.prompt.read().clone()
    }

    pub fn dismiss_toast(&self, id: u64) {
        let mut toasts = self.toasts;
        if let Ok(mut toasts) = toasts.try_write() {
            toasts.retain(|toast| toast.id != id);
        };
    }
}

impl DialogHost for SignalDialogHost {
    fn notify(&self, notice: Notice) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut toasts = self.toasts;
        if let Ok(mut toasts) = toasts.try_write() {
            toasts.push(Toast { id, notice });
        }

        let duration = Duration::from_millis(self.toast_ms.load(Ordering::Relaxed));
        let host = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(duration).await;
                    host.dismiss_toast(id);
                });
            }
            Err(_) => tracing::debug!("no runtime for toast expiry; toast stays until clicked"),
        }
    }

    fn prompt_duplicates(&self, prompt: DuplicatePrompt) {
        let mut slot = self.prompt;
        if let Ok(mut slot) = slot.try_write() {
            *slot = Some(prompt);
        };
    }

    fn dismiss_prompt(&self) {
        let mut slot = self.prompt;
        if let Ok(mut slot) = slot.try_write() {
            *slot = None;
        };
    }
}

#[component]
pub fn ToastStack() -> Element {
    let host = use_context::<SignalDialogHost>();
    let toasts = host.toasts();

    rsx! {
        div { class: "toast-stack",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    class: if toast.notice.is_success() { "toast toast-success" } else { "toast toast-error" },
                    onclick: {
                        let host = host.clone();
                        let id = toast.id;
                        move |_| host.dismiss_toast(id)
                    },
                    "{toast.notice.message()}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{PlaylistId, PlaylistSummary, PLACEHOLDER_THUMBNAIL};
    use std::sync::Mutex;

    static SEEN: Mutex<Vec<String>> = Mutex::new(Vec::new());

    #[allow(non_snake_case)]
    fn HostHarness() -> Element {
        let toasts = use_signal_sync(Vec::<Toast>::new);
        let prompt = use_signal_sync(|| None::<DuplicatePrompt>);
        use_hook(move || {
            let host = SignalDialogHost::new(toasts, prompt);
            let mut seen = SEEN.lock().unwrap();

            host.notify(Notice::PlaylistCreated {
                name: "Mix".to_string(),
            });
            seen.push(format!("toasts={}", host.toasts().len()));

            host.prompt_duplicates(DuplicatePrompt {
                playlist: PlaylistSummary {
                    id: PlaylistId::new(1),
                    name: "Mix".to_string(),
                    thumbnail_url: PLACEHOLDER_THUMBNAIL.to_string(),
                    stream_count: 1,
                },
                duplicates: 1,
            });
            seen.push(format!("prompt={}", host.prompt().is_some()));

            host.dismiss_prompt();
            seen.push(format!("prompt={}", host.prompt().is_some()));

            let id = host.toasts()[0].id;
            host.dismiss_toast(id);
            seen.push(format!("toasts={}", host.toasts().len()));
        });
        rsx! {}
    }

    #[test]
    fn host_tracks_toasts_and_prompt() {
        let mut dom = VirtualDom::new(HostHarness);
        dom.rebuild_in_place();

        assert_eq!(
            *SEEN.lock().unwrap(),
            vec!["toasts=1", "prompt=true", "prompt=false", "toasts=0"]
        );
    }
}
