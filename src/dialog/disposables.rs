use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;

/// Registry of background tasks owned by a dialog.
///
/// Everything registered is aborted by [`Disposables::dispose`] and when the
/// registry is dropped. After `dispose` new work is aborted on arrival.
#[derive(Debug, Default)]
pub struct Disposables {
    inner: Mutex<Registry>,
}

#[derive(Debug, Default)]
struct Registry {
    handles: Vec<AbortHandle>,
    disposed: bool,
}

impl Disposables {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self, handle: AbortHandle) {
        let mut registry = self.registry();
        if registry.disposed {
            handle.abort();
            return;
        }
        registry.handles.push(handle);
    }

    /// Spawn `task` on the current tokio runtime and track it.
    ///
    /// Returns `false` when no runtime is available or the registry is
    /// already disposed.
    pub fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_disposed() {
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!("no tokio runtime available to run dialog task");
            return false;
        };
        let handle = runtime.spawn(task);
        self.add(handle.abort_handle());
        true
    }

    /// Abort everything tracked so far; the registry stays usable.
    #[cfg(test)]
    fn clear(&self) {
        let handles = std::mem::take(&mut self.registry().handles);
        for handle in handles {
            handle.abort();
        }
    }

    pub fn dispose(&self) {
        let handles = {
            let mut registry = self.registry();
            registry.disposed = true;
            std::mem::take(&mut registry.handles)
        };
        for handle in handles {
            handle.abort();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.registry().disposed
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.registry().handles.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for Disposables {
    fn drop(&mut self) {
        let registry = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        for handle in registry.handles.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn dispose_aborts_tracked_tasks() {
        let disposables = Disposables::default();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<()>();
        assert!(disposables.spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = tx.send(());
        }));
        assert_eq!(disposables.len(), 1);

        disposables.dispose();

        assert!(disposables.is_empty());
        // The sender is dropped with the aborted task, closing the channel.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn work_added_after_dispose_is_rejected() {
        let disposables = Disposables::default();
        disposables.dispose();

        assert!(!disposables.spawn(async {}));
        assert!(disposables.is_disposed());
        assert!(disposables.is_empty());
    }

    #[tokio::test]
    async fn clear_keeps_registry_open() {
        let disposables = Disposables::default();
        assert!(disposables.spawn(std::future::pending::<()>()));
        disposables.clear();
        assert!(disposables.is_empty());
        assert!(disposables.spawn(std::future::pending::<()>()));
        assert_eq!(disposables.len(), 1);
    }
}
