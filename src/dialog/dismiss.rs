use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Callback run once when a dialog goes away.
///
/// Owned by exactly one dialog at a time and moved by value when a dialog
/// hands over to a successor.
pub struct DismissHandle(Box<dyn FnOnce() + Send + 'static>);

impl DismissHandle {
    pub fn new(on_dismiss: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(on_dismiss))
    }

    pub fn fire(self) {
        (self.0)()
    }
}

impl fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DismissHandle")
    }
}

/// Single-slot holder for a [`DismissHandle`].
#[derive(Default, Debug)]
pub struct DismissSlot(Mutex<Option<DismissHandle>>);

impl DismissSlot {
    /// Store `handle`, returning the one it replaced.
    pub fn set(&self, handle: DismissHandle) -> Option<DismissHandle> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle)
    }

    pub fn take(&self) -> Option<DismissHandle> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn is_set(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Take and run the stored callback, if any.
    pub fn fire(&self) -> bool {
        // Released before the callback runs so it may touch this slot.
        let handle = self.take();
        match handle {
            Some(handle) => {
                handle.fire();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn fires_at_most_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let slot = DismissSlot::default();
        let counter = Arc::clone(&fired);
        slot.set(DismissHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(slot.fire());
        assert!(!slot.fire());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn moving_a_handle_empties_the_source_slot() {
        let fired = Arc::new(AtomicUsize::new(0));
        let first = DismissSlot::default();
        let second = DismissSlot::default();
        let counter = Arc::clone(&fired);
        first.set(DismissHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        if let Some(handle) = first.take() {
            second.set(handle);
        }

        assert!(!first.is_set());
        assert!(!first.fire());
        assert!(second.fire());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
