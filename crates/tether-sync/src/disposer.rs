//! Release handles for binding listeners.

use std::cell::Cell;
use std::fmt;

/// Releases one listener registration.
///
/// Disposing is idempotent: the release runs on the first call to
/// [`Disposer::dispose`] and later calls do nothing. Dropping a `Disposer`
/// without disposing it leaves the listener installed.
pub struct Disposer {
    label: &'static str,
    release: Cell<Option<Box<dyn FnOnce()>>>,
}

impl Disposer {
    pub(crate) fn new<F>(label: &'static str, release: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            label,
            release: Cell::new(Some(Box::new(release))),
        }
    }

    /// Remove the listener. Returns `false` if it was already removed.
    pub fn dispose(&self) -> bool {
        match self.release.take() {
            Some(release) => {
                release();
                true
            }
            None => false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        let release = self.release.take();
        let disposed = release.is_none();
        self.release.set(release);
        disposed
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("listener", &self.label)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
