//! Live bindings and their per-binding state.

use std::cell::RefCell;

use tether_types::{SlicePath, StateValue};

use crate::disposer::Disposer;

/// Handle to an installed binding.
///
/// Holds the two independent release handles returned by
/// [`bind`](crate::bind). Dropping a `Binding` does not remove its
/// listeners; call [`Binding::dispose`] or the individual disposers.
#[derive(Debug)]
pub struct Binding {
    path: SlicePath,
    model_attribute: Option<String>,
    model: Disposer,
    store: Disposer,
}

impl Binding {
    pub(crate) fn new(
        path: SlicePath,
        model_attribute: Option<String>,
        model: Disposer,
        store: Disposer,
    ) -> Self {
        Self {
            path,
            model_attribute,
            model,
            store,
        }
    }

    pub fn path(&self) -> &SlicePath {
        &self.path
    }

    pub fn model_attribute(&self) -> Option<&str> {
        self.model_attribute.as_deref()
    }

    /// Releases the listener that pushes model changes into the store.
    pub fn model_disposer(&self) -> &Disposer {
        &self.model
    }

    /// Releases the store subscription that pulls slice changes into the model.
    pub fn store_disposer(&self) -> &Disposer {
        &self.store
    }

    /// Split into `(model disposer, store disposer)`.
    pub fn into_disposers(self) -> (Disposer, Disposer) {
        (self.model, self.store)
    }

    /// Release both listeners.
    pub fn dispose(&self) {
        self.model.dispose();
        self.store.dispose();
    }
}

/// The slice value a binding saw at the previous store notification.
#[derive(Debug, Default)]
pub(crate) struct LastSeen {
    slice: RefCell<Option<StateValue>>,
}

impl LastSeen {
    pub(crate) fn new(slice: Option<StateValue>) -> Self {
        Self {
            slice: RefCell::new(slice),
        }
    }

    /// Record `slice` and report whether it is a different value from the
    /// one recorded before. Identity comparison only.
    pub(crate) fn advance(&self, slice: Option<&StateValue>) -> bool {
        let mut seen = self.slice.borrow_mut();
        if StateValue::same_opt(seen.as_ref(), slice) {
            return false;
        }
        *seen = slice.cloned();
        true
    }
}
