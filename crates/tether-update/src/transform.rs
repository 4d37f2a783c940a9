use std::fmt;
use std::rc::Rc;

use tether_types::{SlicePath, StateValue};
use tracing::trace;

use crate::draft::{Draft, DraftMut};
use crate::produce::produce;

/// A shareable draft recipe: the payload of a sync action.
///
/// The recipe receives a draft of the whole state. It may edit anywhere,
/// but the transforms built by [`StateTransform::set`] confine themselves to
/// a single path.
#[derive(Clone)]
pub struct StateTransform {
    label: String,
    recipe: Rc<dyn Fn(&mut Draft)>,
}

impl StateTransform {
    pub fn new<F>(label: impl Into<String>, recipe: F) -> Self
    where
        F: Fn(&mut Draft) + 'static,
    {
        Self {
            label: label.into(),
            recipe: Rc::new(recipe),
        }
    }

    /// A transform that stores `value` at `path`.
    pub fn set(path: SlicePath, value: StateValue) -> Self {
        Self::new(format!("set {path}"), move |draft| {
            draft.set_in(&path, value.clone());
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the recipe against an existing draft.
    pub fn apply_to(&self, draft: &mut Draft) {
        (self.recipe)(draft);
    }

    /// Produce the state that results from running the recipe on `state`.
    pub fn apply(&self, state: &StateValue) -> StateValue {
        let next = produce(state, |draft| self.apply_to(draft));
        if next.same(state) {
            trace!(transform = %self.label, "transform left state unchanged");
        }
        next
    }
}

impl fmt::Debug for StateTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTransform")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
