//! The immutable updater.
//!
//! [`produce`] hands a recipe a [`Draft`] of the base tree, lets it edit in
//! place, then [`finalize`]s the result against the base: every branch that
//! ended up structurally equal to the base branch at the same position is
//! swapped back for the base branch itself. The outcome is referentially
//! unequal to the base exactly along the paths that changed.

use std::mem;
use std::sync::Arc;

use tether_types::StateValue;

use crate::draft::Draft;

/// Apply `recipe` to a draft of `base` and return the next immutable tree.
///
/// A recipe that changes nothing (or only writes values equal to the ones
/// already present) yields a tree that is [`same`](StateValue::same) as
/// `base`.
pub fn produce<F>(base: &StateValue, recipe: F) -> StateValue
where
    F: FnOnce(&mut Draft),
{
    let mut draft = Draft::new(base.clone());
    recipe(&mut draft);
    finalize(base, draft.into_inner())
}

/// Restore identity with `base` for every branch of `next` equal to it.
///
/// Branches of `next` that are already the same allocation as the base
/// branch are returned immediately, so the cost is bounded by the part of
/// `next` that was actually rebuilt.
pub fn finalize(base: &StateValue, next: StateValue) -> StateValue {
    if base.same(&next) {
        return base.clone();
    }
    match (base, next) {
        (StateValue::Array(old), StateValue::Array(new)) => {
            let mut items = Arc::unwrap_or_clone(new);
            let mut unchanged = old.len() == items.len();
            for (index, item) in items.iter_mut().enumerate() {
                match old.get(index) {
                    Some(prev) => {
                        let settled = finalize(prev, mem::take(item));
                        unchanged &= settled.same(prev);
                        *item = settled;
                    }
                    None => unchanged = false,
                }
            }
            if unchanged {
                base.clone()
            } else {
                StateValue::array(items)
            }
        }
        (StateValue::Object(old), StateValue::Object(new)) => {
            let mut map = Arc::unwrap_or_clone(new);
            let mut unchanged = old.len() == map.len();
            for (key, value) in map.iter_mut() {
                match old.get(key) {
                    Some(prev) => {
                        let settled = finalize(prev, mem::take(value));
                        unchanged &= settled.same(prev);
                        *value = settled;
                    }
                    None => unchanged = false,
                }
            }
            if unchanged {
                base.clone()
            } else {
                StateValue::object(map)
            }
        }
        (_, next) => next,
    }
}
