//! Reducers and the sync dispatch channel.

use tether_types::StateValue;
use tracing::{trace, warn};

use crate::action::Action;

/// Pure function from `(state, action)` to the next state.
///
/// Any `Fn(&StateValue, &Action) -> StateValue` closure is a reducer.
pub trait Reducer {
    fn reduce(&self, state: &StateValue, action: &Action) -> StateValue;
}

impl<F> Reducer for F
where
    F: Fn(&StateValue, &Action) -> StateValue,
{
    fn reduce(&self, state: &StateValue, action: &Action) -> StateValue {
        self(state, action)
    }
}

/// An application reducer extended with the sync dispatch channel.
///
/// Created by [`wrap_reducer`].
#[derive(Clone, Debug)]
pub struct SyncReducer<R> {
    inner: R,
}

impl<R> SyncReducer<R> {
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reducer> Reducer for SyncReducer<R> {
    fn reduce(&self, state: &StateValue, action: &Action) -> StateValue {
        if action.is_sync() {
            match action.transform() {
                Some(transform) => {
                    trace!(transform = transform.label(), "applying sync transform");
                    return transform.apply(state);
                }
                None => warn!(
                    action = action.kind(),
                    "sync action without a transform payload, passing it to the application reducer"
                ),
            }
        }
        self.inner.reduce(state, action)
    }
}

/// Wrap `reducer` so it applies sync transforms.
///
/// Must wrap the reducer a store is created with before anything binds to
/// that store.
pub fn wrap_reducer<R: Reducer>(reducer: R) -> SyncReducer<R> {
    SyncReducer { inner: reducer }
}
