//! The state store.
//!
//! [`Store`] is a cheap, cloneable handle over single-threaded shared state.
//! Dispatch is fully synchronous: the reducer runs, the new state is
//! installed, then every subscriber registered at the start of the
//! notification round is called in subscription order before `dispatch`
//! returns. Subscribers may dispatch again; reducers may not.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tether_types::{SlicePath, StateValue};
use tether_update::read;
use tracing::{debug, trace};

use crate::action::Action;
use crate::reducer::Reducer;

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn()>;

struct StoreInner {
    state: RefCell<StateValue>,
    reducer: RefCell<Rc<dyn Reducer>>,
    subscribers: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
    dispatching: Cell<bool>,
    dispatch_count: Cell<u64>,
}

/// Single-threaded store holding one immutable state tree.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

/// Non-owning handle to a [`Store`].
#[derive(Clone)]
pub struct WeakStore {
    inner: Weak<StoreInner>,
}

/// Clears the dispatching flag even when the reducer unwinds.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Store {
    /// Create a store starting from `Null` and dispatch the init action so
    /// the reducer can supply its initial state.
    pub fn new<R: Reducer + 'static>(reducer: R) -> Self {
        Self::with_state(reducer, StateValue::Null)
    }

    /// Create a store starting from `preloaded` and dispatch the init action.
    pub fn with_state<R: Reducer + 'static>(reducer: R, preloaded: StateValue) -> Self {
        let store = Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(preloaded),
                reducer: RefCell::new(Rc::new(reducer)),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                dispatching: Cell::new(false),
                dispatch_count: Cell::new(0),
            }),
        };
        store.dispatch(Action::init());
        debug!(state = %store.state(), "store created");
        store
    }

    /// Snapshot of the current state. O(1).
    pub fn state(&self) -> StateValue {
        self.inner.state.borrow().clone()
    }

    /// The value at `path` in the current state, if present.
    pub fn select(&self, path: &SlicePath) -> Option<StateValue> {
        read(&self.inner.state.borrow(), path).cloned()
    }

    /// Run `action` through the reducer, install the result, and notify
    /// subscribers.
    ///
    /// # Panics
    ///
    /// Panics when called from inside a reducer.
    pub fn dispatch(&self, action: Action) {
        assert!(
            !self.inner.dispatching.get(),
            "reducers may not dispatch actions (attempted '{}')",
            action.kind()
        );

        let reducer = Rc::clone(&self.inner.reducer.borrow());
        let current = self.state();
        let next = {
            self.inner.dispatching.set(true);
            let _guard = DispatchGuard(&self.inner.dispatching);
            reducer.reduce(&current, &action)
        };
        let changed = !next.same(&current);
        *self.inner.state.borrow_mut() = next;
        self.inner
            .dispatch_count
            .set(self.inner.dispatch_count.get() + 1);

        let listeners: Vec<Listener> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        trace!(
            action = action.kind(),
            changed,
            subscribers = listeners.len(),
            "dispatched"
        );
        for listener in listeners {
            listener();
        }
    }

    /// Register `listener` to run after every dispatch.
    ///
    /// A listener added while a notification round is running is first
    /// called on the next dispatch.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    ///
    /// A listener removed while a notification round is running is still
    /// called in that round.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Number of dispatches processed, including init actions.
    pub fn dispatch_count(&self) -> u64 {
        self.inner.dispatch_count.get()
    }

    /// Swap the reducer and dispatch the init action through the new one.
    pub fn replace_reducer<R: Reducer + 'static>(&self, reducer: R) {
        *self.inner.reducer.borrow_mut() = Rc::new(reducer);
        self.dispatch(Action::init());
    }

    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl WeakStore {
    /// The store, if any strong handle to it is still alive.
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("subscribers", &self.subscriber_count())
            .field("dispatch_count", &self.dispatch_count())
            .finish()
    }
}

impl fmt::Debug for WeakStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
