//! Centrally-dispatched state store for Tether.
//!
//! A [`Store`] holds one immutable [`StateValue`](tether_types::StateValue).
//! The only way to change it is to dispatch an [`Action`] through the
//! store's [`Reducer`]. Subscribers run synchronously after every dispatch,
//! in subscription order.
//!
//! # Dispatch Channel
//!
//! [`wrap_reducer`] wraps an application reducer so that actions tagged
//! [`SYNC_ACTION_TYPE`] apply their [`StateTransform`](tether_update::StateTransform)
//! payload through the immutable updater instead of reaching the
//! application reducer. Every other action passes through untouched.
//!
//! The sync tag is reserved: application code must never dispatch its own
//! action under that type. This is a caller contract and is not checked.

pub mod action;
pub mod reducer;
pub mod store;

pub use action::{Action, Payload, INIT_ACTION_TYPE, SYNC_ACTION_TYPE};
pub use reducer::{wrap_reducer, Reducer, SyncReducer};
pub use store::{Store, SubscriptionId, WeakStore};
