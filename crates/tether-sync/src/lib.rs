//! Bidirectional synchronization between domain objects and store slices.
//!
//! [`bind`] ties one [`Record`](tether_model::Record) or
//! [`Collection`](tether_model::Collection) to a dotted path inside a
//! [`Store`](tether_store::Store). Model changes are pushed into the store
//! through the sync dispatch channel; store changes at the path are pulled
//! back into the model. The store's reducer must be wrapped with
//! [`wrap_reducer`] first.
//!
//! # Key Items
//!
//! - [`bind`] / [`bind_path`] / [`bind_with_config`] -- Install a binding
//! - [`Binding`] -- Description of a live binding plus its release handles
//! - [`Disposer`] -- Idempotent release of one listener registration
//! - [`BindConfig`] -- Declarative, serde-loadable binding description
//! - [`BindError`] -- Rejections raised before anything is dispatched
//!
//! # Example
//!
//! ```
//! use tether_model::Record;
//! use tether_store::{Action, Store};
//! use tether_sync::{bind, wrap_reducer};
//! use tether_types::StateValue;
//!
//! let store = Store::with_state(
//!     wrap_reducer(|state: &StateValue, _: &Action| state.clone()),
//!     StateValue::empty_object(),
//! );
//! let song = Record::from_state(&StateValue::from(serde_json::json!({"id": 10, "listeners": 81}))).unwrap();
//!
//! let binding = bind(&store, "song", &song, None).unwrap();
//! song.set("listeners", 82);
//! assert_eq!(store.state(), serde_json::json!({"song": {"id": 10, "listeners": 82}}));
//! binding.dispose();
//! ```

pub mod binding;
pub mod bridge;
pub mod config;
pub mod disposer;
pub mod error;

#[cfg(test)]
mod scenarios;

pub use binding::Binding;
pub use bridge::{bind, bind_path, bind_with_config};
pub use config::BindConfig;
pub use disposer::Disposer;
pub use error::{BindError, BindResult};
pub use tether_store::wrap_reducer;
