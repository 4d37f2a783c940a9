//! Observable domain objects for Tether.
//!
//! Domain objects are mutable, identity-bearing counterparts to the
//! immutable state tree. They announce every effective change through
//! synchronous events so that other parts of the application can react.
//!
//! # Key Types
//!
//! - [`Record`] -- Mapping of named fields with a stable identifier field
//! - [`Collection`] -- Ordered set of records with unique identifiers
//! - [`DomainObject`] -- Either of the above, as seen by a binding
//! - [`Events`] / [`ModelEvent`] -- Ordered, re-entrant listener registry
//! - [`ModelConfig`] -- Identifier field configuration
//!
//! # Event Rules
//!
//! 1. Writing a value equal to the current one fires nothing.
//! 2. A record write fires one `ChangeField` per changed field, then one `Change`.
//! 3. Member `Change` and `ChangeField` events bubble to every collection
//!    holding the member.
//! 4. Collection membership changes fire `Add`/`Remove` per member and a
//!    single `Update`; a reset fires a single `Reset`.
//! 5. Listeners run after the mutation is complete and outside any internal
//!    borrow, so they may read or mutate the object again.

pub mod collection;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod record;

pub use collection::{Collection, WeakCollection};
pub use config::ModelConfig;
pub use domain::{DomainObject, WeakDomainObject};
pub use error::{ModelError, ModelResult};
pub use events::{Events, ListenerId, ModelEvent};
pub use record::{Record, WeakRecord};
