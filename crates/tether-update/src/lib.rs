//! Structural-sharing updates over the Tether state tree.
//!
//! Nothing in this crate mutates a [`StateValue`](tether_types::StateValue)
//! that someone else can observe. Every operation returns a new tree that
//! shares all untouched branches with its input, and a write that changes
//! nothing returns the input itself, so identity comparison
//! ([`StateValue::same`](tether_types::StateValue::same)) doubles as change
//! detection.
//!
//! # Key Items
//!
//! - [`read`] / [`write`] / [`remove`] -- Path accessor over nested mappings
//! - [`Draft`] / [`DraftMut`] -- Copy-on-write staging view of a state tree
//! - [`produce`] / [`finalize`] -- The immutable updater
//! - [`StateTransform`] -- Shareable recipe carried by sync actions

pub mod access;
pub mod draft;
pub mod produce;
pub mod transform;

pub use access::{read, remove, write};
pub use draft::{Draft, DraftMut};
pub use produce::{finalize, produce};
pub use transform::StateTransform;
