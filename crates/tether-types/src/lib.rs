//! Foundation types for Tether.
//!
//! This crate provides the value and addressing types shared by every other
//! Tether crate: the persistent state tree held by the store and the dotted
//! paths that name a slice of it.
//!
//! # Key Types
//!
//! - [`StateValue`] -- Immutable JSON-like tree with `Arc`-shared containers
//! - [`StateMap`] -- Ordered mapping used for objects and record attributes
//! - [`SlicePath`] -- Validated dotted path of literal mapping keys
//! - [`PathError`] -- Rejection reasons for malformed paths

pub mod error;
pub mod path;
pub mod value;

pub use error::{PathError, PathResult};
pub use path::SlicePath;
pub use value::{StateMap, StateValue, ValueKind};
