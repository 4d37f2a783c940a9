//! Copy-on-write drafts.
//!
//! A [`Draft`] starts as a cheap clone of a base tree. Mutable access goes
//! through `Arc::make_mut`, so the first write to a node copies that node
//! (and only that node) while its children stay shared with the base. The
//! base itself is never modified.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tether_types::{SlicePath, StateMap, StateValue};

/// Mutable staging view of an immutable state tree.
#[derive(Clone, Debug, Default)]
pub struct Draft {
    root: StateValue,
}

impl Draft {
    pub fn new(base: StateValue) -> Self {
        Self { root: base }
    }

    /// Replace the whole drafted tree.
    pub fn replace(&mut self, value: StateValue) {
        self.root = value;
    }

    pub fn into_inner(self) -> StateValue {
        self.root
    }
}

impl Deref for Draft {
    type Target = StateValue;

    fn deref(&self) -> &StateValue {
        &self.root
    }
}

impl DerefMut for Draft {
    fn deref_mut(&mut self) -> &mut StateValue {
        &mut self.root
    }
}

/// Copy-on-write mutable access to [`StateValue`] nodes.
pub trait DraftMut {
    /// Mutable access to an object node, turning any other node into an
    /// empty object first.
    fn make_object(&mut self) -> &mut StateMap;

    fn object_mut(&mut self) -> Option<&mut StateMap>;

    fn array_mut(&mut self) -> Option<&mut Vec<StateValue>>;

    /// Mutable access to the value under `key` of an object node.
    fn get_mut(&mut self, key: &str) -> Option<&mut StateValue>;

    /// Mutable access to element `index` of an array node.
    fn at_mut(&mut self, index: usize) -> Option<&mut StateValue>;

    /// Mutable access to the node at `path`, if every level exists.
    fn get_in_mut(&mut self, path: &SlicePath) -> Option<&mut StateValue>;

    /// Store `value` at `path`, creating mapping levels as needed.
    fn set_in(&mut self, path: &SlicePath, value: StateValue);

    /// Remove the key at `path`, returning the previous value.
    fn remove_in(&mut self, path: &SlicePath) -> Option<StateValue>;
}

impl DraftMut for StateValue {
    fn make_object(&mut self) -> &mut StateMap {
        if !self.is_object() {
            *self = StateValue::empty_object();
        }
        match self {
            StateValue::Object(map) => Arc::make_mut(map),
            _ => unreachable!("node was just replaced by an object"),
        }
    }

    fn object_mut(&mut self) -> Option<&mut StateMap> {
        match self {
            StateValue::Object(map) => Some(Arc::make_mut(map)),
            _ => None,
        }
    }

    fn array_mut(&mut self) -> Option<&mut Vec<StateValue>> {
        match self {
            StateValue::Array(items) => Some(Arc::make_mut(items)),
            _ => None,
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut StateValue> {
        if !self.as_object().is_some_and(|map| map.contains_key(key)) {
            return None;
        }
        self.object_mut().and_then(|map| map.get_mut(key))
    }

    fn at_mut(&mut self, index: usize) -> Option<&mut StateValue> {
        if self.as_array().map_or(true, |items| index >= items.len()) {
            return None;
        }
        self.array_mut().and_then(|items| items.get_mut(index))
    }

    fn get_in_mut(&mut self, path: &SlicePath) -> Option<&mut StateValue> {
        let mut node = self;
        for segment in path.segments() {
            node = node.get_mut(segment)?;
        }
        Some(node)
    }

    fn set_in(&mut self, path: &SlicePath, value: StateValue) {
        let mut node = self;
        for segment in path.segments() {
            node = node
                .make_object()
                .entry(segment.clone())
                .or_insert(StateValue::Null);
        }
        *node = value;
    }

    fn remove_in(&mut self, path: &SlicePath) -> Option<StateValue> {
        let (leaf, parent) = match path.parent() {
            Some(parent) => (path.leaf(), self.get_in_mut(&parent)?),
            None => (path.leaf(), self),
        };
        if !parent.as_object().is_some_and(|map| map.contains_key(leaf)) {
            return None;
        }
        parent.object_mut().and_then(|map| map.remove(leaf))
    }
}
