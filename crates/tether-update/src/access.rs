//! Path accessor: read and write at a dotted path.
//!
//! Reads never fail; a missing key or a non-mapping node on the way yields
//! `None`. Writes never mutate their input. Missing or non-mapping levels on
//! the way to the target are replaced by fresh mappings, so only the branch
//! named by the path is affected.

use tether_types::{SlicePath, StateMap, StateValue};

/// Resolve `path` inside `container`.
pub fn read<'a>(container: &'a StateValue, path: &SlicePath) -> Option<&'a StateValue> {
    path.segments()
        .iter()
        .try_fold(container, |node, segment| node.get(segment))
}

/// Return a copy of `container` with `value` stored at `path`.
///
/// If the location already holds a structurally equal value the input is
/// returned as-is, so the result is [`same`](StateValue::same) as `container`.
/// Otherwise the result shares every branch off the path with `container`.
pub fn write(container: &StateValue, path: &SlicePath, value: StateValue) -> StateValue {
    if read(container, path).is_some_and(|current| *current == value) {
        return container.clone();
    }
    write_at(container, path.segments(), value)
}

/// Return a copy of `container` without the key at `path`.
///
/// Absent paths return the input unchanged.
pub fn remove(container: &StateValue, path: &SlicePath) -> StateValue {
    if read(container, path).is_none() {
        return container.clone();
    }
    remove_at(container, path.segments())
}

fn write_at(node: &StateValue, segments: &[String], value: StateValue) -> StateValue {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };
    let mut map = node.as_object().cloned().unwrap_or_default();
    let child = map.get(head).cloned().unwrap_or_default();
    map.insert(head.clone(), write_at(&child, rest, value));
    StateValue::object(map)
}

fn remove_at(node: &StateValue, segments: &[String]) -> StateValue {
    let Some(map) = node.as_object() else {
        return node.clone();
    };
    let mut map: StateMap = map.clone();
    match segments {
        [] => return node.clone(),
        [leaf] => {
            map.remove(leaf);
        }
        [head, rest @ ..] => {
            if let Some(child) = map.get(head) {
                let next = remove_at(child, rest);
                map.insert(head.clone(), next);
            }
        }
    }
    StateValue::object(map)
}
