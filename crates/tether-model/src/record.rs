//! Observable records.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tether_types::{StateMap, StateValue};

use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use crate::events::{Events, ListenerId, ModelEvent};

struct RecordInner {
    attributes: RefCell<StateMap>,
    config: ModelConfig,
    events: Events,
}

/// A mapping of named fields with a stable identifier field.
///
/// `Record` is a shared handle: clones refer to the same record and
/// [`Record::ptr_eq`] tells whether two handles do.
#[derive(Clone)]
pub struct Record {
    inner: Rc<RecordInner>,
}

/// Non-owning handle to a [`Record`].
#[derive(Clone)]
pub struct WeakRecord {
    inner: Weak<RecordInner>,
}

impl WeakRecord {
    pub fn upgrade(&self) -> Option<Record> {
        self.inner.upgrade().map(|inner| Record { inner })
    }
}

impl Record {
    pub fn new(attributes: StateMap) -> Self {
        Self::with_config(attributes, ModelConfig::default())
    }

    pub fn with_config(attributes: StateMap, config: ModelConfig) -> Self {
        Self {
            inner: Rc::new(RecordInner {
                attributes: RefCell::new(attributes),
                config,
                events: Events::new(),
            }),
        }
    }

    /// Build a record from an object value.
    pub fn from_state(value: &StateValue) -> ModelResult<Self> {
        Self::from_state_with_config(value, ModelConfig::default())
    }

    pub fn from_state_with_config(value: &StateValue, config: ModelConfig) -> ModelResult<Self> {
        let attributes = value.as_object().ok_or(ModelError::NotAnObject {
            found: value.kind(),
        })?;
        Ok(Self::with_config(attributes.clone(), config))
    }

    pub fn config(&self) -> &ModelConfig {
        &self.inner.config
    }

    /// The identifier, when present and not null.
    pub fn id(&self) -> Option<StateValue> {
        self.get(&self.inner.config.id_attribute)
            .filter(|id| !id.is_null())
    }

    pub fn get(&self, field: &str) -> Option<StateValue> {
        self.inner.attributes.borrow().get(field).cloned()
    }

    /// `true` when the field is present and not null.
    pub fn has(&self, field: &str) -> bool {
        self.inner
            .attributes
            .borrow()
            .get(field)
            .is_some_and(|value| !value.is_null())
    }

    pub fn attributes(&self) -> StateMap {
        self.inner.attributes.borrow().clone()
    }

    /// Plain-data snapshot of the record.
    pub fn to_state(&self) -> StateValue {
        StateValue::object(self.attributes())
    }

    /// Set one field. Returns `true` if the value changed.
    pub fn set(&self, field: &str, value: impl Into<StateValue>) -> bool {
        let mut changes = StateMap::new();
        changes.insert(field.to_string(), value.into());
        self.set_attributes(changes)
    }

    /// Merge `changes` into the record. Returns `true` if anything changed.
    pub fn set_attributes(&self, changes: StateMap) -> bool {
        let changed: Vec<String> = {
            let mut attributes = self.inner.attributes.borrow_mut();
            changes
                .into_iter()
                .filter_map(|(field, value)| {
                    if attributes.get(&field) == Some(&value) {
                        return None;
                    }
                    attributes.insert(field.clone(), value);
                    Some(field)
                })
                .collect()
        };
        self.announce(changed)
    }

    /// Make the record hold exactly `attributes`: fields missing from it are
    /// removed. Returns `true` if anything changed.
    pub fn replace_attributes(&self, attributes: StateMap) -> bool {
        let changed: Vec<String> = {
            let mut current = self.inner.attributes.borrow_mut();
            let mut changed: Vec<String> = current
                .keys()
                .filter(|field| !attributes.contains_key(*field))
                .cloned()
                .collect();
            for field in &changed {
                current.remove(field);
            }
            for (field, value) in attributes {
                if current.get(&field) != Some(&value) {
                    current.insert(field.clone(), value);
                    changed.push(field);
                }
            }
            changed
        };
        self.announce(changed)
    }

    /// Remove a field. Returns `true` if it was present.
    pub fn unset(&self, field: &str) -> bool {
        let removed = self.inner.attributes.borrow_mut().remove(field).is_some();
        if removed {
            self.announce(vec![field.to_string()]);
        }
        removed
    }

    pub fn on<F: Fn() + 'static>(&self, event: ModelEvent, listener: F) -> ListenerId {
        self.inner.events.on(event, listener)
    }

    pub fn on_any<I, F>(&self, events: I, listener: F) -> ListenerId
    where
        I: IntoIterator<Item = ModelEvent>,
        F: Fn() + 'static,
    {
        self.inner.events.on_any(events, listener)
    }

    pub fn on_all<F: Fn(&ModelEvent) + 'static>(&self, listener: F) -> ListenerId {
        self.inner.events.on_all(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.events.off(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.events.listener_count()
    }

    /// `true` if both handles refer to the same record.
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakRecord {
        WeakRecord {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn announce(&self, changed: Vec<String>) -> bool {
        if changed.is_empty() {
            return false;
        }
        for field in changed {
            self.inner.events.trigger(&ModelEvent::ChangeField(field));
        }
        self.inner.events.trigger(&ModelEvent::Change);
        true
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("attributes", &self.to_state())
            .finish()
    }
}
