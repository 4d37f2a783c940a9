//! The two shapes a binding can hold.

use tether_types::StateValue;

use crate::collection::{members_from_state, Collection, WeakCollection};
use crate::error::{ModelError, ModelResult};
use crate::events::{ListenerId, ModelEvent};
use crate::record::{Record, WeakRecord};

/// A record or a collection, handled uniformly where only the shape differs.
#[derive(Clone, Debug)]
pub enum DomainObject {
    Record(Record),
    Collection(Collection),
}

/// Non-owning handle to a [`DomainObject`].
#[derive(Clone)]
pub enum WeakDomainObject {
    Record(WeakRecord),
    Collection(WeakCollection),
}

impl WeakDomainObject {
    pub fn upgrade(&self) -> Option<DomainObject> {
        match self {
            WeakDomainObject::Record(record) => record.upgrade().map(DomainObject::Record),
            WeakDomainObject::Collection(collection) => {
                collection.upgrade().map(DomainObject::Collection)
            }
        }
    }
}

impl DomainObject {
    pub fn is_collection(&self) -> bool {
        matches!(self, DomainObject::Collection(_))
    }

    /// Current value as plain data: an object for a record, an array of
    /// objects for a collection.
    pub fn serialize(&self) -> StateValue {
        match self {
            DomainObject::Record(record) => record.to_state(),
            DomainObject::Collection(collection) => collection.to_state(),
        }
    }

    pub fn get_field(&self, field: &str) -> ModelResult<Option<StateValue>> {
        Ok(self.record(field)?.get(field))
    }

    /// Returns `true` if the field changed.
    pub fn set_field(&self, field: &str, value: StateValue) -> ModelResult<bool> {
        Ok(self.record(field)?.set(field, value))
    }

    /// Returns `true` if the field was present.
    pub fn unset_field(&self, field: &str) -> ModelResult<bool> {
        Ok(self.record(field)?.unset(field))
    }

    /// Replace the whole value.
    ///
    /// A record takes an object and drops fields it does not contain. A
    /// collection is reset: from an array of objects, from a single object
    /// (one member), or from `Null` (no members).
    pub fn replace_all(&self, value: &StateValue) -> ModelResult<()> {
        match self {
            DomainObject::Record(record) => {
                let attributes = value.as_object().ok_or(ModelError::NotAnObject {
                    found: value.kind(),
                })?;
                record.replace_attributes(attributes.clone());
            }
            DomainObject::Collection(collection) => {
                let items = match value {
                    StateValue::Null => Vec::new(),
                    StateValue::Object(attributes) => vec![(**attributes).clone()],
                    other => members_from_state(other)?,
                };
                collection.reset(items);
            }
        }
        Ok(())
    }

    /// Listen for any change. On a collection this covers member field
    /// changes, membership updates and resets.
    pub fn on_any_change<F: Fn() + 'static>(&self, listener: F) -> ListenerId {
        match self {
            DomainObject::Record(record) => record.on(ModelEvent::Change, listener),
            DomainObject::Collection(collection) => collection.on_any(
                [ModelEvent::Change, ModelEvent::Update, ModelEvent::Reset],
                listener,
            ),
        }
    }

    pub fn on_field_change<F: Fn() + 'static>(
        &self,
        field: &str,
        listener: F,
    ) -> ModelResult<ListenerId> {
        Ok(self
            .record(field)?
            .on(ModelEvent::change_field(field), listener))
    }

    pub fn off(&self, id: ListenerId) -> bool {
        match self {
            DomainObject::Record(record) => record.off(id),
            DomainObject::Collection(collection) => collection.off(id),
        }
    }

    pub fn downgrade(&self) -> WeakDomainObject {
        match self {
            DomainObject::Record(record) => WeakDomainObject::Record(record.downgrade()),
            DomainObject::Collection(collection) => {
                WeakDomainObject::Collection(collection.downgrade())
            }
        }
    }

    fn record(&self, field: &str) -> ModelResult<&Record> {
        match self {
            DomainObject::Record(record) => Ok(record),
            DomainObject::Collection(_) => Err(ModelError::FieldOnCollection {
                field: field.to_string(),
            }),
        }
    }
}

impl From<Record> for DomainObject {
    fn from(record: Record) -> Self {
        DomainObject::Record(record)
    }
}

impl From<Collection> for DomainObject {
    fn from(collection: Collection) -> Self {
        DomainObject::Collection(collection)
    }
}

impl From<&Record> for DomainObject {
    fn from(record: &Record) -> Self {
        DomainObject::Record(record.clone())
    }
}

impl From<&Collection> for DomainObject {
    fn from(collection: &Collection) -> Self {
        DomainObject::Collection(collection.clone())
    }
}
