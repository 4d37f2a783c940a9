//! Ordered collections of records.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};

use tether_types::{StateMap, StateValue};
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use crate::events::{Events, ListenerId, ModelEvent};
use crate::record::Record;

/// A member record and the listener forwarding its changes.
struct Member {
    record: Record,
    forward: ListenerId,
}

struct CollectionInner {
    members: RefCell<Vec<Member>>,
    config: ModelConfig,
    events: Events,
}

impl Drop for CollectionInner {
    fn drop(&mut self) {
        for member in self.members.get_mut().drain(..) {
            member.record.off(member.forward);
        }
    }
}

/// An ordered sequence of records with unique identifiers.
///
/// Member `Change` and `ChangeField` events are re-fired on the collection.
/// Like [`Record`], a `Collection` is a shared handle.
#[derive(Clone)]
pub struct Collection {
    inner: Rc<CollectionInner>,
}

/// Non-owning handle to a [`Collection`].
#[derive(Clone)]
pub struct WeakCollection {
    inner: Weak<CollectionInner>,
}

impl WeakCollection {
    pub fn upgrade(&self) -> Option<Collection> {
        self.inner.upgrade().map(|inner| Collection { inner })
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            inner: Rc::new(CollectionInner {
                members: RefCell::new(Vec::new()),
                config,
                events: Events::new(),
            }),
        }
    }

    /// Build a collection from existing records, rejecting duplicate ids.
    pub fn from_records<I>(records: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let collection = Self::new();
        for record in records {
            collection.add_record(record)?;
        }
        Ok(collection)
    }

    /// Build a collection from an array of objects.
    pub fn from_state(value: &StateValue) -> ModelResult<Self> {
        Self::from_state_with_config(value, ModelConfig::default())
    }

    pub fn from_state_with_config(value: &StateValue, config: ModelConfig) -> ModelResult<Self> {
        let collection = Self::with_config(config);
        for attributes in members_from_state(value)? {
            collection.add(attributes)?;
        }
        Ok(collection)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.inner.config
    }

    pub fn len(&self) -> usize {
        self.inner.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn at(&self, index: usize) -> Option<Record> {
        self.inner
            .members
            .borrow()
            .get(index)
            .map(|member| member.record.clone())
    }

    /// The member whose identifier equals `id`.
    pub fn get(&self, id: &StateValue) -> Option<Record> {
        find_by_id(&self.records(), id)
    }

    /// Handles to every member, in order.
    pub fn records(&self) -> Vec<Record> {
        self.inner
            .members
            .borrow()
            .iter()
            .map(|member| member.record.clone())
            .collect()
    }

    /// Create a record from `attributes` and append it.
    pub fn add(&self, attributes: StateMap) -> ModelResult<Record> {
        let record = Record::with_config(attributes, self.inner.config.clone());
        self.add_record(record.clone())?;
        Ok(record)
    }

    /// Append an existing record. Fires `Add` then `Update`.
    pub fn add_record(&self, record: Record) -> ModelResult<()> {
        if let Some(id) = record.id() {
            if self.get(&id).is_some() {
                return Err(ModelError::DuplicateId { id: id.to_string() });
            }
        }
        let member = self.attach(record);
        self.inner.members.borrow_mut().push(member);
        self.inner.events.trigger(&ModelEvent::Add);
        self.inner.events.trigger(&ModelEvent::Update);
        Ok(())
    }

    /// Remove the member with identifier `id`. Fires `Remove` then `Update`.
    pub fn remove(&self, id: &StateValue) -> Option<Record> {
        let member = {
            let mut members = self.inner.members.borrow_mut();
            let index = members
                .iter()
                .position(|member| member.record.id().as_ref() == Some(id))?;
            members.remove(index)
        };
        member.record.off(member.forward);
        self.inner.events.trigger(&ModelEvent::Remove);
        self.inner.events.trigger(&ModelEvent::Update);
        Some(member.record)
    }

    /// Smart merge: members whose identifier matches an item are updated in
    /// place, new items are added and members missing from `items` are
    /// removed. The final order follows `items`.
    ///
    /// Fires member change events for merged fields, `Remove`/`Add` per
    /// membership change and one `Update` if membership changed. Returns
    /// `true` if anything changed.
    pub fn set(&self, items: Vec<StateMap>) -> bool {
        let existing = self.records();
        let mut next: Vec<Record> = Vec::with_capacity(items.len());
        let mut added: Vec<Record> = Vec::new();
        let mut merges: Vec<(Record, StateMap)> = Vec::new();

        for attributes in items {
            let id = id_of(&attributes, &self.inner.config);
            if let Some(record) = id.and_then(|id| find_by_id(&next, id)) {
                merges.push((record, attributes));
                continue;
            }
            if let Some(record) = id.and_then(|id| find_by_id(&existing, id)) {
                merges.push((record.clone(), attributes));
                next.push(record);
                continue;
            }
            let record = Record::with_config(attributes, self.inner.config.clone());
            added.push(record.clone());
            next.push(record);
        }

        let mut changed = false;
        for (record, attributes) in merges {
            changed |= record.set_attributes(attributes);
        }

        let removed = {
            let mut members = self.inner.members.borrow_mut();
            let mut previous = mem::take(&mut *members);
            for record in next {
                match previous
                    .iter()
                    .position(|member| member.record.ptr_eq(&record))
                {
                    Some(index) => members.push(previous.remove(index)),
                    None => members.push(self.attach(record)),
                }
            }
            previous
        };

        for member in &removed {
            member.record.off(member.forward);
            self.inner.events.trigger(&ModelEvent::Remove);
        }
        for _ in &added {
            self.inner.events.trigger(&ModelEvent::Add);
        }
        if !removed.is_empty() || !added.is_empty() {
            self.inner.events.trigger(&ModelEvent::Update);
            changed = true;
        }
        changed
    }

    /// Replace every member with fresh records built from `items`. Fires a
    /// single `Reset` and no `Add`/`Remove`.
    ///
    /// Items repeating an identifier already seen in `items` are dropped.
    pub fn reset(&self, items: Vec<StateMap>) {
        let mut records: Vec<Record> = Vec::with_capacity(items.len());
        for attributes in items {
            if let Some(id) = id_of(&attributes, &self.inner.config) {
                if find_by_id(&records, id).is_some() {
                    warn!(%id, "dropping member with duplicate identifier during reset");
                    continue;
                }
            }
            records.push(Record::with_config(attributes, self.inner.config.clone()));
        }

        let count = records.len();
        let fresh: Vec<Member> = records.into_iter().map(|record| self.attach(record)).collect();
        let previous = mem::replace(&mut *self.inner.members.borrow_mut(), fresh);
        for member in &previous {
            member.record.off(member.forward);
        }
        debug!(previous = previous.len(), members = count, "collection reset");
        self.inner.events.trigger(&ModelEvent::Reset);
    }

    /// Plain-data snapshot: an array of member objects.
    pub fn to_state(&self) -> StateValue {
        self.records().iter().map(Record::to_state).collect()
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

    pub fn ptr_eq(&self, other: &Collection) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakCollection {
        WeakCollection {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn attach(&self, record: Record) -> Member {
        let collection = Rc::downgrade(&self.inner);
        let forward = record.on_all(move |event: &ModelEvent| {
            if !event.is_change() {
                return;
            }
            if let Some(inner) = collection.upgrade() {
                inner.events.trigger(event);
            }
        });
        Member { record, forward }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("members", &self.to_state())
            .finish()
    }
}

/// Split an array value into member attribute maps.
pub(crate) fn members_from_state(value: &StateValue) -> ModelResult<Vec<StateMap>> {
    let items = value.as_array().ok_or(ModelError::NotAnArray {
        found: value.kind(),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object()
                .cloned()
                .ok_or(ModelError::InvalidMember {
                    index,
                    found: item.kind(),
                })
        })
        .collect()
}

fn id_of<'a>(attributes: &'a StateMap, config: &ModelConfig) -> Option<&'a StateValue> {
    attributes
        .get(&config.id_attribute)
        .filter(|id| !id.is_null())
}

fn find_by_id(records: &[Record], id: &StateValue) -> Option<Record> {
    records
        .iter()
        .find(|record| record.id().as_ref() == Some(id))
        .cloned()
}
