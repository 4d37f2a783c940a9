//! Synchronous event registry.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Events emitted by records and collections.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelEvent {
    /// At least one field changed (bubbled from members on a collection).
    Change,
    /// The named field changed.
    ChangeField(String),
    /// A member joined a collection.
    Add,
    /// A member left a collection.
    Remove,
    /// A batch of `Add`/`Remove` finished.
    Update,
    /// A collection's membership was replaced wholesale.
    Reset,
}

impl ModelEvent {
    pub fn change_field(field: impl Into<String>) -> Self {
        ModelEvent::ChangeField(field.into())
    }

    pub fn is_change(&self) -> bool {
        matches!(self, ModelEvent::Change | ModelEvent::ChangeField(_))
    }
}

impl fmt::Display for ModelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelEvent::Change => f.write_str("change"),
            ModelEvent::ChangeField(field) => write!(f, "change:{field}"),
            ModelEvent::Add => f.write_str("add"),
            ModelEvent::Remove => f.write_str("remove"),
            ModelEvent::Update => f.write_str("update"),
            ModelEvent::Reset => f.write_str("reset"),
        }
    }
}

/// Handle returned when registering a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback = Rc<dyn Fn(&ModelEvent)>;

enum Filter {
    Only(Vec<ModelEvent>),
    All,
}

impl Filter {
    fn accepts(&self, event: &ModelEvent) -> bool {
        match self {
            Filter::Only(events) => events.contains(event),
            Filter::All => true,
        }
    }
}

struct Entry {
    id: ListenerId,
    filter: Filter,
    callback: Callback,
}

/// Ordered listener registry.
///
/// Listeners run in registration order. `trigger` collects the matching
/// callbacks first and releases its borrow before calling them, so a
/// listener may register, remove, or trigger listeners on the same registry.
#[derive(Default)]
pub struct Events {
    entries: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `listener` whenever `event` fires.
    pub fn on<F>(&self, event: ModelEvent, listener: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        self.register(Filter::Only(vec![event]), Rc::new(move |_: &ModelEvent| listener()))
    }

    /// Call `listener` whenever any of `events` fires.
    pub fn on_any<I, F>(&self, events: I, listener: F) -> ListenerId
    where
        I: IntoIterator<Item = ModelEvent>,
        F: Fn() + 'static,
    {
        let events = events.into_iter().collect();
        self.register(Filter::Only(events), Rc::new(move |_: &ModelEvent| listener()))
    }

    /// Call `listener` with every event that fires.
    pub fn on_all<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ModelEvent) + 'static,
    {
        self.register(Filter::All, Rc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub fn trigger(&self, event: &ModelEvent) {
        let callbacks: Vec<Callback> = self
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.filter.accepts(event))
            .map(|entry| Rc::clone(&entry.callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.entries.borrow().len()
    }

    fn register(&self, filter: Filter, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push(Entry {
            id,
            filter,
            callback,
        });
        id
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
