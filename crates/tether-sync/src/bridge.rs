//! The synchronization bridge.
//!
//! A binding installs two listeners:
//!
//! - **Model to store**: when the bound object (or field) changes, dispatch a
//!   sync action that writes its current value at the slice path.
//! - **Store to model**: after every dispatch, read the slice and compare it
//!   by identity with the slice seen at the previous notification. Only a
//!   different value is written into the model.
//!
//! The two cannot ping-pong. A model write pushed into the store yields a
//! new slice that the store listener applies back to the model; that write
//! equals what the model already holds, so the model fires nothing. When a
//! store write does make the model fire (a collection reset always does),
//! the model listener finds the slice already equal to the model and skips
//! the dispatch. The last-seen marker is updated before the model is
//! touched, so re-entrant notifications never apply the same slice twice.

use std::fmt;

use tether_model::{DomainObject, ListenerId, ModelEvent, Record, WeakDomainObject, WeakRecord};
use tether_store::{Action, Store};
use tether_types::{SlicePath, StateValue};
use tether_update::{DraftMut, StateTransform};
use tracing::{debug, trace, warn};

use crate::binding::{Binding, LastSeen};
use crate::config::BindConfig;
use crate::disposer::Disposer;
use crate::error::{BindError, BindResult};

/// Bind `object` to the slice at `slice_path`.
///
/// With `model_attribute`, only that field of a record is mirrored: the
/// slice holds the field's value rather than the whole record.
///
/// The store must have been created with a reducer wrapped by
/// [`wrap_reducer`](tether_store::wrap_reducer).
///
/// # Errors
///
/// - [`BindError::Path`] if `slice_path` is empty or has an empty segment.
/// - [`BindError::FieldOnCollection`] if `model_attribute` is given for a
///   collection.
///
/// Nothing is dispatched when binding fails.
pub fn bind<O>(
    store: &Store,
    slice_path: &str,
    object: O,
    model_attribute: Option<&str>,
) -> BindResult<Binding>
where
    O: Into<DomainObject>,
{
    let path = SlicePath::parse(slice_path)?;
    bind_path(store, path, object.into(), model_attribute.map(str::to_string))
}

/// Bind `object` as described by `config`.
pub fn bind_with_config<O>(store: &Store, config: &BindConfig, object: O) -> BindResult<Binding>
where
    O: Into<DomainObject>,
{
    bind_path(
        store,
        config.slice_path.clone(),
        object.into(),
        config.model_attribute.clone(),
    )
}

/// Bind `object` to an already parsed path.
pub fn bind_path(
    store: &Store,
    path: SlicePath,
    object: DomainObject,
    model_attribute: Option<String>,
) -> BindResult<Binding> {
    let target = Target::new(object, model_attribute.clone())?;
    debug!(path = %path, target = %target, "binding");

    store.dispatch(Action::sync(push_transform(&path, target.snapshot())));
    let last_seen = LastSeen::new(store.select(&path));
    debug!(path = %path, "hydrated slice");

    let listener = {
        let store = store.downgrade();
        let weak = target.downgrade();
        let path = path.clone();
        target.listen(move || {
            let (Some(store), Some(target)) = (store.upgrade(), weak.upgrade()) else {
                return;
            };
            let snapshot = target.snapshot();
            if snapshot.as_ref() == store.select(&path).as_ref() {
                trace!(path = %path, "slice already current");
                return;
            }
            trace!(path = %path, "pushing model change");
            store.dispatch(Action::sync(push_transform(&path, snapshot)));
        })
    };

    let subscription = {
        let handle = store.downgrade();
        let target = target.clone();
        let path = path.clone();
        store.subscribe(move || {
            let Some(store) = handle.upgrade() else {
                return;
            };
            let slice = store.select(&path);
            if !last_seen.advance(slice.as_ref()) {
                trace!(path = %path, "slice unchanged");
                return;
            }
            debug!(path = %path, target = %target, "applying slice to model");
            target.apply(&path, slice);
        })
    };

    let model = {
        let weak = target.downgrade();
        Disposer::new("model", move || {
            if let Some(target) = weak.upgrade() {
                target.off(listener);
            }
        })
    };
    let store_disposer = {
        let store = store.downgrade();
        Disposer::new("store", move || {
            if let Some(store) = store.upgrade() {
                store.unsubscribe(subscription);
            }
        })
    };

    Ok(Binding::new(path, model_attribute, model, store_disposer))
}

/// The transform that writes `value` at `path`, or removes the key when the
/// value is absent.
fn push_transform(path: &SlicePath, value: Option<StateValue>) -> StateTransform {
    match value {
        Some(value) => StateTransform::set(path.clone(), value),
        None => {
            let path = path.clone();
            StateTransform::new(format!("remove {path}"), move |draft| {
                draft.remove_in(&path);
            })
        }
    }
}

/// What a binding mirrors.
#[derive(Clone)]
enum Target {
    /// The whole record or collection.
    Whole(DomainObject),
    /// One field of a record.
    Field { record: Record, field: String },
}

enum WeakTarget {
    Whole(WeakDomainObject),
    Field { record: WeakRecord, field: String },
}

impl Target {
    fn new(object: DomainObject, model_attribute: Option<String>) -> BindResult<Self> {
        match (object, model_attribute) {
            (object, None) => Ok(Target::Whole(object)),
            (DomainObject::Record(record), Some(field)) => Ok(Target::Field { record, field }),
            (DomainObject::Collection(_), Some(field)) => {
                Err(BindError::FieldOnCollection { field })
            }
        }
    }

    /// The value the slice should hold. `None` for an absent field.
    fn snapshot(&self) -> Option<StateValue> {
        match self {
            Target::Whole(object) => Some(object.serialize()),
            Target::Field { record, field } => record.get(field),
        }
    }

    fn apply(&self, path: &SlicePath, slice: Option<StateValue>) {
        match (self, slice) {
            (Target::Field { record, field }, Some(value)) => {
                record.set(field, value);
            }
            (Target::Field { record, field }, None) => {
                record.unset(field);
            }
            (Target::Whole(object), None) if object.is_collection() => {
                if let Err(err) = object.replace_all(&StateValue::Null) {
                    warn!(path = %path, error = %err, "cannot clear collection");
                }
            }
            (Target::Whole(_), None) => {
                trace!(path = %path, "slice removed, record left as is");
            }
            (Target::Whole(object), Some(value)) => {
                if let Err(err) = object.replace_all(&value) {
                    warn!(
                        path = %path,
                        found = %value.kind(),
                        error = %err,
                        "slice cannot be applied to bound object"
                    );
                }
            }
        }
    }

    fn listen<F: Fn() + 'static>(&self, listener: F) -> ListenerId {
        match self {
            Target::Whole(object) => object.on_any_change(listener),
            Target::Field { record, field } => {
                record.on(ModelEvent::change_field(field.as_str()), listener)
            }
        }
    }

    fn off(&self, id: ListenerId) -> bool {
        match self {
            Target::Whole(object) => object.off(id),
            Target::Field { record, .. } => record.off(id),
        }
    }

    fn downgrade(&self) -> WeakTarget {
        match self {
            Target::Whole(object) => WeakTarget::Whole(object.downgrade()),
            Target::Field { record, field } => WeakTarget::Field {
                record: record.downgrade(),
                field: field.clone(),
            },
        }
    }
}

impl WeakTarget {
    fn upgrade(&self) -> Option<Target> {
        match self {
            WeakTarget::Whole(object) => object.upgrade().map(Target::Whole),
            WeakTarget::Field { record, field } => record.upgrade().map(|record| Target::Field {
                record,
                field: field.clone(),
            }),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Whole(object) if object.is_collection() => f.write_str("collection"),
            Target::Whole(_) => f.write_str("record"),
            Target::Field { field, .. } => write!(f, "field '{field}'"),
        }
    }
}
