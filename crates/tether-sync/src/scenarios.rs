//! End-to-end binding scenarios over a small music library.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use tether_model::{Collection, ModelEvent, Record};
use tether_store::{Action, Store};
use tether_types::{SlicePath, StateValue};
use tether_update::{produce, Draft, DraftMut, StateTransform};

use crate::{bind, bind_with_config, wrap_reducer, BindConfig, BindError};

fn path(s: &str) -> SlicePath {
    SlicePath::parse(s).unwrap()
}

fn find_song<'a>(
    draft: &'a mut Draft,
    songs: &SlicePath,
    id: &StateValue,
) -> Option<&'a mut StateValue> {
    draft
        .get_in_mut(songs)?
        .array_mut()?
        .iter_mut()
        .find(|song| song.get("id") == Some(id))
}

/// Application reducer. Knows about a song list at `songs`, a single song at
/// `song`, and an unrelated counter.
fn library(songs: SlicePath) -> impl Fn(&StateValue, &Action) -> StateValue {
    move |state: &StateValue, action: &Action| {
        let state = if state.is_null() {
            StateValue::empty_object()
        } else {
            state.clone()
        };
        let payload = action.value().cloned().unwrap_or_default();
        match action.kind() {
            "INCREASE_LISTENER" => produce(&state, |draft| {
                if let Some(song) = find_song(draft, &songs, &payload) {
                    let listeners = song.get("listeners").and_then(StateValue::as_i64).unwrap_or(0);
                    song.make_object()
                        .insert("listeners".into(), StateValue::from(listeners + 1));
                }
            }),
            "UPDATE_SONG_TITLE" => produce(&state, |draft| {
                let (Some(id), Some(title)) = (payload.get("id"), payload.get("title")) else {
                    return;
                };
                if let Some(song) = find_song(draft, &songs, id) {
                    song.make_object().insert("title".into(), title.clone());
                }
            }),
            "PLAY_SONG" => produce(&state, |draft| {
                let Some(song) = draft.get_mut("song") else {
                    return;
                };
                let listeners = song.get("listeners").and_then(StateValue::as_i64).unwrap_or(0);
                song.make_object()
                    .insert("listeners".into(), StateValue::from(listeners + 1));
            }),
            "TICK" => produce(&state, |draft| {
                let ticks = draft.get("ticks").and_then(StateValue::as_i64).unwrap_or(0);
                draft
                    .make_object()
                    .insert("ticks".into(), StateValue::from(ticks + 1));
            }),
            _ => state,
        }
    }
}

fn store_for(songs: &str) -> Store {
    Store::new(wrap_reducer(library(path(songs))))
}

fn songs() -> Collection {
    Collection::from_state(&StateValue::from(json!([
        {"id": 1, "title": "First", "listeners": 0},
        {"id": 2, "title": "Second", "listeners": 0},
        {"id": 3, "title": "Third", "listeners": 0}
    ])))
    .unwrap()
}

fn song() -> Record {
    Record::from_state(&StateValue::from(json!({
        "id": 10,
        "title": "Song Title",
        "listeners": 81
    })))
    .unwrap()
}

fn event_counter(collection: &Collection) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let sink = count.clone();
    collection.on_all(move |_| sink.set(sink.get() + 1));
    count
}

fn listeners_by_id(collection: &Collection) -> Vec<(i64, i64)> {
    collection
        .records()
        .iter()
        .map(|song| {
            let id = song.id().and_then(|id| id.as_i64()).unwrap_or_default();
            let listeners = song.get("listeners").and_then(|n| n.as_i64()).unwrap_or_default();
            (id, listeners)
        })
        .collect()
}

fn hydrates_collection(at: &str) {
    let store = store_for(at);
    let collection = songs();
    bind(&store, at, &collection, None).unwrap();
    assert_eq!(store.select(&path(at)).unwrap(), collection.to_state());

    let empty = Collection::new();
    let store = store_for(at);
    bind(&store, at, &empty, None).unwrap();
    assert_eq!(store.select(&path(at)).unwrap(), json!([]));
}

fn member_change_reaches_store(at: &str) {
    let store = store_for(at);
    let collection = songs();
    bind(&store, at, &collection, None).unwrap();
    let before = store.select(&path(at)).unwrap();

    collection.at(0).unwrap().set("title", "Renamed");

    let after = store.select(&path(at)).unwrap();
    assert_eq!(after.at(0).unwrap().get("title").unwrap(), &json!("Renamed"));
    assert_eq!(after.at(0).unwrap().get("listeners").unwrap(), &json!(0));
    assert!(after.at(1).unwrap().same(before.at(1).unwrap()));
    assert!(after.at(2).unwrap().same(before.at(2).unwrap()));
}

fn store_change_reaches_collection(at: &str) {
    let store = store_for(at);
    let collection = songs();
    bind(&store, at, &collection, None).unwrap();
    let original = collection.at(1).unwrap();
    let dispatches = store.dispatch_count();

    store.dispatch(Action::with_payload("INCREASE_LISTENER", 2));
    assert_eq!(store.dispatch_count(), dispatches + 1);

    assert_eq!(listeners_by_id(&collection), vec![(1, 0), (2, 1), (3, 0)]);
    assert!(!collection.at(1).unwrap().ptr_eq(&original));
    assert_eq!(collection.to_state(), store.select(&path(at)).unwrap());
}

fn end_to_end(at: &str) {
    let store = store_for(at);
    let collection = songs();
    bind(&store, at, &collection, None).unwrap();

    for id in [1, 1, 1, 2, 3] {
        store.dispatch(Action::with_payload("INCREASE_LISTENER", id));
    }
    assert_eq!(listeners_by_id(&collection), vec![(1, 3), (2, 1), (3, 1)]);

    let before = store.select(&path(at)).unwrap();
    collection.at(0).unwrap().set("title", "New Title");
    let after = store.select(&path(at)).unwrap();
    assert_eq!(
        after,
        json!([
            {"id": 1, "title": "New Title", "listeners": 3},
            {"id": 2, "title": "Second", "listeners": 1},
            {"id": 3, "title": "Third", "listeners": 1}
        ])
    );
    assert!(after.at(1).unwrap().same(before.at(1).unwrap()));

    store.dispatch(Action::with_payload(
        "UPDATE_SONG_TITLE",
        json!({"id": 2, "title": "From Store"}),
    ));
    assert_eq!(
        collection.at(1).unwrap().get("title").unwrap(),
        json!("From Store")
    );
}

#[test]
fn collection_hydration_top_level() {
    hydrates_collection("songs");
}

#[test]
fn collection_hydration_nested() {
    hydrates_collection("very.nested.songs");
}

#[test]
fn nested_hydration_creates_missing_levels() {
    let store = store_for("very.nested.songs");
    assert_eq!(store.state(), json!({}));
    bind(&store, "very.nested.songs", songs(), None).unwrap();
    let very = store.state().get("very").cloned().unwrap();
    assert!(very.get("nested").unwrap().get("songs").unwrap().is_array());
}

#[test]
fn member_change_reaches_store_top_level() {
    member_change_reaches_store("songs");
}

#[test]
fn member_change_reaches_store_nested() {
    member_change_reaches_store("very.nested.songs");
}

#[test]
fn store_change_reaches_collection_top_level() {
    store_change_reaches_collection("songs");
}

#[test]
fn store_change_reaches_collection_nested() {
    store_change_reaches_collection("very.nested.songs");
}

#[test]
fn end_to_end_top_level() {
    end_to_end("songs");
}

#[test]
fn end_to_end_nested() {
    end_to_end("very.nested.songs");
}

#[test]
fn unrelated_dispatches_do_not_touch_the_model() {
    let store = store_for("songs");
    let collection = songs();
    bind(&store, "songs", &collection, None).unwrap();
    let events = event_counter(&collection);
    let first = collection.at(0).unwrap();

    for _ in 0..10 {
        store.dispatch(Action::new("TICK"));
    }

    assert_eq!(events.get(), 0);
    assert!(collection.at(0).unwrap().ptr_eq(&first));
    assert_eq!(store.state().get("ticks").unwrap(), &json!(10));
}

#[test]
fn model_change_dispatches_once() {
    let store = store_for("songs");
    let collection = songs();
    bind(&store, "songs", &collection, None).unwrap();
    let before = store.dispatch_count();

    collection.at(2).unwrap().set("listeners", 5);

    assert_eq!(store.dispatch_count(), before + 1);
}

#[test]
fn record_hydration() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song", &record, None).unwrap();
    assert_eq!(
        store.state(),
        json!({"song": {"id": 10, "title": "Song Title", "listeners": 81}})
    );

    let empty = Record::new(Default::default());
    let store = store_for("songs");
    bind(&store, "song", &empty, None).unwrap();
    assert_eq!(store.state(), json!({"song": {}}));
}

#[test]
fn record_syncs_both_ways() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song", &record, None).unwrap();

    record.set("title", "Changed");
    assert_eq!(
        store.state(),
        json!({"song": {"id": 10, "title": "Changed", "listeners": 81}})
    );

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    record.on_all(move |event| sink.borrow_mut().push(event.to_string()));
    store.dispatch(Action::new("PLAY_SONG"));

    assert_eq!(record.get("listeners").unwrap(), json!(82));
    assert_eq!(*changes.borrow(), vec!["change:listeners", "change"]);
}

#[test]
fn record_ignores_scalar_slice() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song", &record, None).unwrap();

    store.dispatch(Action::sync(StateTransform::set(path("song"), StateValue::from(5))));

    assert_eq!(record.get("title").unwrap(), json!("Song Title"));
    assert_eq!(store.state(), json!({"song": 5}));
}

#[test]
fn field_mode_hydrates_only_the_field() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song.listeners", &record, Some("listeners")).unwrap();
    assert_eq!(store.state(), json!({"song": {"listeners": 81}}));
}

#[test]
fn field_mode_ignores_other_fields() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song.listeners", &record, Some("listeners")).unwrap();
    let before = store.state();

    record.set("title", "Another Title");

    assert!(store.state().same(&before));
}

#[test]
fn field_mode_syncs_both_ways() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song.listeners", &record, Some("listeners")).unwrap();

    record.set("listeners", 90);
    assert_eq!(store.state(), json!({"song": {"listeners": 90}}));

    store.dispatch(Action::new("PLAY_SONG"));
    assert_eq!(record.get("listeners").unwrap(), json!(91));
    assert_eq!(record.get("title").unwrap(), json!("Song Title"));
}

#[test]
fn field_mode_unsets_when_slice_disappears() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song.listeners", &record, Some("listeners")).unwrap();

    store.dispatch(Action::sync(StateTransform::new("drop song", |draft| {
        draft.remove_in(&path("song"));
    })));

    assert!(!record.has("listeners"));
    assert_eq!(store.state(), json!({}));
}

#[test]
fn collection_clears_when_slice_disappears() {
    let store = store_for("songs");
    let collection = songs();
    bind(&store, "songs", &collection, None).unwrap();

    store.dispatch(Action::sync(StateTransform::new("drop songs", |draft| {
        draft.remove_in(&path("songs"));
    })));

    assert!(collection.is_empty());
    assert_eq!(store.state(), json!({"songs": []}));
}

#[test]
fn collection_rejects_field_mode() {
    let store = store_for("songs");
    let before = store.state();
    let err = bind(&store, "songs", songs(), Some("title")).unwrap_err();
    assert_eq!(err, BindError::FieldOnCollection { field: "title".into() });
    assert!(store.state().same(&before));
}

#[test]
fn disposal_detaches_both_directions() {
    let store = store_for("songs");
    let collection = songs();
    let (model, subscription) = bind(&store, "songs", &collection, None)
        .unwrap()
        .into_disposers();
    assert!(model.dispose());
    assert!(subscription.dispose());
    assert!(!model.dispose());

    let frozen = store.state();
    collection.at(0).unwrap().set("title", "Unsynced");
    assert!(store.state().same(&frozen));

    store.dispatch(Action::with_payload("INCREASE_LISTENER", 1));
    assert_eq!(listeners_by_id(&collection), vec![(1, 0), (2, 0), (3, 0)]);
}

#[test]
fn disposers_are_independent() {
    let store = store_for("songs");
    let collection = songs();
    let binding = bind(&store, "songs", &collection, None).unwrap();

    binding.store_disposer().dispose();
    store.dispatch(Action::with_payload("INCREASE_LISTENER", 1));
    assert_eq!(listeners_by_id(&collection), vec![(1, 0), (2, 0), (3, 0)]);

    collection.at(2).unwrap().set("listeners", 7);
    let slice = store.select(&path("songs")).unwrap();
    assert_eq!(slice.at(2).unwrap().get("listeners").unwrap(), &json!(7));
    assert!(!binding.model_disposer().is_disposed());
}

#[test]
fn bindings_on_one_store_are_independent() {
    let store = store_for("songs");
    let collection = songs();
    let record = song();
    bind(&store, "songs", &collection, None).unwrap();
    bind(&store, "song", &record, None).unwrap();
    let events = event_counter(&collection);

    store.dispatch(Action::new("PLAY_SONG"));
    assert_eq!(record.get("listeners").unwrap(), json!(82));
    assert_eq!(events.get(), 0);

    store.dispatch(Action::with_payload("INCREASE_LISTENER", 3));
    assert_eq!(record.get("listeners").unwrap(), json!(82));
    assert_eq!(listeners_by_id(&collection), vec![(1, 0), (2, 0), (3, 1)]);
}

#[test]
fn one_record_bound_twice() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song", &record, None).unwrap();
    bind(&store, "stats.listeners", &record, Some("listeners")).unwrap();

    record.set("listeners", 100);
    assert_eq!(store.state().get("stats").unwrap(), &json!({"listeners": 100}));
    assert_eq!(
        store.state().get("song").unwrap().get("listeners").unwrap(),
        &json!(100)
    );

    store.dispatch(Action::new("PLAY_SONG"));
    assert_eq!(record.get("listeners").unwrap(), json!(101));
    assert_eq!(store.state().get("stats").unwrap(), &json!({"listeners": 101}));
}

#[test]
fn bind_from_config() {
    let store = store_for("songs");
    let record = song();
    let config: BindConfig =
        serde_json::from_value(json!({"slice_path": "song.listeners", "model_attribute": "listeners"}))
            .unwrap();
    let binding = bind_with_config(&store, &config, &record).unwrap();

    assert_eq!(binding.model_attribute(), Some("listeners"));
    assert_eq!(store.state(), json!({"song": {"listeners": 81}}));
}

#[test]
fn listener_writes_during_store_notification_settle() {
    let store = store_for("songs");
    let record = song();
    bind(&store, "song", &record, None).unwrap();

    let handle = record.clone();
    record.on(ModelEvent::change_field("listeners"), move || {
        let listeners = handle.get("listeners").and_then(|n| n.as_i64()).unwrap_or(0);
        handle.set("popular", listeners > 81);
    });

    store.dispatch(Action::new("PLAY_SONG"));

    assert_eq!(record.get("popular").unwrap(), json!(true));
    assert_eq!(
        store.state(),
        json!({"song": {"id": 10, "title": "Song Title", "listeners": 82, "popular": true}})
    );
}
