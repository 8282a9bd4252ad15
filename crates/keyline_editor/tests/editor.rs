//! Editor behavior driven through pointer input, the way a host would

use keyline_animation::{Easing, PropertyBag, Timeline, TweenOptions};
use keyline_core::events::event_types;
use keyline_core::{Event, KeyValueStore, MemoryStore};
use keyline_editor::persist::data_key;
use keyline_editor::{
    Editor, EditorError, EditorLayout, EditorRequest, Gesture, LoadOutcome, TrackId,
};
use pretty_assertions::assert_eq;

fn triples(editor: &Editor, track: TrackId) -> Vec<(f64, f64, Easing)> {
    editor
        .tracks()
        .keys_of(track)
        .map(|(_, k)| (k.time, k.value, k.easing))
        .collect()
}

/// `box.x` with keys at 1s (100) and 2s (0)
fn box_scene(store: MemoryStore) -> (Timeline, Editor) {
    let mut tl = Timeline::new();
    let target = tl.add_target(PropertyBag::new().with("x", 0.0));
    tl.chain(Some("box"), target)
        .to([("x", 100.0)], TweenOptions::default())
        .to([("x", 0.0)], TweenOptions::default());
    let editor = Editor::new(EditorLayout::default(), store, &mut tl);
    (tl, editor)
}

/// One object with four properties, keys at 1..=5s on every property track
fn grid_scene() -> (Timeline, Editor) {
    let mut tl = Timeline::new();
    let target = tl.add_target(
        PropertyBag::new()
            .with("p", 0.0)
            .with("q", 0.0)
            .with("r", 0.0)
            .with("s", 0.0),
    );
    let mut chain = tl.chain(Some("grid"), target);
    for step in 1..=5 {
        let v = step as f64;
        chain = chain.to(
            [("p", v), ("q", v), ("r", v), ("s", v)],
            TweenOptions::default(),
        );
    }
    let mut editor = Editor::new(EditorLayout::default(), MemoryStore::new(), &mut tl);
    editor.set_width(1200.0);
    (tl, editor)
}

#[test]
fn tracks_round_trip_through_the_engine() {
    let mut tl = Timeline::new();
    let target = tl.add_target(PropertyBag::new().with("x", 5.0).with("y", 0.0));
    tl.chain(Some("box"), target)
        .to([("x", 10.0), ("y", 3.0)], TweenOptions::default().easing(Easing::CubicIn))
        .to(
            [("x", 20.0)],
            TweenOptions::default().delay(1.0).easing(Easing::SinusoidalOut),
        )
        .to([("x", 0.0)], TweenOptions::default().easing(Easing::BounceOut));
    let mut editor = Editor::new(EditorLayout::default(), MemoryStore::new(), &mut tl);

    let x = editor.tracks().find("box.x").unwrap();
    let y = editor.tracks().find("box.y").unwrap();
    let before = (triples(&editor, x), triples(&editor, y));
    assert_eq!(tl.animations().len(), 4);

    // loading saved keys replaces the derived animations with synthesized ones
    editor.save().unwrap();
    let saved = editor.store().clone();
    Editor::new(EditorLayout::default(), saved, &mut tl);
    assert_eq!(tl.animations().len(), 5);

    let reopened = Editor::new(EditorLayout::default(), MemoryStore::new(), &mut tl);
    let x = reopened.tracks().find("box.x").unwrap();
    let y = reopened.tracks().find("box.y").unwrap();
    assert_eq!((triples(&reopened, x), triples(&reopened, y)), before);
}

#[test]
fn marquee_selects_rows_and_times_in_its_bounds() {
    let (mut tl, mut editor) = grid_scene();
    let axis = editor.time_axis(&tl);
    let (left, right) = (axis.time_to_px(2.0) - 10.0, axis.time_to_px(4.0) + 10.0);

    // rows 2..=4 are grid.q, grid.r and grid.s
    editor.pointer_down(left, 72.0, &mut tl);
    assert_eq!(editor.gesture(), Gesture::DrawingMarquee);
    editor.pointer_move(right, 128.0, &mut tl);
    editor.pointer_up(right, 128.0, &mut tl);
    assert_eq!(editor.gesture(), Gesture::DraggingKeys);

    let mut picked: Vec<(String, f64)> = editor
        .selection()
        .iter()
        .map(|id| {
            let key = editor.tracks().key(id).unwrap();
            let track = editor.tracks().property(key.track).unwrap();
            (track.id.clone(), key.time)
        })
        .collect();
    picked.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut expected = Vec::new();
    for track in ["grid.q", "grid.r", "grid.s"] {
        for time in [2.0, 3.0, 4.0] {
            expected.push((track.to_string(), time));
        }
    }
    assert_eq!(picked, expected);
}

#[test]
fn armed_marquee_selection_drags_without_a_press() {
    let (mut tl, mut editor) = grid_scene();
    let axis = editor.time_axis(&tl);
    let (left, right) = (axis.time_to_px(2.0) - 10.0, axis.time_to_px(4.0) + 10.0);

    editor.pointer_down(left, 72.0, &mut tl);
    editor.pointer_move(right, 128.0, &mut tl);
    editor.pointer_up(right, 128.0, &mut tl);

    // one second to the right
    editor.pointer_move(right + axis.pixels_per_second(), 128.0, &mut tl);

    let q = editor.tracks().find("grid.q").unwrap();
    let p = editor.tracks().find("grid.p").unwrap();
    let times = |track| -> Vec<f64> { triples(&editor, track).iter().map(|k| k.0).collect() };
    assert_eq!(times(q), vec![1.0, 3.0, 4.0, 5.0, 5.0]);
    assert_eq!(times(p), vec![1.0, 2.0, 3.0, 4.0, 5.0]);

    // several keys selected: no edit form
    editor.double_click(right, 128.0, &mut tl);
    assert!(editor.form().is_none());
    assert!(editor.store().get(&data_key("Global")).is_some());
}

#[test]
fn dragging_a_key_never_goes_below_zero() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    // key at 1s on row 1
    editor.pointer_down(318.0, 60.0, &mut tl);
    assert_eq!(editor.gesture(), Gesture::DraggingKeys);
    assert_eq!(editor.selection().len(), 1);

    editor.pointer_move(0.0, 60.0, &mut tl);
    editor.pointer_up(0.0, 60.0, &mut tl);
    assert_eq!(editor.gesture(), Gesture::Idle);

    let x = editor.tracks().find("box.x").unwrap();
    assert_eq!(
        triples(&editor, x),
        vec![(0.0, 100.0, Easing::Linear), (2.0, 0.0, Easing::Linear)]
    );
    let anim = tl.animations().iter().find(|a| a.property == "x").unwrap();
    assert_eq!((anim.start_time, anim.end_time), (0.0, 0.0));
}

#[test]
fn double_click_in_empty_cell_inserts_on_the_curve() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    // 1.5s on row 1, halfway between the keys
    editor.pointer_down(418.0, 60.0, &mut tl);
    editor.pointer_up(418.0, 60.0, &mut tl);
    assert!(editor.selection().is_empty());
    editor.double_click(418.0, 60.0, &mut tl);

    let x = editor.tracks().find("box.x").unwrap();
    assert_eq!(
        triples(&editor, x),
        vec![
            (1.0, 100.0, Easing::Linear),
            (1.5, 50.0, Easing::Linear),
            (2.0, 0.0, Easing::Linear),
        ]
    );
    assert_eq!(editor.selection().len(), 1);
    assert_eq!(tl.animations().len(), 3);
}

#[test]
fn double_click_on_object_row_inserts_nothing() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    editor.double_click(418.0, 40.0, &mut tl);
    let x = editor.tracks().find("box.x").unwrap();
    assert_eq!(triples(&editor, x).len(), 2);
}

#[test]
fn key_form_rejects_bad_numbers_and_applies_good_ones() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    editor.pointer_down(518.0, 60.0, &mut tl);
    editor.pointer_up(518.0, 60.0, &mut tl);
    editor.double_click(518.0, 60.0, &mut tl);
    assert_eq!(
        editor.take_requests().into_vec(),
        vec![EditorRequest::OpenKeyForm {
            anchor: (518.0, 60.0)
        }]
    );

    let form = editor.form_mut().unwrap();
    assert_eq!((form.value.as_str(), form.time.as_str()), ("0", "2"));
    form.value = "abc".to_string();
    let err = editor.confirm_key_form(&mut tl).unwrap_err();
    assert!(matches!(err, EditorError::InvalidNumber { field: "value", .. }));
    assert!(editor.form().is_some());
    let x = editor.tracks().find("box.x").unwrap();
    assert_eq!(triples(&editor, x)[1], (2.0, 0.0, Easing::Linear));

    let form = editor.form_mut().unwrap();
    form.value = "42".to_string();
    form.time = "0.5".to_string();
    form.easing = "Bounce.EaseOut".to_string();
    editor.confirm_key_form(&mut tl).unwrap();
    assert!(editor.form().is_none());
    assert_eq!(
        triples(&editor, x),
        vec![(0.5, 42.0, Easing::BounceOut), (1.0, 100.0, Easing::Linear)]
    );

    let last = tl.animations().last().unwrap();
    assert_eq!((last.start_time, last.end_time), (0.5, 1.0));
    assert_eq!((last.start_value, last.end_value), (42.0, 100.0));
    assert_eq!(last.easing, Easing::BounceOut);
}

#[test]
fn confirm_without_form_is_an_error() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    assert!(matches!(
        editor.confirm_key_form(&mut tl),
        Err(EditorError::NoOpenForm)
    ));
}

#[test]
fn form_delete_removes_the_key() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    editor.pointer_down(318.0, 60.0, &mut tl);
    editor.pointer_up(318.0, 60.0, &mut tl);
    editor.double_click(318.0, 60.0, &mut tl);
    editor.delete_from_form(&mut tl);

    let x = editor.tracks().find("box.x").unwrap();
    assert_eq!(triples(&editor, x), vec![(2.0, 0.0, Easing::Linear)]);
    assert!(editor.form().is_none());
    assert!(editor.selection().is_empty());
    assert_eq!(tl.animations().len(), 1);
}

#[test]
fn edits_survive_reopening() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    editor.pointer_down(418.0, 60.0, &mut tl);
    editor.pointer_up(418.0, 60.0, &mut tl);
    editor.double_click(418.0, 60.0, &mut tl);
    editor.set_time_scale(0.5);
    let saved = editor.store().clone();

    let (_tl, mut reopened) = box_scene(saved);
    let x = reopened.tracks().find("box.x").unwrap();
    assert_eq!(triples(&reopened, x).len(), 3);
    assert_eq!(reopened.view().time_scale, 0.5);

    reopened.clear_saved().unwrap();
    assert!(reopened.store().get(&data_key("Global")).is_none());
    let (_tl, fresh) = box_scene(reopened.store().clone());
    let x = fresh.tracks().find("box.x").unwrap();
    assert_eq!(triples(&fresh, x).len(), 2);
}

#[test]
fn corrupt_saved_data_is_ignored() {
    let mut store = MemoryStore::new();
    store
        .set(&data_key("Global"), "{not json".to_string())
        .unwrap();
    let (mut tl, mut editor) = box_scene(store);
    let x = editor.tracks().find("box.x").unwrap();
    assert_eq!(
        triples(&editor, x),
        vec![(1.0, 100.0, Easing::Linear), (2.0, 0.0, Easing::Linear)]
    );
    assert_eq!(editor.load(&mut tl), LoadOutcome::NoSavedState);
}

#[test]
fn tracks_scrollbar_thumb_drags() {
    let mut tl = Timeline::new();
    let mut bag = PropertyBag::new();
    let names: Vec<String> = (0..20).map(|i| format!("p{i}")).collect();
    for name in &names {
        bag.insert(name.clone(), 0.0);
    }
    let target = tl.add_target(bag);
    tl.chain(Some("many"), target).to(
        names.iter().map(|n| (n.clone(), 1.0)),
        TweenOptions::default(),
    );
    let mut editor = Editor::new(EditorLayout::default(), MemoryStore::new(), &mut tl);

    editor.pointer_down(790.0, 40.0, &mut tl);
    assert_eq!(
        editor.gesture(),
        Gesture::DraggingTracksScrollbar { grab: 10.0 }
    );
    editor.pointer_move(790.0, 1000.0, &mut tl);
    assert_eq!(editor.view().tracks_scroll, 1.0);
    editor.pointer_up(790.0, 1000.0, &mut tl);

    // 21 rows overflow the panel by 250px
    assert_eq!(editor.track_at(31.0), editor.tracks().at_row(12));
}

#[test]
fn host_events_are_dispatched() {
    let (mut tl, mut editor) = box_scene(MemoryStore::new());
    editor.handle_event(&Event::resize(1024.0, 300.0), &mut tl);
    assert_eq!(editor.view().width, 1024.0);

    editor.handle_event(&Event::pointer(event_types::POINTER_DOWN, 218.0, 10.0), &mut tl);
    assert_eq!(tl.time(), 0.5);
    editor.handle_event(&Event::pointer(event_types::POINTER_MOVE, 318.0, 10.0), &mut tl);
    assert_eq!(tl.time(), 1.0);
    editor.handle_event(&Event::pointer(event_types::POINTER_UP, 318.0, 10.0), &mut tl);
    assert_eq!(editor.gesture(), Gesture::Idle);

    editor.handle_event(&Event::pointer(event_types::CLICK, 40.0, 10.0), &mut tl);
    assert!(!tl.is_playing());
}
