//! Interactive timeline editor
//!
//! [`Editor`] owns the editor-side state (tracks, view, selection, the
//! current gesture) and operates on a [`Timeline`] handed in by the host on
//! every call. Edits are written back to the engine immediately and persisted
//! through the [`KeyValueStore`].

use keyline_animation::Timeline;
use keyline_core::events::event_types;
use keyline_core::{Event, EventData, KeyValueStore, MemoryStore};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::EditorError;
use crate::export::export_code;
use crate::form::KeyEditForm;
use crate::gesture::{region_at, Gesture, Region};
use crate::layout::{EditorLayout, Transport};
use crate::marquee::Marquee;
use crate::persist::{self, LoadOutcome};
use crate::selection::Selection;
use crate::track::{KeyId, TrackId, Tracks};
use crate::view::{self, TimeAxis, ViewState};

/// Surface width assumed until the host reports one
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Something the host has to show or ask the user for
#[derive(Clone, Debug, PartialEq)]
pub enum EditorRequest {
    /// Ask for an `h:m:s` timecode and pass it to [`Editor::submit_timecode`]
    PromptTimecode,
    /// Show the key edit form ([`Editor::form`]) at `anchor`
    OpenKeyForm { anchor: (f64, f64) },
    /// Show generated builder source
    ShowExport(String),
}

pub struct Editor<S: KeyValueStore = MemoryStore> {
    layout: EditorLayout,
    view: ViewState,
    store: S,
    timeline_name: String,
    tracks: Tracks,
    selection: Selection,
    gesture: Gesture,
    marquee: Marquee,
    form: Option<KeyEditForm>,
    requests: SmallVec<[EditorRequest; 2]>,
    /// Set once selected keys have moved since the last press
    keys_dragged: bool,
    seen_revision: u64,
}

impl<S: KeyValueStore> Editor<S> {
    /// Build tracks from `timeline` and apply any saved keys and settings
    pub fn new(layout: EditorLayout, store: S, timeline: &mut Timeline) -> Self {
        let view = ViewState::new(DEFAULT_WIDTH, layout.panel_height);
        let mut editor = Self {
            layout,
            view,
            store,
            timeline_name: timeline.name().to_string(),
            tracks: Tracks::new(),
            selection: Selection::default(),
            gesture: Gesture::Idle,
            marquee: Marquee::default(),
            form: None,
            requests: SmallVec::new(),
            keys_dragged: false,
            seen_revision: timeline.revision(),
        };
        editor.tracks.rebuild(timeline);
        editor.load(timeline);
        editor
    }

    pub fn layout(&self) -> &EditorLayout {
        &self.layout
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Open key edit form, if any
    pub fn form(&self) -> Option<&KeyEditForm> {
        self.form.as_ref()
    }

    /// Form fields for the host's input widgets to write into
    pub fn form_mut(&mut self) -> Option<&mut KeyEditForm> {
        self.form.as_mut()
    }

    /// Drain pending host requests
    pub fn take_requests(&mut self) -> SmallVec<[EditorRequest; 2]> {
        std::mem::take(&mut self.requests)
    }

    pub(crate) fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn set_width(&mut self, width: f64) {
        self.view.width = width;
    }

    /// Pick up animations added through the builder since the last sync
    ///
    /// Tracks are rebuilt from the engine and saved keys are reapplied, so
    /// edits survive new chains being declared.
    pub fn sync(&mut self, timeline: &mut Timeline) {
        if timeline.revision() == self.seen_revision {
            return;
        }
        debug!(revision = timeline.revision(), "timeline changed, rebuilding tracks");
        self.seen_revision = timeline.revision();
        self.selection.clear();
        self.marquee.cancel();
        self.form = None;
        self.gesture = Gesture::Idle;
        self.tracks.rebuild(timeline);
        self.load(timeline);
    }

    pub fn time_axis(&self, timeline: &Timeline) -> TimeAxis {
        TimeAxis::new(&self.layout, &self.view, timeline.animation_end())
    }

    /// Property track under surface y
    pub fn track_at(&self, y: f64) -> Option<TrackId> {
        let row = view::row_at(&self.layout, &self.view, self.tracks.len(), y);
        let id = self.tracks.at_row(usize::try_from(row).ok()?)?;
        self.tracks.property(id).map(|_| id)
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Dispatch a host event
    pub fn handle_event(&mut self, event: &Event, timeline: &mut Timeline) {
        if let EventData::Resize { width, .. } = event.data {
            self.set_width(width as f64);
            return;
        }
        let Some((x, y)) = event.position() else {
            return;
        };
        let (x, y) = (x as f64, y as f64);
        match event.event_type {
            event_types::POINTER_DOWN => self.pointer_down(x, y, timeline),
            event_types::POINTER_MOVE => self.pointer_move(x, y, timeline),
            event_types::POINTER_UP => self.pointer_up(x, y, timeline),
            event_types::CLICK => self.click(x, y, timeline),
            event_types::DOUBLE_CLICK => self.double_click(x, y, timeline),
            _ => {}
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, timeline: &mut Timeline) {
        self.selection.clear();
        self.gesture = Gesture::Idle;

        match region_at(&self.layout, &self.view, x, y) {
            Region::Ruler => {
                self.gesture = Gesture::DraggingPlayhead;
                self.scrub(x, timeline);
            }
            Region::TracksScrollbar => {
                let bar = view::tracks_scrollbar(&self.layout, &self.view, self.tracks.len());
                let top = self.layout.header_height + self.view.tracks_thumb_pos;
                if y >= top && y <= top + bar.thumb {
                    self.gesture = Gesture::DraggingTracksScrollbar { grab: y - top };
                }
            }
            Region::KeyArea => {
                self.keys_dragged = false;
                self.select_key_at(x, y, timeline);
                if self.selection.is_empty() {
                    let min = (self.layout.label_width, self.layout.header_height);
                    self.marquee.begin(x, y, min);
                    self.gesture = Gesture::DrawingMarquee;
                } else {
                    self.gesture = Gesture::DraggingKeys;
                }
            }
            Region::ZoomStrip => {
                self.gesture = Gesture::DraggingZoomHandle;
                self.zoom_to(x);
            }
            Region::TimeScrollbar => {
                let bar = view::time_scrollbar(&self.layout, &self.view, timeline.animation_end());
                let left = self.layout.label_width + self.view.time_thumb_pos;
                if x >= left && x <= left + bar.thumb {
                    self.gesture = Gesture::DraggingTimeScrollbar { grab: x - left };
                }
            }
            Region::Outside => {}
        }
        debug!(gesture = ?self.gesture, x, y, "pointer down");
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, timeline: &mut Timeline) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::DraggingPlayhead => self.scrub(x, timeline),
            Gesture::DraggingTracksScrollbar { grab } => {
                let bar = view::tracks_scrollbar(&self.layout, &self.view, self.tracks.len());
                let (pos, fraction) = bar.place(y - self.layout.header_height - grab);
                self.view.tracks_thumb_pos = pos;
                self.view.tracks_scroll = fraction;
            }
            Gesture::DraggingTimeScrollbar { grab } => {
                let bar = view::time_scrollbar(&self.layout, &self.view, timeline.animation_end());
                let (pos, fraction) = bar.place(x - self.layout.label_width - grab);
                self.view.time_thumb_pos = pos;
                self.view.time_scroll = fraction;
            }
            Gesture::DraggingZoomHandle => self.zoom_to(x),
            Gesture::DraggingKeys => self.drag_keys(x, timeline),
            Gesture::DrawingMarquee => self.marquee.update(x, y),
        }
    }

    pub fn pointer_up(&mut self, x: f64, _y: f64, timeline: &mut Timeline) {
        if self.gesture == Gesture::DrawingMarquee {
            if let Some(bounds) = self.marquee.take_bounds() {
                self.select_keys_in(bounds, x, timeline);
            }
        }
        self.gesture = self.gesture.released();
        debug!(gesture = ?self.gesture, selected = self.selection.len(), "pointer up");
    }

    /// Transport buttons
    pub fn click(&mut self, x: f64, y: f64, timeline: &mut Timeline) {
        let Some(button) = self.layout.transport_at(x, y) else {
            return;
        };
        debug!(?button, "transport");
        match button {
            Transport::Play => timeline.play(),
            Transport::Pause => timeline.pause(),
            Transport::Stop => timeline.stop(),
            Transport::Export => {
                let code = self.export(timeline);
                self.requests.push(EditorRequest::ShowExport(code));
            }
        }
    }

    /// Open the form on a single selected key, ask for a timecode on the
    /// ruler, or insert a key in an empty cell
    pub fn double_click(&mut self, x: f64, y: f64, timeline: &mut Timeline) {
        match self.selection.len() {
            0 => match region_at(&self.layout, &self.view, x, y) {
                Region::Ruler => self.requests.push(EditorRequest::PromptTimecode),
                Region::KeyArea => {
                    self.insert_key_at(x, y, timeline);
                }
                _ => {}
            },
            1 if !self.keys_dragged => self.open_key_form((x, y)),
            _ => {}
        }
    }

    fn scrub(&mut self, x: f64, timeline: &mut Timeline) {
        let time = self.time_axis(timeline).px_to_time(x);
        timeline.seek(time.min(timeline.animation_end()).max(0.0));
    }

    fn zoom_to(&mut self, x: f64) {
        let width = self.layout.label_width;
        self.set_time_scale((width - x) / width);
    }

    fn drag_keys(&mut self, x: f64, timeline: &mut Timeline) {
        if self.selection.is_empty() {
            return;
        }
        let axis = self.time_axis(timeline);
        let mut touched: SmallVec<[TrackId; 4]> = SmallVec::new();
        for id in self.selection.iter() {
            let offset = self.selection.offset(id);
            if let Some(key) = self.tracks.key_mut(id) {
                key.time = axis.px_to_time(x + offset).max(0.0);
                if !touched.contains(&key.track) {
                    touched.push(key.track);
                }
            }
        }
        self.keys_dragged = true;
        self.write_back(&touched, timeline);
    }

    fn select_key_at(&mut self, x: f64, y: f64, timeline: &Timeline) {
        self.selection.clear();
        let Some(track) = self.track_at(y) else {
            return;
        };
        let axis = self.time_axis(timeline);
        let radius = self.layout.key_hit_radius();
        let hit = self.tracks.keys_of(track).find_map(|(id, key)| {
            let kx = axis.time_to_px(key.time);
            (kx >= x - radius && kx <= x + radius).then_some((id, kx))
        });
        if let Some((id, kx)) = hit {
            self.selection.set_single(id, kx - x);
        }
    }

    /// Select every key inside the marquee, offsets relative to `release_x`
    fn select_keys_in(&mut self, bounds: (f64, f64, f64, f64), release_x: f64, timeline: &Timeline) {
        let (x0, y0, x1, y1) = bounds;
        let count = self.tracks.len();
        let first = view::row_at(&self.layout, &self.view, count, y0);
        let last = view::row_at(&self.layout, &self.view, count, y1);
        let axis = self.time_axis(timeline);
        let radius = self.layout.key_hit_radius();

        self.selection.clear();
        for (row, (track, _)) in self.tracks.iter().enumerate() {
            let row = row as i64;
            if row < first || row > last {
                continue;
            }
            for (id, key) in self.tracks.keys_of(track) {
                let kx = axis.time_to_px(key.time);
                if kx >= x0 - radius && kx <= x1 + radius {
                    self.selection.insert(id, kx - release_x);
                }
            }
        }
    }

    // ========================================================================
    // Key editing
    // ========================================================================

    /// Insert a key on the property track under `(x, y)` and select it
    pub fn insert_key_at(&mut self, x: f64, y: f64, timeline: &mut Timeline) -> Option<KeyId> {
        let track = self.track_at(y)?;
        let time = self.time_axis(timeline).px_to_time(x);
        let id = self.tracks.insert_key(track, time, timeline)?;
        debug!(time, track = ?track, "inserted key");
        self.selection.set_single(id, 0.0);
        self.gesture = Gesture::Idle;
        self.write_back(&[track], timeline);
        Some(id)
    }

    /// Open the edit form for the first selected key
    pub fn open_key_form(&mut self, anchor: (f64, f64)) {
        let Some(key) = self.selection.first().and_then(|id| self.tracks.key(id)) else {
            return;
        };
        self.form = Some(KeyEditForm::for_key(key, anchor));
        self.requests.push(EditorRequest::OpenKeyForm { anchor });
    }

    /// Apply the form to every selected key
    ///
    /// Malformed input leaves keys and form untouched.
    pub fn confirm_key_form(&mut self, timeline: &mut Timeline) -> Result<(), EditorError> {
        let form = self.form.as_ref().ok_or(EditorError::NoOpenForm)?;
        let edit = form.parse().map_err(|err| {
            warn!(%err, "rejected key edit");
            err
        })?;

        let mut touched: SmallVec<[TrackId; 4]> = SmallVec::new();
        for id in self.selection.iter() {
            if let Some(key) = self.tracks.key_mut(id) {
                key.value = edit.value;
                key.time = edit.time;
                key.easing = edit.easing;
                if !touched.contains(&key.track) {
                    touched.push(key.track);
                }
            }
        }
        self.form = None;
        self.write_back(&touched, timeline);
        Ok(())
    }

    pub fn cancel_key_form(&mut self) {
        self.form = None;
    }

    /// Delete the selected keys from the form
    pub fn delete_from_form(&mut self, timeline: &mut Timeline) {
        self.form = None;
        self.delete_selected(timeline);
    }

    pub fn delete_selected(&mut self, timeline: &mut Timeline) {
        let mut touched: SmallVec<[TrackId; 4]> = SmallVec::new();
        let ids: SmallVec<[KeyId; 8]> = self.selection.iter().collect();
        for id in ids {
            if let Some(key) = self.tracks.remove_key(id) {
                if !touched.contains(&key.track) {
                    touched.push(key.track);
                }
            }
        }
        self.selection.clear();
        if !touched.is_empty() {
            debug!(tracks = touched.len(), "deleted keys");
            self.write_back(&touched, timeline);
        }
    }

    /// Re-sort keys, regenerate the tracks' animations and save
    fn write_back(&mut self, tracks: &[TrackId], timeline: &mut Timeline) {
        for &track in tracks {
            self.tracks.sort_keys(track);
            self.tracks.rebuild_anims_from_keys(track, timeline);
        }
        self.persist();
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Jump to an `h:m:s` timecode, setting both clocks
    pub fn submit_timecode(&mut self, input: &str, timeline: &mut Timeline) -> Result<(), EditorError> {
        let seconds = crate::timecode::parse_timecode(input)?;
        timeline.set_clock(seconds);
        Ok(())
    }

    /// Resize the panel; vertical scroll starts over
    pub fn set_panel_height(&mut self, height: f64) {
        self.view.height = height.max(0.0);
        self.view.tracks_scroll = 0.0;
        self.view.tracks_thumb_pos = 0.0;
        self.persist();
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.view.time_scale = ViewState::clamp_time_scale(scale);
        self.persist();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write keys and view settings to the store
    pub fn save(&mut self) -> Result<(), EditorError> {
        let data = persist::collect(&self.tracks);
        persist::write_tracks(&mut self.store, &self.timeline_name, &data)?;
        persist::write_settings(&mut self.store, self.view.height, self.view.time_scale)?;
        debug!(tracks = data.len(), timeline = %self.timeline_name, "saved editor state");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(err) = self.save() {
            warn!(%err, "failed to save editor state");
        }
    }

    /// Apply saved settings, then replace the keys of every saved track
    pub fn load(&mut self, timeline: &mut Timeline) -> LoadOutcome {
        let settings = persist::read_settings(&self.store);
        if let Some(height) = settings.panel_height {
            self.view.height = height;
        }
        if let Some(scale) = settings.time_scale {
            self.view.time_scale = ViewState::clamp_time_scale(scale);
        }

        let Some(data) = persist::read_tracks(&self.store, &self.timeline_name) else {
            debug!(timeline = %self.timeline_name, "no saved keys");
            return LoadOutcome::NoSavedState;
        };
        let mut loaded = 0;
        let ids: Vec<TrackId> = self.tracks.ids().to_vec();
        for id in ids {
            let Some(saved) = self.tracks.property(id).and_then(|p| data.get(&p.id)) else {
                continue;
            };
            let keys: Vec<_> = saved.iter().map(|k| (k.time, k.value, k.easing)).collect();
            self.tracks.set_keys(id, keys);
            self.tracks.rebuild_anims_from_keys(id, timeline);
            loaded += 1;
        }
        debug!(tracks = loaded, timeline = %self.timeline_name, "loaded saved keys");
        LoadOutcome::Loaded { tracks: loaded }
    }

    /// Forget saved keys for this timeline; settings are kept
    pub fn clear_saved(&mut self) -> Result<(), EditorError> {
        self.store.remove(&persist::data_key(&self.timeline_name))?;
        debug!(timeline = %self.timeline_name, "cleared saved keys");
        Ok(())
    }

    /// Builder source reproducing the current tracks
    pub fn export(&self, timeline: &Timeline) -> String {
        export_code(&self.tracks, timeline)
    }
}
