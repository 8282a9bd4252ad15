//! Track model
//!
//! The editor's view of a [`Timeline`]: one object track per target, followed
//! by one property track per animated property. Property tracks carry keys
//! derived from the engine's animations, and edited keys are written back by
//! regenerating that track's animations.

use keyline_animation::{AnimId, Easing, PropertyAnimation, TargetId, Timeline};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::debug;

new_key_type! {
    pub struct TrackId;
    pub struct KeyId;
}

/// A value at an instant on a property track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Key {
    pub time: f64,
    pub value: f64,
    /// Easing of the segment leaving this key
    pub easing: Easing,
    pub track: TrackId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectTrack {
    pub name: String,
    pub target: TargetId,
    pub property_tracks: SmallVec<[TrackId; 4]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTrack {
    /// `"<object>.<property>"`, the persistence key
    pub id: String,
    pub property: String,
    pub target: TargetId,
    pub parent: TrackId,
    pub anims: Vec<AnimId>,
    /// Sorted by time
    pub keys: Vec<KeyId>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Track {
    Object(ObjectTrack),
    Property(PropertyTrack),
}

impl Track {
    /// Label shown in the track column
    pub fn name(&self) -> &str {
        match self {
            Track::Object(track) => &track.name,
            Track::Property(track) => &track.property,
        }
    }

    pub fn target(&self) -> TargetId {
        match self {
            Track::Object(track) => track.target,
            Track::Property(track) => track.target,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Track::Object(_))
    }

    pub fn as_property(&self) -> Option<&PropertyTrack> {
        match self {
            Track::Property(track) => Some(track),
            Track::Object(_) => None,
        }
    }
}

/// Track and key arenas plus display order
#[derive(Debug, Default)]
pub struct Tracks {
    tracks: SlotMap<TrackId, Track>,
    keys: SlotMap<KeyId, Key>,
    order: Vec<TrackId>,
    auto_names: FxHashMap<TargetId, String>,
    name_counter: u32,
}

impl Tracks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Track ids in display order
    pub fn ids(&self) -> &[TrackId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &Track)> {
        self.order
            .iter()
            .filter_map(|&id| self.tracks.get(id).map(|track| (id, track)))
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn property(&self, id: TrackId) -> Option<&PropertyTrack> {
        self.tracks.get(id)?.as_property()
    }

    /// Track displayed at `row` (0 = first row under the header)
    pub fn at_row(&self, row: usize) -> Option<TrackId> {
        self.order.get(row).copied()
    }

    /// Property track by its `"<object>.<property>"` id
    pub fn find(&self, id: &str) -> Option<TrackId> {
        self.iter()
            .find(|(_, track)| track.as_property().is_some_and(|p| p.id == id))
            .map(|(track_id, _)| track_id)
    }

    pub fn key(&self, id: KeyId) -> Option<&Key> {
        self.keys.get(id)
    }

    pub fn key_mut(&mut self, id: KeyId) -> Option<&mut Key> {
        self.keys.get_mut(id)
    }

    /// Keys of a property track in time order
    pub fn keys_of(&self, track: TrackId) -> impl Iterator<Item = (KeyId, &Key)> {
        self.property(track)
            .map(|p| p.keys.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.keys.get(id).map(|key| (id, key)))
    }

    fn key_values(&self, track: TrackId) -> Vec<Key> {
        self.keys_of(track).map(|(_, key)| *key).collect()
    }

    // ========================================================================
    // Derivation from the engine
    // ========================================================================

    /// Regroup the engine's animations into tracks and derive their keys
    pub fn rebuild(&mut self, timeline: &Timeline) {
        self.tracks.clear();
        self.keys.clear();
        self.order.clear();

        let mut objects: FxHashMap<TargetId, TrackId> = FxHashMap::default();
        let mut properties: FxHashMap<(TargetId, &str), TrackId> = FxHashMap::default();

        for anim in timeline.animations() {
            let object = match objects.get(&anim.target) {
                Some(&id) => id,
                None => {
                    let name = self.object_name(anim);
                    let id = self.tracks.insert(Track::Object(ObjectTrack {
                        name,
                        target: anim.target,
                        property_tracks: SmallVec::new(),
                    }));
                    self.order.push(id);
                    objects.insert(anim.target, id);
                    id
                }
            };

            let track = match properties.get(&(anim.target, anim.property.as_str())) {
                Some(&id) => id,
                None => {
                    let id = self.add_property_track(object, anim);
                    properties.insert((anim.target, anim.property.as_str()), id);
                    id
                }
            };

            if let Some(Track::Property(track)) = self.tracks.get_mut(track) {
                track.anims.push(anim.id);
            }
        }

        let ids = self.order.clone();
        for id in ids {
            self.derive_keys(id, timeline);
        }
        debug!(
            tracks = self.order.len(),
            keys = self.keys.len(),
            "rebuilt tracks"
        );
    }

    /// Chain name, or a stable `Object<n>` for unnamed targets
    fn object_name(&mut self, anim: &PropertyAnimation) -> String {
        if let Some(name) = &anim.target_name {
            return name.clone();
        }
        self.auto_names
            .entry(anim.target)
            .or_insert_with(|| {
                let name = format!("Object{}", self.name_counter);
                self.name_counter += 1;
                name
            })
            .clone()
    }

    /// New property track placed after its object's existing rows
    fn add_property_track(&mut self, object: TrackId, anim: &PropertyAnimation) -> TrackId {
        let parent_name = self
            .tracks
            .get(object)
            .map(|t| t.name().to_string())
            .unwrap_or_default();
        let id = self.tracks.insert(Track::Property(PropertyTrack {
            id: format!("{}.{}", parent_name, anim.property),
            property: anim.property.clone(),
            target: anim.target,
            parent: object,
            anims: Vec::new(),
            keys: Vec::new(),
        }));

        let next_object = self.order.iter().position(|&t| t == object).and_then(|pos| {
            self.order[pos + 1..]
                .iter()
                .position(|&t| self.tracks.get(t).is_some_and(Track::is_object))
                .map(|offset| pos + 1 + offset)
        });
        match next_object {
            Some(pos) => self.order.insert(pos, id),
            None => self.order.push(id),
        }

        if let Some(Track::Object(parent)) = self.tracks.get_mut(object) {
            parent.property_tracks.push(id);
        }
        id
    }

    fn derive_keys(&mut self, track_id: TrackId, timeline: &Timeline) {
        let Some(Track::Property(track)) = self.tracks.get(track_id) else {
            return;
        };
        let anims: Vec<&PropertyAnimation> = track
            .anims
            .iter()
            .filter_map(|&id| timeline.animation(id))
            .collect();

        let mut keys = Vec::with_capacity(anims.len() + 1);
        for (j, anim) in anims.iter().enumerate() {
            if anim.delay != 0.0 && anim.duration() != 0.0 {
                // hold the previous value until the delayed animation starts
                let value = match j {
                    0 => timeline
                        .property(track.target, &track.property)
                        .map_or(anim.start_value, |v| v.as_f64()),
                    _ => anims[j - 1].end_value,
                };
                keys.push(Key {
                    time: anim.start_time,
                    value,
                    easing: anim.easing,
                    track: track_id,
                });
            }

            let easing = match anims.get(j + 1) {
                Some(next) if next.delay == 0.0 => next.easing,
                _ => anim.follow_easing.unwrap_or_default(),
            };
            keys.push(Key {
                time: anim.end_time,
                value: anim.end_value,
                easing,
                track: track_id,
            });
        }

        let ids = keys.into_iter().map(|key| self.keys.insert(key)).collect();
        if let Some(Track::Property(track)) = self.tracks.get_mut(track_id) {
            track.keys = ids;
        }
        self.sort_keys(track_id);
    }

    // ========================================================================
    // Writing back to the engine
    // ========================================================================

    /// Replace the track's animations in `timeline` with ones synthesized
    /// from its keys
    ///
    /// The new animations belong to no chain or group, so `on_start`,
    /// `on_end` and `on_update` callbacks of the source chain no longer fire
    /// for this property.
    pub fn rebuild_anims_from_keys(&mut self, track_id: TrackId, timeline: &mut Timeline) {
        let keys = self.key_values(track_id);
        let Some(Track::Property(track)) = self.tracks.get_mut(track_id) else {
            return;
        };
        for id in track.anims.drain(..) {
            timeline.remove_animation(id);
        }
        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return;
        };

        let target = track.target;
        let property = track.property.clone();
        let parent = track.parent;
        let name = self
            .tracks
            .get(parent)
            .map(|t| t.name().to_string())
            .unwrap_or_default();

        let mut delay = first.time;
        let mut prev = (first.time, first.value, Easing::Linear);
        let mut ids = Vec::with_capacity(keys.len());
        for (j, key) in keys.iter().enumerate() {
            let anim = PropertyAnimation::new(target, property.clone())
                .named(name.clone())
                .span(prev.0, key.time)
                .values(prev.1, key.value)
                .delay(delay)
                .easing(prev.2)
                .follow_easing((j == keys.len() - 1).then_some(last.easing));
            ids.push(timeline.push_animation(anim));
            delay = 0.0;
            prev = (key.time, key.value, key.easing);
        }

        if let Some(Track::Property(track)) = self.tracks.get_mut(track_id) {
            track.anims = ids;
        }
    }

    // ========================================================================
    // Key editing
    // ========================================================================

    /// Restore time order after key times changed
    pub fn sort_keys(&mut self, track_id: TrackId) {
        let keys = &self.keys;
        if let Some(Track::Property(track)) = self.tracks.get_mut(track_id) {
            track.keys.sort_by(|a, b| {
                let ta = keys.get(*a).map_or(0.0, |k| k.time);
                let tb = keys.get(*b).map_or(0.0, |k| k.time);
                ta.total_cmp(&tb)
            });
        }
    }

    /// Add a key at `time` without changing the curve's shape at that instant
    ///
    /// On an empty track the key takes the target's current value. Outside
    /// the existing keys it copies the nearest end key. Between two keys it
    /// takes the value of the segment at `time` and inherits that segment's
    /// easing.
    pub fn insert_key(&mut self, track_id: TrackId, time: f64, timeline: &Timeline) -> Option<KeyId> {
        let track = self.property(track_id)?;
        let current = timeline
            .property(track.target, &track.property)
            .map_or(0.0, |v| v.as_f64());
        let keys = self.key_values(track_id);
        let index = keys
            .iter()
            .position(|k| k.time > time)
            .unwrap_or(keys.len());

        let (value, easing) = match (index.checked_sub(1).map(|i| keys[i]), keys.get(index)) {
            (None, None) => (current, Easing::Linear),
            (None, Some(next)) => (next.value, Easing::Linear),
            (Some(prev), None) => (prev.value, Easing::Linear),
            (Some(prev), Some(next)) => {
                let k = (time - prev.time) / (next.time - prev.time);
                let value = prev.value + (next.value - prev.value) * prev.easing.apply(k);
                (value, prev.easing)
            }
        };

        let id = self.keys.insert(Key {
            time,
            value,
            easing,
            track: track_id,
        });
        if let Some(Track::Property(track)) = self.tracks.get_mut(track_id) {
            track.keys.insert(index, id);
        }
        Some(id)
    }

    pub fn remove_key(&mut self, id: KeyId) -> Option<Key> {
        let key = self.keys.remove(id)?;
        if let Some(Track::Property(track)) = self.tracks.get_mut(key.track) {
            track.keys.retain(|k| *k != id);
        }
        Some(key)
    }

    /// Replace every key of a property track
    pub fn set_keys(
        &mut self,
        track_id: TrackId,
        keys: impl IntoIterator<Item = (f64, f64, Easing)>,
    ) {
        let Some(Track::Property(track)) = self.tracks.get_mut(track_id) else {
            return;
        };
        for old in track.keys.drain(..) {
            self.keys.remove(old);
        }
        let ids: Vec<KeyId> = keys
            .into_iter()
            .map(|(time, value, easing)| {
                self.keys.insert(Key {
                    time,
                    value,
                    easing,
                    track: track_id,
                })
            })
            .collect();
        if let Some(Track::Property(track)) = self.tracks.get_mut(track_id) {
            track.keys = ids;
        }
        self.sort_keys(track_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyline_animation::{PropertyBag, TweenOptions};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn triples(tracks: &Tracks, track: TrackId) -> Vec<(f64, f64, Easing)> {
        tracks
            .keys_of(track)
            .map(|(_, k)| (k.time, k.value, k.easing))
            .collect()
    }

    fn names(tracks: &Tracks) -> Vec<String> {
        tracks
            .iter()
            .map(|(_, t)| match t {
                Track::Object(o) => o.name.clone(),
                Track::Property(p) => p.id.clone(),
            })
            .collect()
    }

    #[test]
    fn property_tracks_follow_their_object() {
        let mut tl = Timeline::new();
        let a = tl.add_target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        let b = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("a"), a).to([("x", 1.0)], TweenOptions::default());
        tl.chain(Some("b"), b).to([("x", 1.0)], TweenOptions::default());
        tl.chain(Some("a"), a).to([("y", 1.0)], TweenOptions::default());

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        assert_eq!(names(&tracks), vec!["a", "a.x", "a.y", "b", "b.x"]);
    }

    #[test]
    fn unnamed_targets_keep_their_names_across_rebuilds() {
        let mut tl = Timeline::new();
        let a = tl.add_target(PropertyBag::new().with("x", 0.0));
        let b = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(None, a).to([("x", 1.0)], TweenOptions::default());
        tl.chain(None, b).to([("x", 1.0)], TweenOptions::default());

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        tracks.rebuild(&tl);
        assert_eq!(
            names(&tracks),
            vec!["Object0", "Object0.x", "Object1", "Object1.x"]
        );
    }

    #[test]
    fn delayed_animation_gets_a_hold_key() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 5.0));
        tl.chain(Some("box"), target)
            .to([("x", 10.0)], TweenOptions::default().easing(Easing::CubicIn))
            .to(
                [("x", 20.0)],
                TweenOptions::default().delay(1.0).easing(Easing::SinusoidalOut),
            )
            .to([("x", 0.0)], TweenOptions::default().easing(Easing::BounceOut));

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        assert_eq!(
            triples(&tracks, track),
            vec![
                // first segment's easing is lost: no key precedes it
                (1.0, 10.0, Easing::Linear),
                (2.0, 10.0, Easing::SinusoidalOut),
                (3.0, 20.0, Easing::BounceOut),
                (4.0, 0.0, Easing::Linear),
            ]
        );
    }

    #[test]
    fn keys_round_trip_through_animations() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("box"), target).to([("x", 1.0)], TweenOptions::default());

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        let keys = vec![
            (0.5, 3.0, Easing::ElasticOut),
            (1.25, -2.0, Easing::Linear),
            (1.25, 4.0, Easing::QuarticInOut),
            (3.0, 8.5, Easing::BackIn),
        ];
        tracks.set_keys(track, keys.clone());
        tracks.rebuild_anims_from_keys(track, &mut tl);

        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        assert_eq!(triples(&tracks, track), keys);
    }

    #[test]
    fn single_key_round_trips() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("box"), target).to([("x", 1.0)], TweenOptions::default());

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        tracks.set_keys(track, [(2.0, 7.0, Easing::CircularIn)]);
        tracks.rebuild_anims_from_keys(track, &mut tl);
        assert_eq!(tl.animations().len(), 1);

        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        assert_eq!(triples(&tracks, track), vec![(2.0, 7.0, Easing::CircularIn)]);
    }

    #[test]
    fn rebuilt_animations_leave_their_chain() {
        let updates = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&updates);
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("box"), target)
            .to([("x", 1.0)], TweenOptions::default())
            .on_update(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        tl.tick(Some(0.25));
        assert_eq!(updates.load(Ordering::SeqCst), 1);

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        tracks.set_keys(track, [(0.0, 0.0, Easing::Linear), (1.0, 1.0, Easing::Linear)]);
        tracks.rebuild_anims_from_keys(track, &mut tl);
        assert!(tl.animations().iter().all(|a| a.chain.is_none() && a.group.is_none()));

        tl.tick(Some(0.25));
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(tl.property(target, "x").map(|v| v.as_f64()), Some(0.5));
    }

    #[test]
    fn clearing_keys_removes_animations() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("box"), target)
            .to([("x", 1.0)], TweenOptions::default())
            .to([("x", 2.0)], TweenOptions::default());

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        tracks.set_keys(track, []);
        tracks.rebuild_anims_from_keys(track, &mut tl);
        assert!(tl.animations().is_empty());
        assert!(tracks.property(track).unwrap().anims.is_empty());
    }

    #[test]
    fn insert_between_keys_follows_curve() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("box"), target).to([("x", 1.0)], TweenOptions::default());
        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        tracks.set_keys(
            track,
            [(1.0, 0.0, Easing::QuadraticIn), (3.0, 100.0, Easing::Linear)],
        );

        let id = tracks.insert_key(track, 1.5, &tl).unwrap();
        let key = *tracks.key(id).unwrap();
        assert_eq!(key.value, 100.0 * Easing::QuadraticIn.apply(0.25));
        assert_eq!(key.easing, Easing::QuadraticIn);
        let times: Vec<f64> = triples(&tracks, track).iter().map(|k| k.0).collect();
        assert_eq!(times, vec![1.0, 1.5, 3.0]);
    }

    #[test]
    fn insert_outside_copies_nearest_value() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 42.0));
        tl.chain(Some("box"), target).to([("x", 1.0)], TweenOptions::default());
        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();

        tracks.set_keys(track, []);
        let first = tracks.insert_key(track, 2.0, &tl).unwrap();
        assert_eq!(tracks.key(first).unwrap().value, 42.0);

        tracks.key_mut(first).unwrap().value = 7.0;
        let before = tracks.insert_key(track, 0.5, &tl).unwrap();
        let after = tracks.insert_key(track, 4.0, &tl).unwrap();
        assert_eq!(tracks.key(before).unwrap().value, 7.0);
        assert_eq!(tracks.key(after).unwrap().value, 7.0);
        let times: Vec<f64> = triples(&tracks, track).iter().map(|k| k.0).collect();
        assert_eq!(times, vec![0.5, 2.0, 4.0]);
    }

    #[test]
    fn remove_key_detaches_from_track() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("box"), target)
            .to([("x", 1.0)], TweenOptions::default())
            .to([("x", 2.0)], TweenOptions::default());
        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        let track = tracks.find("box.x").unwrap();
        let (first, _) = tracks.keys_of(track).next().unwrap();

        assert_eq!(tracks.remove_key(first).map(|k| k.time), Some(1.0));
        assert_eq!(tracks.keys_of(track).count(), 1);
        assert!(tracks.remove_key(first).is_none());
    }
}
