//! The tween engine
//!
//! A [`Timeline`] owns a flat, ordered list of [`PropertyAnimation`]s plus the
//! targets they write to. Each [`Timeline::tick`] advances the clock, applies
//! the loop policy and then interpolates every active animation onto its
//! target.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::chain::Chain;
use crate::easing::Easing;
use crate::value::{Animatable, PropertyValue, ValueKind};

new_key_type! {
    /// Handle to an object registered with [`Timeline::add_target`]
    pub struct TargetId;
    /// Handle to the record behind a [`Chain`]
    pub struct ChainId;
    /// Handle to the animations created by one `to` call
    pub struct GroupId;
}

/// Stable identifier of a [`PropertyAnimation`], assigned when it is pushed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimId(u64);

/// Once-only lifecycle callback
pub type Callback = Box<dyn FnMut() + Send>;

/// Per-tick update callback receiving the property name and its new value
pub type UpdateCallback = Box<dyn FnMut(&str, f64) + Send>;

/// What happens when the clock passes the end of the last animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Rewind forever
    Infinite,
    /// Keep the clock running; finished animations are dropped
    #[default]
    Continue,
    /// Rewind while fewer than `n` loops have been played, then stop
    Count(u32),
}

impl LoopMode {
    /// Whether another rewind is allowed after `loops_done` rewinds
    pub fn permits_rewind(&self, loops_done: u32) -> bool {
        match *self {
            LoopMode::Infinite => true,
            LoopMode::Continue => false,
            LoopMode::Count(n) => loops_done < n,
        }
    }
}

impl From<i32> for LoopMode {
    /// `-1` (or any negative) is infinite, `0` continues, `n` loops `n` times
    fn from(n: i32) -> Self {
        match n {
            0 => LoopMode::Continue,
            n if n < 0 => LoopMode::Infinite,
            n => LoopMode::Count(n.unsigned_abs()),
        }
    }
}

impl From<LoopMode> for i32 {
    fn from(mode: LoopMode) -> Self {
        match mode {
            LoopMode::Infinite => -1,
            LoopMode::Continue => 0,
            LoopMode::Count(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }
}

/// One property of one target moving from a start value to an end value
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyAnimation {
    pub id: AnimId,
    pub target: TargetId,
    pub target_name: Option<String>,
    pub property: String,
    /// Captured from the target when the animation starts
    pub start_value: f64,
    pub end_value: f64,
    /// Unit shape seen when the start value was captured
    pub kind: ValueKind,
    pub delay: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub easing: Easing,
    /// Easing of the key terminating this animation when nothing follows it
    pub follow_easing: Option<Easing>,
    pub has_started: bool,
    pub has_ended: bool,
    pub chain: Option<ChainId>,
    pub group: Option<GroupId>,
}

impl PropertyAnimation {
    /// A zero-length linear animation of `property` towards `0.0`
    pub fn new(target: TargetId, property: impl Into<String>) -> Self {
        Self {
            id: AnimId::default(),
            target,
            target_name: None,
            property: property.into(),
            start_value: 0.0,
            end_value: 0.0,
            kind: ValueKind::Number,
            delay: 0.0,
            start_time: 0.0,
            end_time: 0.0,
            easing: Easing::Linear,
            follow_easing: None,
            has_started: false,
            has_ended: false,
            chain: None,
            group: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    pub fn span(mut self, start_time: f64, end_time: f64) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn values(mut self, start_value: f64, end_value: f64) -> Self {
        self.start_value = start_value;
        self.end_value = end_value;
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn follow_easing(mut self, easing: Option<Easing>) -> Self {
        self.follow_easing = easing;
        self
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Linear progress at `time`, clamped to `[0, 1]`; `1` for zero-length spans
    pub fn progress(&self, time: f64) -> f64 {
        let duration = self.duration();
        if duration == 0.0 {
            return 1.0;
        }
        ((time - self.start_time) / duration).clamp(0.0, 1.0)
    }

    /// Interpolated value for linear progress `t`
    pub fn value_at(&self, t: f64) -> f64 {
        self.start_value + (self.end_value - self.start_value) * self.easing.apply(t)
    }
}

pub(crate) struct ChainRecord {
    pub(crate) name: Option<String>,
    pub(crate) target: TargetId,
    /// Cumulative delay plus duration of every `to` call so far
    pub(crate) end_time: f64,
    pub(crate) groups: SmallVec<[GroupId; 4]>,
    pub(crate) on_update: Option<UpdateCallback>,
}

#[derive(Default)]
pub(crate) struct GroupRecord {
    pub(crate) on_start: Option<Callback>,
    pub(crate) on_end: Option<Callback>,
}

/// Animation engine
pub struct Timeline {
    name: String,
    anims: Vec<PropertyAnimation>,
    targets: SlotMap<TargetId, Box<dyn Animatable>>,
    pub(crate) chains: SlotMap<ChainId, ChainRecord>,
    pub(crate) groups: SlotMap<GroupId, GroupRecord>,
    time: f64,
    total_time: f64,
    loop_count: u32,
    loop_mode: LoopMode,
    playing: bool,
    fps: f64,
    revision: u64,
    next_anim_id: u64,
}

impl Timeline {
    pub const DEFAULT_NAME: &'static str = "Global";
    pub const DEFAULT_FPS: f64 = 30.0;

    pub fn new() -> Self {
        Self::with_name(Self::DEFAULT_NAME)
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anims: Vec::new(),
            targets: SlotMap::with_key(),
            chains: SlotMap::with_key(),
            groups: SlotMap::with_key(),
            time: 0.0,
            total_time: 0.0,
            loop_count: 0,
            loop_mode: LoopMode::Continue,
            playing: true,
            fps: Self::DEFAULT_FPS,
            revision: 0,
            next_anim_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Targets
    // ========================================================================

    /// Register an object whose properties animations will write to
    pub fn add_target(&mut self, object: impl Animatable + 'static) -> TargetId {
        self.targets.insert(Box::new(object))
    }

    pub fn target(&self, id: TargetId) -> Option<&dyn Animatable> {
        self.targets.get(id).map(|t| t.as_ref())
    }

    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut (dyn Animatable + 'static)> {
        self.targets.get_mut(id).map(|t| t.as_mut())
    }

    /// Current value of a target property
    pub fn property(&self, target: TargetId, name: &str) -> Option<PropertyValue> {
        self.targets.get(target)?.get_property(name)
    }

    // ========================================================================
    // Chains and animations
    // ========================================================================

    /// Start a new chain of tweens on `target`
    pub fn chain(&mut self, name: Option<&str>, target: TargetId) -> Chain<'_> {
        let id = self.chains.insert(ChainRecord {
            name: name.map(str::to_string),
            target,
            end_time: 0.0,
            groups: SmallVec::new(),
            on_update: None,
        });
        Chain::new(self, id)
    }

    pub fn animations(&self) -> &[PropertyAnimation] {
        &self.anims
    }

    pub fn animation(&self, id: AnimId) -> Option<&PropertyAnimation> {
        self.anims.iter().find(|a| a.id == id)
    }

    /// Append an animation, assigning it a fresh id
    pub fn push_animation(&mut self, mut anim: PropertyAnimation) -> AnimId {
        let id = AnimId(self.next_anim_id);
        self.next_anim_id += 1;
        anim.id = id;
        self.anims.push(anim);
        id
    }

    pub fn remove_animation(&mut self, id: AnimId) -> Option<PropertyAnimation> {
        let index = self.anims.iter().position(|a| a.id == id)?;
        Some(self.anims.remove(index))
    }

    /// Bumped whenever a chain appends animations
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }

    /// Largest end time over all animations, `0` when there are none
    pub fn animation_end(&self) -> f64 {
        self.anims.iter().fold(0.0, |end, a| a.end_time.max(end))
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: f64) {
        if fps > 0.0 {
            self.fps = fps;
        }
    }

    pub fn loop_mode(&mut self, mode: impl Into<LoopMode>) {
        self.loop_mode = mode.into();
    }

    pub fn current_loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Pause and rewind to zero
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    pub fn seek(&mut self, time: f64) {
        self.time = time;
    }

    /// Move both the loop clock and the total clock to `seconds`
    pub fn set_clock(&mut self, seconds: f64) {
        self.time = seconds;
        self.total_time = seconds;
    }

    /// Advance by `dt` seconds (`None` or zero means one frame at `fps`)
    pub fn tick(&mut self, dt: Option<f64>) {
        let dt = match dt {
            Some(dt) if dt != 0.0 => dt,
            _ => 1.0 / self.fps,
        };

        if self.playing {
            self.time += dt;
            self.total_time += dt;
        }

        if self.loop_mode != LoopMode::Continue {
            let end = self.animation_end();
            if self.time > end {
                if self.loop_mode.permits_rewind(self.loop_count) {
                    self.time = 0.0;
                    self.loop_count += 1;
                    for anim in &mut self.anims {
                        anim.has_started = false;
                        anim.has_ended = false;
                    }
                    debug!(timeline = %self.name, loop_count = self.loop_count, "loop rewind");
                } else if self.playing {
                    self.playing = false;
                    debug!(timeline = %self.name, "loop budget exhausted, stopping");
                }
            }
        }

        trace!(time = self.time, active = self.anims.len(), "tick");
        self.apply_values();
    }

    /// Interpolate every started, unfinished animation onto its target
    fn apply_values(&mut self) {
        let time = self.time;
        let mut i = 0;
        while i < self.anims.len() {
            let anim = &mut self.anims[i];
            if time < anim.start_time || anim.has_ended {
                i += 1;
                continue;
            }
            let Some(target) = self.targets.get_mut(anim.target) else {
                i += 1;
                continue;
            };

            if !anim.has_started {
                match target.get_property(&anim.property) {
                    Some(current) => {
                        anim.start_value = current.as_f64();
                        anim.kind = current.kind();
                    }
                    None => {
                        anim.start_value = f64::NAN;
                        anim.kind = ValueKind::Number;
                    }
                }
                anim.has_started = true;
                if let Some(group) = anim.group.and_then(|g| self.groups.get_mut(g)) {
                    if let Some(mut on_start) = group.on_start.take() {
                        on_start();
                    }
                }
            }

            let t = anim.progress(time);
            let value = anim.value_at(t);
            target.set_property(&anim.property, anim.kind.with_value(value));

            if let Some(on_update) = anim
                .chain
                .and_then(|c| self.chains.get_mut(c))
                .and_then(|c| c.on_update.as_mut())
            {
                on_update(&anim.property, value);
            }

            if time >= anim.end_time {
                anim.has_ended = true;
                if let Some(group) = anim.group.and_then(|g| self.groups.get_mut(g)) {
                    if let Some(mut on_end) = group.on_end.take() {
                        on_end();
                    }
                }
            }

            // Linear t; every easing maps 1 to exactly 1
            if t == 1.0 && self.loop_mode == LoopMode::Continue {
                let done = self.anims.remove(i);
                debug!(property = %done.property, id = ?done.id, "animation finished, removed");
                continue;
            }
            i += 1;
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
