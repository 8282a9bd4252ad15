//! Builder for sequential tweens on one target

use crate::easing::Easing;
use crate::timeline::{ChainId, GroupRecord, PropertyAnimation, Timeline};

/// Timing of one `to` step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenOptions {
    /// Seconds to wait after the previous step ends
    pub delay: f64,
    pub duration: f64,
    pub easing: Easing,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            delay: 0.0,
            duration: 1.0,
            easing: Easing::Linear,
        }
    }
}

impl TweenOptions {
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// A sequence of tweens on one target
///
/// ```
/// use keyline_animation::{Easing, PropertyBag, Timeline, TweenOptions};
///
/// let mut timeline = Timeline::new();
/// let ball = timeline.add_target(PropertyBag::new().with("y", 0.0));
/// timeline
///     .chain(Some("ball"), ball)
///     .to([("y", 100.0)], TweenOptions::default().easing(Easing::BounceOut))
///     .to([("y", 0.0)], TweenOptions::default().delay(0.5).duration(0.25));
///
/// assert_eq!(timeline.animation_end(), 1.75);
/// ```
pub struct Chain<'a> {
    timeline: &'a mut Timeline,
    id: ChainId,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(timeline: &'a mut Timeline, id: ChainId) -> Self {
        Self { timeline, id }
    }

    /// Append one step animating each property to its end value
    pub fn to<I, K>(self, properties: I, options: TweenOptions) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let now = self.timeline.time();
        let group = self.timeline.groups.insert(GroupRecord::default());
        let Some(record) = self.timeline.chains.get_mut(self.id) else {
            return self;
        };
        let start_time = now + record.end_time + options.delay;
        let end_time = start_time + options.duration;
        let target = record.target;
        let name = record.name.clone();
        record.groups.push(group);
        record.end_time += options.delay + options.duration;

        for (property, end_value) in properties {
            let mut anim = PropertyAnimation::new(target, property)
                .span(start_time, end_time)
                .values(0.0, end_value)
                .delay(options.delay)
                .easing(options.easing);
            anim.target_name = name.clone();
            anim.chain = Some(self.id);
            anim.group = Some(group);
            self.timeline.push_animation(anim);
        }
        self.timeline.bump_revision();
        self
    }

    fn last_group(&mut self) -> Option<&mut GroupRecord> {
        let group = *self.timeline.chains.get(self.id)?.groups.last()?;
        self.timeline.groups.get_mut(group)
    }

    /// Fire `callback` once, when the first animation of the latest step starts
    pub fn on_start(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        if let Some(group) = self.last_group() {
            group.on_start = Some(Box::new(callback));
        }
        self
    }

    /// Fire `callback` once, when the first animation of the latest step ends
    pub fn on_end(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        if let Some(group) = self.last_group() {
            group.on_end = Some(Box::new(callback));
        }
        self
    }

    /// Observe every value this chain writes
    pub fn on_update(self, callback: impl FnMut(&str, f64) + Send + 'static) -> Self {
        if let Some(record) = self.timeline.chains.get_mut(self.id) {
            record.on_update = Some(Box::new(callback));
        }
        self
    }
}
