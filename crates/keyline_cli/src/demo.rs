//! Demo scene and the process-wide timeline

use std::sync::{Mutex, OnceLock};

use anyhow::{Context, Result};
use keyline_animation::{Easing, PropertyBag, TargetId, Timeline, TweenOptions};
use tracing::info;

use crate::config::SceneConfig;

/// Properties of the demo box and the value each one pulses away from
const PULSES: [(&str, f64, f64); 7] = [
    ("x", 50.0, 400.0),
    ("y", 50.0, 400.0),
    ("angle", 0.0, 360.0),
    ("scale", 1.0, 0.4),
    ("opacity", 1.0, 0.4),
    ("hue", 1.0, 180.0),
    ("rounded", 0.0, 50.0),
];

static GLOBAL: OnceLock<Mutex<Timeline>> = OnceLock::new();

/// The default timeline, created on first use
pub fn global_timeline() -> &'static Mutex<Timeline> {
    GLOBAL.get_or_init(|| Mutex::new(Timeline::new()))
}

/// One `box` target pulsing every property out and back over two seconds
///
/// Properties start at zero unless `scene.initial` gives a textual value; the
/// unit of that value is kept while animating.
pub fn build_scene(timeline: &mut Timeline, scene: &SceneConfig) -> Result<TargetId> {
    let mut props = PropertyBag::new();
    for (name, _, _) in PULSES {
        props.insert(name, 0.0);
    }
    for (name, text) in &scene.initial {
        props
            .insert_text(name.as_str(), text)
            .with_context(|| format!("Invalid starting value for {name}"))?;
    }
    let target = timeline.add_target(props);

    for (name, rest, peak) in PULSES {
        let chain = timeline
            .chain(Some("box"), target)
            .to([(name, rest)], TweenOptions::default().duration(0.0))
            .to([(name, peak)], TweenOptions::default().easing(Easing::CubicIn))
            .to([(name, rest)], TweenOptions::default().easing(Easing::CubicOut));
        if name == "x" {
            chain
                .on_start(|| info!("box starts heading back"))
                .on_end(|| info!("box is back home"));
        }
    }
    Ok(target)
}

/// Names of the animated properties, in scene order
pub fn scene_properties() -> impl Iterator<Item = &'static str> {
    PULSES.into_iter().map(|(name, _, _)| name)
}
