//! Easing functions for animations
//!
//! A fixed catalog of families × {EaseIn, EaseOut, EaseInOut}. Every member
//! maps `0 → 0` and `1 → 1`; elastic and back overshoot in between.
//!
//! Each easing has a canonical dotted name (`"Cubic.EaseIn"`) used for
//! persistence. Linear has a single member, `Linear.EaseNone`; the names
//! `Linear.EaseIn`, `Linear.EaseOut` and `Linear.EaseInOut` parse to it.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuarticIn,
    QuarticOut,
    QuarticInOut,
    QuinticIn,
    QuinticOut,
    QuinticInOut,
    SinusoidalIn,
    SinusoidalOut,
    SinusoidalInOut,
    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,
    CircularIn,
    CircularOut,
    CircularInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

const BACK_OVERSHOOT: f64 = 1.70158;
const ELASTIC_PERIOD: f64 = 0.4;

impl Easing {
    /// Every easing in catalog order
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuarticIn,
        Easing::QuarticOut,
        Easing::QuarticInOut,
        Easing::QuinticIn,
        Easing::QuinticOut,
        Easing::QuinticInOut,
        Easing::SinusoidalIn,
        Easing::SinusoidalOut,
        Easing::SinusoidalInOut,
        Easing::ExponentialIn,
        Easing::ExponentialOut,
        Easing::ExponentialInOut,
        Easing::CircularIn,
        Easing::CircularOut,
        Easing::CircularInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        // Endpoints are always exact
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,

            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => -t * (t - 2.0),
            Easing::QuadraticInOut => in_out(t, |k| k * k),

            Easing::CubicIn => t.powi(3),
            Easing::CubicOut => (t - 1.0).powi(3) + 1.0,
            Easing::CubicInOut => in_out(t, |k| k.powi(3)),

            Easing::QuarticIn => t.powi(4),
            Easing::QuarticOut => 1.0 - (t - 1.0).powi(4),
            Easing::QuarticInOut => in_out(t, |k| k.powi(4)),

            Easing::QuinticIn => t.powi(5),
            Easing::QuinticOut => (t - 1.0).powi(5) + 1.0,
            Easing::QuinticInOut => in_out(t, |k| k.powi(5)),

            Easing::SinusoidalIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SinusoidalOut => (t * PI / 2.0).sin(),
            Easing::SinusoidalInOut => -0.5 * ((PI * t).cos() - 1.0),

            Easing::ExponentialIn => 2f64.powf(10.0 * (t - 1.0)),
            Easing::ExponentialOut => 1.0 - 2f64.powf(-10.0 * t),
            Easing::ExponentialInOut => in_out(t, |k| 2f64.powf(10.0 * (k - 1.0))),

            Easing::CircularIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircularOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::CircularInOut => in_out(t, |k| 1.0 - (1.0 - k * k).sqrt()),

            Easing::ElasticIn => elastic_in(t),
            Easing::ElasticOut => 1.0 - elastic_in(1.0 - t),
            Easing::ElasticInOut => in_out(t, elastic_in),

            Easing::BackIn => back_in(t, BACK_OVERSHOOT),
            Easing::BackOut => 1.0 - back_in(1.0 - t, BACK_OVERSHOOT),
            Easing::BackInOut => in_out(t, |k| back_in(k, BACK_OVERSHOOT * 1.525)),

            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - t * 2.0)) * 0.5
                } else {
                    bounce_out(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
        }
    }

    /// Canonical dotted name, e.g. `"Cubic.EaseIn"`
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "Linear.EaseNone",
            Easing::QuadraticIn => "Quadratic.EaseIn",
            Easing::QuadraticOut => "Quadratic.EaseOut",
            Easing::QuadraticInOut => "Quadratic.EaseInOut",
            Easing::CubicIn => "Cubic.EaseIn",
            Easing::CubicOut => "Cubic.EaseOut",
            Easing::CubicInOut => "Cubic.EaseInOut",
            Easing::QuarticIn => "Quartic.EaseIn",
            Easing::QuarticOut => "Quartic.EaseOut",
            Easing::QuarticInOut => "Quartic.EaseInOut",
            Easing::QuinticIn => "Quintic.EaseIn",
            Easing::QuinticOut => "Quintic.EaseOut",
            Easing::QuinticInOut => "Quintic.EaseInOut",
            Easing::SinusoidalIn => "Sinusoidal.EaseIn",
            Easing::SinusoidalOut => "Sinusoidal.EaseOut",
            Easing::SinusoidalInOut => "Sinusoidal.EaseInOut",
            Easing::ExponentialIn => "Exponential.EaseIn",
            Easing::ExponentialOut => "Exponential.EaseOut",
            Easing::ExponentialInOut => "Exponential.EaseInOut",
            Easing::CircularIn => "Circular.EaseIn",
            Easing::CircularOut => "Circular.EaseOut",
            Easing::CircularInOut => "Circular.EaseInOut",
            Easing::ElasticIn => "Elastic.EaseIn",
            Easing::ElasticOut => "Elastic.EaseOut",
            Easing::ElasticInOut => "Elastic.EaseInOut",
            Easing::BackIn => "Back.EaseIn",
            Easing::BackOut => "Back.EaseOut",
            Easing::BackInOut => "Back.EaseInOut",
            Easing::BounceIn => "Bounce.EaseIn",
            Easing::BounceOut => "Bounce.EaseOut",
            Easing::BounceInOut => "Bounce.EaseInOut",
        }
    }

    /// Look up an easing by dotted name
    pub fn from_name(name: &str) -> Option<Easing> {
        match name {
            "Linear.EaseIn" | "Linear.EaseOut" | "Linear.EaseInOut" => Some(Easing::Linear),
            _ => Easing::ALL.iter().copied().find(|e| e.name() == name),
        }
    }
}

/// Build an in-out curve from its ease-in half
fn in_out(t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        ease_in(t * 2.0) * 0.5
    } else {
        1.0 - ease_in((1.0 - t) * 2.0) * 0.5
    }
}

fn elastic_in(k: f64) -> f64 {
    if k <= 0.0 {
        return 0.0;
    }
    if k >= 1.0 {
        return 1.0;
    }
    let s = ELASTIC_PERIOD / 4.0;
    let k = k - 1.0;
    -(2f64.powf(10.0 * k) * ((k - s) * (2.0 * PI) / ELASTIC_PERIOD).sin())
}

fn back_in(k: f64, s: f64) -> f64 {
    k * k * ((s + 1.0) * k - s)
}

fn bounce_out(k: f64) -> f64 {
    if k < 1.0 / 2.75 {
        7.5625 * k * k
    } else if k < 2.0 / 2.75 {
        let k = k - 1.5 / 2.75;
        7.5625 * k * k + 0.75
    } else if k < 2.5 / 2.75 {
        let k = k - 2.25 / 2.75;
        7.5625 * k * k + 0.9375
    } else {
        let k = k - 2.625 / 2.75;
        7.5625 * k * k + 0.984375
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::from_name(s).ok_or_else(|| AnimationError::UnknownEasing(s.to_string()))
    }
}

impl TryFrom<String> for Easing {
    type Error = AnimationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}
