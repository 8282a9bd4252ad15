//! Keyline Animation System
//!
//! Property tweening over a shared clock.
//!
//! # Features
//!
//! - **Chains**: sequential `to` steps per target with delay, duration and easing
//! - **Easing catalog**: eleven families × in/out/in-out, addressable by name
//! - **Looping**: infinite, counted, or run-on with finished tweens dropped
//! - **Units**: length values keep their unit through interpolation
//! - **Frame pacing**: drift-correcting scheduler for host loops

pub mod chain;
pub mod easing;
pub mod error;
pub mod scheduler;
pub mod timeline;
pub mod value;

pub use chain::{Chain, TweenOptions};
pub use easing::Easing;
pub use error::AnimationError;
pub use scheduler::FrameScheduler;
pub use timeline::{
    AnimId, Callback, ChainId, GroupId, LoopMode, PropertyAnimation, TargetId, Timeline,
    UpdateCallback,
};
pub use value::{Animatable, LengthUnit, PropertyBag, PropertyValue, ValueKind};
