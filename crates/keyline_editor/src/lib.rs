//! Keyline Timeline Editor
//!
//! An interactive keyframe panel over a [`keyline_animation::Timeline`].
//!
//! # Features
//!
//! - **Tracks**: one object row per target, one property row per animated property
//! - **Keys**: derived from the engine's animations and written back on every edit
//! - **Gestures**: playhead scrub, scrollbars, zoom strip, key drag, marquee select
//! - **Persistence**: keys and view settings through a [`keyline_core::KeyValueStore`]
//! - **Export**: builder-call source reproducing the edited tracks
//!
//! # Example
//!
//! ```rust
//! use keyline_animation::{PropertyBag, Timeline, TweenOptions};
//! use keyline_core::MemoryStore;
//! use keyline_editor::{Editor, EditorLayout};
//! use keyline_paint::PaintContext;
//!
//! let mut timeline = Timeline::new();
//! let ball = timeline.add_target(PropertyBag::new().with("y", 0.0));
//! timeline.chain(Some("ball"), ball).to([("y", 100.0)], TweenOptions::default());
//!
//! let mut editor = Editor::new(EditorLayout::default(), MemoryStore::new(), &mut timeline);
//! let mut surface = PaintContext::new(640.0, 200.0);
//! editor.render(&timeline, &mut surface);
//! assert!(surface.texts().any(|t| t == "ball"));
//! ```

pub mod editor;
pub mod error;
pub mod export;
pub mod form;
pub mod gesture;
pub mod layout;
pub mod marquee;
pub mod persist;
pub mod render;
pub mod selection;
pub mod timecode;
pub mod track;
pub mod view;

pub use editor::{Editor, EditorRequest};
pub use error::EditorError;
pub use export::{export_chains, export_code, ExportChain, ExportStep};
pub use form::{KeyEdit, KeyEditForm};
pub use gesture::{Gesture, Region};
pub use layout::{EditorLayout, Transport};
pub use persist::LoadOutcome;
pub use selection::Selection;
pub use timecode::parse_timecode;
pub use track::{Key, KeyId, Track, TrackId, Tracks};
pub use view::{TimeAxis, ViewState};
