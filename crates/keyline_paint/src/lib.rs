//! Keyline Paint API
//!
//! A minimal 2D drawing API, similar to HTML Canvas, that the timeline editor
//! renders through.
//!
//! # Features
//!
//! - Filled/stroked rectangles, lines and polygons
//! - Text runs
//! - Rectangular clipping
//! - A recording surface for headless rendering and tests

pub mod color;
pub mod context;
pub mod path;
pub mod primitives;

pub use color::Color;
pub use context::{DrawSurface, PaintCommand, PaintContext};
pub use path::{Path, PathBuilder, PathCommand, Point};
pub use primitives::Rect;
