//! Paint context - the drawing surface API
//!
//! [`DrawSurface`] is the abstract 2D canvas the editor draws against. Hosts
//! implement it over their real canvas; [`PaintContext`] records the calls as
//! [`PaintCommand`]s for deferred replay or inspection.

use crate::color::Color;
use crate::path::{Path, Point};
use crate::primitives::Rect;

/// A 2D drawing surface
pub trait DrawSurface {
    /// Surface size in pixels as `(width, height)`
    fn size(&self) -> (f32, f32);

    /// Clear the whole surface
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    fn fill_path(&mut self, path: &Path, color: Color);

    fn stroke_path(&mut self, path: &Path, color: Color, width: f32);

    /// Draw `text` with its baseline starting at `position`
    fn fill_text(&mut self, text: &str, position: Point, size: f32, color: Color);

    /// Restrict subsequent drawing to `rect` until the matching `pop_clip`
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);
}

/// A recorded paint command
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    Clear,
    FillRect {
        rect: Rect,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    FillPath {
        path: Path,
        color: Color,
    },
    StrokePath {
        path: Path,
        color: Color,
        width: f32,
    },
    Text {
        text: String,
        position: Point,
        size: f32,
        color: Color,
    },
    PushClip {
        rect: Rect,
    },
    PopClip,
}

/// Recording surface
pub struct PaintContext {
    width: f32,
    height: f32,
    commands: Vec<PaintCommand>,
    clip_stack: Vec<Rect>,
}

impl PaintContext {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            clip_stack: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Currently active clip, if any
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// All recorded text runs, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            PaintCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for PaintContext {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
        self.commands.push(PaintCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::FillRect { rect, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(PaintCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.commands.push(PaintCommand::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &Path, color: Color, width: f32) {
        self.commands.push(PaintCommand::StrokePath {
            path: path.clone(),
            color,
            width,
        });
    }

    fn fill_text(&mut self, text: &str, position: Point, size: f32, color: Color) {
        self.commands.push(PaintCommand::Text {
            text: text.to_string(),
            position,
            size,
            color,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
        self.commands.push(PaintCommand::PushClip { rect });
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
        self.commands.push(PaintCommand::PopClip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut ctx = PaintContext::new(320.0, 200.0);
        ctx.clear();
        ctx.push_clip(Rect::new(0.0, 30.0, 320.0, 154.0));
        ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
        ctx.fill_text("x", Point::new(15.0, 45.0), 11.0, Color::BLACK);
        assert_eq!(ctx.current_clip(), Some(Rect::new(0.0, 30.0, 320.0, 154.0)));
        ctx.pop_clip();

        assert_eq!(ctx.size(), (320.0, 200.0));
        assert_eq!(ctx.commands().len(), 5);
        assert_eq!(ctx.commands()[0], PaintCommand::Clear);
        assert_eq!(ctx.texts().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(ctx.current_clip(), None);
    }

    #[test]
    fn clear_discards_previous_frame() {
        let mut ctx = PaintContext::new(10.0, 10.0);
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        ctx.clear();
        assert_eq!(ctx.commands(), &[PaintCommand::Clear]);
    }
}
