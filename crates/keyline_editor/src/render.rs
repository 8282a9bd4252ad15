//! Panel rendering
//!
//! One frame is drawn back to front: header buttons, the clipped track rows,
//! the label column edge, ruler, playhead, zoom fan, scrollbars, borders and
//! finally the marquee.

use keyline_animation::Timeline;
use keyline_core::KeyValueStore;
use keyline_paint::{Color, DrawSurface, Path, PathBuilder, Point, Rect};

use crate::editor::Editor;
use crate::layout::Transport;
use crate::timecode::ruler_label;
use crate::track::{Track, TrackId};
use crate::view::{self, TimeAxis};

const ACCENT: Color = Color::from_hex(0x3D81F6);
const BORDER: Color = Color::from_hex(0xDEDEDE);
const TICK: Color = Color::from_hex(0x999999);
const LABEL: Color = Color::from_hex(0x555555);
const RULER_TEXT: Color = Color::from_hex(0x666666);
const ROW_LINE: Color = Color::BLACK.with_alpha(0.03);
const PLAYHEAD: Color = Color::from_hex(0xFF0000);
const SCROLL_TRACK: Color = Color::from_hex(0xEEEEEE);
const SCROLL_THUMB: Color = Color::from_hex(0x999999);
const KEY: Color = Color::from_hex(0x0066FF);
const KEY_HALF: Color = Color::from_hex(0xCEE1FE);
const KEY_SELECTED: Color = Color::from_hex(0xFF0000);
const KEY_SELECTED_HALF: Color = Color::from_hex(0xFFCDCD);
const MARQUEE_STROKE: Color = Color::from_hex(0x00CCFF);
const MARQUEE_FILL: Color = MARQUEE_STROKE.with_alpha(0.1);

pub const LABEL_FONT_SIZE: f32 = 11.0;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x as f32, y as f32)
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x as f32, y as f32, w as f32, h as f32)
}

fn line(surface: &mut impl DrawSurface, from: (f64, f64), to: (f64, f64), color: Color) {
    surface.stroke_line(pt(from.0, from.1), pt(to.0, to.1), color, 1.0);
}

impl<S: KeyValueStore> Editor<S> {
    /// Draw the panel; the surface's width becomes the panel width
    pub fn render(&mut self, timeline: &Timeline, surface: &mut impl DrawSurface) {
        let (width, _) = surface.size();
        self.set_width(width as f64);
        self.settle_thumbs(timeline);

        let layout = self.layout();
        let state = *self.view();
        let (w, h) = (state.width, state.height);
        let header = layout.header_height;
        let axis = self.time_axis(timeline);

        surface.clear();
        self.draw_transport(surface);

        surface.push_clip(rect(0.0, header + 1.0, w, h - layout.time_scroll_height - header - 1.0));
        let count = self.tracks().len();
        for (row, (id, track)) in self.tracks().iter().enumerate() {
            let bottom = view::row_bottom(layout, &state, count, row);
            if bottom < header {
                continue;
            }
            self.draw_track(surface, &axis, id, track, bottom);
        }
        surface.pop_clip();

        line(surface, (layout.label_width, 0.0), (layout.label_width, h), BORDER);
        draw_ruler(surface, &axis, layout.label_width, w, header);

        let playhead = axis.time_to_px(timeline.time());
        line(surface, (playhead, 0.0), (playhead, h), PLAYHEAD);

        self.draw_zoom(surface);
        self.draw_scrollbars(surface, timeline);

        line(surface, (0.0, 0.0), (w, 0.0), BORDER);
        line(surface, (0.0, header), (w, header), BORDER);
        let strip = h - layout.time_scroll_height;
        line(surface, (0.0, strip), (layout.label_width, strip), BORDER);
        line(surface, (layout.label_width, strip - 1.0), (layout.label_width, h), BORDER);

        if let Some((x0, y0, x1, y1)) = self.marquee().bounds() {
            let outline = Path::polygon(&[pt(x0, y0), pt(x1, y0), pt(x1, y1), pt(x0, y1)]);
            surface.fill_path(&outline, MARQUEE_FILL);
            surface.stroke_path(&outline, MARQUEE_STROKE, 1.0);
        }
    }

    /// Keep thumb positions inside their scrollbars after a resize or zoom
    fn settle_thumbs(&mut self, timeline: &Timeline) {
        let layout = self.layout().clone();
        let end = timeline.animation_end();
        let count = self.tracks().len();
        let state = self.view_mut();

        let time_bar = view::time_scrollbar(&layout, state, end);
        if state.time_thumb_pos + time_bar.thumb > time_bar.length {
            state.time_thumb_pos = (time_bar.length - time_bar.thumb).max(0.0);
        }
        let tracks_bar = view::tracks_scrollbar(&layout, state, count);
        if state.tracks_thumb_pos + tracks_bar.thumb > tracks_bar.length {
            state.tracks_thumb_pos = (tracks_bar.length - tracks_bar.thumb).max(0.0);
        }
    }

    fn draw_transport(&self, surface: &mut impl DrawSurface) {
        let header = self.layout().header_height;
        for button in Transport::ALL {
            let (x, size) = self.layout().button_rect(button);
            let y = 5.0;
            match button {
                Transport::Play => {
                    let icon = Path::polygon(&[
                        pt(x + 6.5, y + 5.0),
                        pt(x + size - 4.0, header / 2.0 + 1.5),
                        pt(x + 6.5, header - 8.0),
                    ]);
                    surface.fill_path(&icon, ACCENT);
                }
                Transport::Pause => {
                    let bar = header / 6.0;
                    let height = size - 11.0;
                    surface.fill_rect(rect(x + 5.5, y + 5.5, bar, height), ACCENT);
                    surface.fill_rect(rect(x + 7.5 + bar, y + 5.5, bar, height), ACCENT);
                }
                Transport::Stop => {
                    surface.fill_rect(rect(x + 5.5, y + 5.5, size - 11.0, size - 11.0), ACCENT);
                }
                Transport::Export => {
                    for (dy, len) in [(9.5, 6.0), (13.5, 8.0), (17.5, 10.0)] {
                        let row = header - dy;
                        surface.stroke_line(pt(x + 5.5, row), pt(x + 5.5 + len, row), ACCENT, 2.0);
                    }
                }
            }
        }
    }

    fn draw_track(
        &self,
        surface: &mut impl DrawSurface,
        axis: &TimeAxis,
        id: TrackId,
        track: &Track,
        bottom: f64,
    ) {
        let layout = self.layout();
        let row_height = layout.row_height;
        let (indent, label_color) = match track {
            Track::Object(_) => {
                surface.fill_rect(
                    rect(0.0, bottom - row_height + 1.0, layout.label_width, row_height - 1.0),
                    ACCENT,
                );
                (5.0, Color::WHITE)
            }
            Track::Property(_) => (15.0, LABEL),
        };

        line(surface, (0.0, bottom), (self.view().width, bottom), ROW_LINE);
        surface.fill_text(
            track.name(),
            pt(indent, bottom - row_height / 4.0),
            LABEL_FONT_SIZE,
            label_color,
        );

        let keys: Vec<_> = self.tracks().keys_of(id).collect();
        let middle = bottom - row_height * 0.5;
        let size = row_height * 0.5;
        for (i, (key_id, key)) in keys.iter().enumerate() {
            let selected = self.selection().contains(*key_id);
            let (solid, half) = if selected {
                (KEY_SELECTED, KEY_SELECTED_HALF)
            } else {
                (KEY, KEY_HALF)
            };
            let x = axis.time_to_px(key.time);
            draw_diamond(surface, x, middle, size, solid, (true, true), Some(solid));
            draw_diamond(surface, x, middle, size, half, (i > 0, i + 1 < keys.len()), None);
        }
    }

    fn draw_zoom(&self, surface: &mut impl DrawSurface) {
        let layout = self.layout();
        let h = self.view().height;
        let span = layout.label_width - 10.0;
        for j in 2..20 {
            let f = 1.0 - (j * j) as f64 / 361.0;
            let x = 7.0 + f * span;
            line(surface, (x, h - layout.time_scroll_height + 4.0), (x, h - 3.0), TICK);
        }
        let x = (1.0 - self.view().time_scale) * span;
        let indicator = Path::polygon(&[pt(x + 7.0, h - 7.0), pt(x + 11.0, h - 1.0), pt(x + 3.0, h - 1.0)]);
        surface.fill_path(&indicator, RULER_TEXT);
    }

    fn draw_scrollbars(&self, surface: &mut impl DrawSurface, timeline: &Timeline) {
        let layout = self.layout();
        let state = self.view();
        let header = layout.header_height;

        let tracks = view::tracks_scrollbar(layout, state, self.tracks().len());
        let x = state.width - layout.tracks_scroll_width;
        surface.fill_rect(rect(x, header + 1.0, layout.tracks_scroll_width, tracks.length), SCROLL_TRACK);
        if tracks.is_scrollable() {
            surface.fill_rect(
                rect(x, header + 1.0 + state.tracks_thumb_pos, layout.tracks_scroll_width, tracks.thumb),
                SCROLL_THUMB,
            );
        }

        let time = view::time_scrollbar(layout, state, timeline.animation_end());
        let y = state.height - layout.time_scroll_height;
        surface.fill_rect(rect(layout.label_width, y, time.length, layout.time_scroll_height), SCROLL_TRACK);
        if time.is_scrollable() {
            surface.fill_rect(
                rect(
                    layout.label_width + 1.0 + state.time_thumb_pos,
                    y,
                    time.thumb,
                    layout.time_scroll_height,
                ),
                SCROLL_THUMB,
            );
        }
    }
}

/// Second ticks with `m:ss` labels at least 30px apart, from the first
/// second at or left of `left`
fn draw_ruler(surface: &mut impl DrawSurface, axis: &TimeAxis, left: f64, width: f64, header: f64) {
    let mut last_label = f64::NEG_INFINITY;
    let mut second = axis.px_to_time(left).floor().max(0.0) as u64;
    loop {
        let x = axis.time_to_px(second as f64);
        if x >= width {
            break;
        }
        line(surface, (x, 0.0), (x, header * 0.3), TICK);
        if x - last_label > 30.0 {
            surface.fill_text(&ruler_label(second), pt(x - 6.0, header * 0.8), LABEL_FONT_SIZE, RULER_TEXT);
            last_label = x;
        }
        second += 1;
    }
}

/// Key diamond; `halves` selects the left and right triangles to fill
fn draw_diamond(
    surface: &mut impl DrawSurface,
    x: f64,
    y: f64,
    size: f64,
    fill: Color,
    halves: (bool, bool),
    stroke: Option<Color>,
) {
    let r = size / 2.0;
    if let Some(stroke) = stroke {
        let outline = Path::polygon(&[pt(x, y - r), pt(x + r, y), pt(x, y + r), pt(x - r, y)]);
        surface.stroke_path(&outline, stroke, 2.0);
    }
    if halves.0 {
        let left = PathBuilder::new()
            .move_to(x as f32, (y - r) as f32)
            .line_to((x - r) as f32, y as f32)
            .line_to(x as f32, (y + r) as f32)
            .close()
            .build();
        surface.fill_path(&left, fill);
    }
    if halves.1 {
        let right = PathBuilder::new()
            .move_to(x as f32, (y - r) as f32)
            .line_to((x + r) as f32, y as f32)
            .line_to(x as f32, (y + r) as f32)
            .close()
            .build();
        surface.fill_path(&right, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyline_animation::{PropertyBag, TweenOptions};
    use keyline_core::MemoryStore;
    use keyline_paint::{PaintCommand, PaintContext};

    use crate::layout::EditorLayout;

    fn scene() -> (Timeline, Editor) {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        tl.chain(Some("box"), target)
            .to([("x", 100.0), ("y", 50.0)], TweenOptions::default())
            .to([("x", 0.0)], TweenOptions::default().delay(0.5));
        let editor = Editor::new(EditorLayout::default(), MemoryStore::new(), &mut tl);
        (tl, editor)
    }

    #[test]
    fn labels_and_ruler_are_drawn() {
        let (tl, mut editor) = scene();
        let mut ctx = PaintContext::new(640.0, 200.0);
        editor.render(&tl, &mut ctx);

        let texts: Vec<&str> = ctx.texts().collect();
        assert_eq!(&texts[..3], &["box", "x", "y"]);
        assert!(texts.contains(&"0:00"));
        assert!(texts.contains(&"0:01"));
        assert_eq!(editor.view().width, 640.0);
    }

    #[test]
    fn scrolled_ruler_starts_at_first_visible_second() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0));
        tl.chain(Some("box"), target)
            .to([("x", 100.0)], TweenOptions::default().duration(60.0));
        let mut editor = Editor::new(EditorLayout::default(), MemoryStore::new(), &mut tl);
        editor.view_mut().time_scroll = 1.0;

        let mut ctx = PaintContext::new(640.0, 200.0);
        editor.render(&tl, &mut ctx);
        let ruler: Vec<&str> = ctx.texts().filter(|t| t.contains(':')).collect();
        assert_eq!(ruler, vec!["0:57", "0:58", "0:59", "1:00"]);
    }

    #[test]
    fn clips_are_balanced() {
        let (tl, mut editor) = scene();
        let mut ctx = PaintContext::new(640.0, 200.0);
        editor.render(&tl, &mut ctx);
        let pushes = ctx
            .commands()
            .iter()
            .filter(|c| matches!(c, PaintCommand::PushClip { .. }))
            .count();
        let pops = ctx
            .commands()
            .iter()
            .filter(|c| matches!(c, PaintCommand::PopClip))
            .count();
        assert_eq!((pushes, pops), (1, 1));
        assert_eq!(ctx.current_clip(), None);
    }

    #[test]
    fn end_keys_have_one_half_open() {
        let (tl, mut editor) = scene();
        let mut ctx = PaintContext::new(640.0, 200.0);
        editor.render(&tl, &mut ctx);

        // x track: keys at 1, 1.5 (hold) and 2.5; y track: one key
        let half_fills = ctx
            .commands()
            .iter()
            .filter(|c| matches!(c, PaintCommand::FillPath { color, .. } if *color == KEY_HALF))
            .count();
        assert_eq!(half_fills, 4);
    }

    #[test]
    fn playhead_follows_time() {
        let (mut tl, mut editor) = scene();
        tl.seek(1.0);
        let mut ctx = PaintContext::new(640.0, 200.0);
        editor.render(&tl, &mut ctx);
        let x = 318.0_f32;
        assert!(ctx.commands().iter().any(|c| matches!(
            c,
            PaintCommand::Line { from, color, .. } if *color == PLAYHEAD && from.x == x
        )));
    }
}
