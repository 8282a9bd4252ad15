//! View transforms
//!
//! Horizontal: seconds ↔ surface x through a [`TimeAxis`] snapshot taken
//! from the current zoom and scroll. Vertical: track rows under the header,
//! shifted by the tracks scroll fraction.

use crate::layout::EditorLayout;

/// Zoom and scroll state of the panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Surface width
    pub width: f64,
    /// Panel height
    pub height: f64,
    /// Zoom in `[0.01, 1]`
    pub time_scale: f64,
    /// Vertical scroll fraction in `[0, 1]`
    pub tracks_scroll: f64,
    pub tracks_thumb_pos: f64,
    /// Horizontal scroll fraction in `[0, 1]`
    pub time_scroll: f64,
    pub time_thumb_pos: f64,
}

impl ViewState {
    pub const MIN_TIME_SCALE: f64 = 0.01;
    pub const MAX_TIME_SCALE: f64 = 1.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            time_scale: 1.0,
            tracks_scroll: 0.0,
            tracks_thumb_pos: 0.0,
            time_scroll: 0.0,
            time_thumb_pos: 0.0,
        }
    }

    pub fn clamp_time_scale(scale: f64) -> f64 {
        scale.clamp(Self::MIN_TIME_SCALE, Self::MAX_TIME_SCALE)
    }
}

/// Seconds ↔ pixels for one frame of interaction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeAxis {
    /// Surface x of time zero before scrolling
    origin: f64,
    pixels_per_second: f64,
    /// Seconds scrolled off the left edge
    shift: f64,
}

impl TimeAxis {
    pub fn new(layout: &EditorLayout, view: &ViewState, animation_end: f64) -> Self {
        let pixels_per_second = view.time_scale * layout.pixels_per_second;
        let visible = (layout.time_viewport_width(view.width) - 2.0 * layout.key_origin_padding)
            / pixels_per_second;
        let shift = ((animation_end - visible) * view.time_scroll).max(0.0);
        Self {
            origin: layout.label_width + layout.key_origin_padding,
            pixels_per_second,
            shift,
        }
    }

    pub fn time_to_px(&self, time: f64) -> f64 {
        self.origin + (time - self.shift) * self.pixels_per_second
    }

    pub fn px_to_time(&self, x: f64) -> f64 {
        (x - self.origin) / self.pixels_per_second + self.shift
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }
}

/// Thumb geometry of one scrollbar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scrollbar {
    /// Length of the scrollbar's track
    pub length: f64,
    pub thumb: f64,
}

impl Scrollbar {
    /// Room the thumb can travel
    pub fn travel(&self) -> f64 {
        self.length - self.thumb
    }

    pub fn is_scrollable(&self) -> bool {
        self.thumb < self.length
    }

    /// Clamp a thumb position, returning it with its scroll fraction
    pub fn place(&self, pos: f64) -> (f64, f64) {
        let pos = pos.min(self.travel()).max(0.0);
        let fraction = if self.travel() > 0.0 {
            pos / self.travel()
        } else {
            0.0
        };
        (pos, fraction)
    }
}

/// Vertical scrollbar: thumb proportional to visible rows, never below the
/// minimum thumb size
pub fn tracks_scrollbar(layout: &EditorLayout, view: &ViewState, track_count: usize) -> Scrollbar {
    let length = layout.tracks_viewport_height(view.height);
    let total = track_count as f64 * layout.row_height;
    let thumb = if total > 0.0 {
        (length * length / total).max(layout.min_thumb_size).min(length)
    } else {
        length
    };
    Scrollbar { length, thumb }
}

/// Horizontal scrollbar: thumb proportional to the visible share of the
/// animation
pub fn time_scrollbar(layout: &EditorLayout, view: &ViewState, animation_end: f64) -> Scrollbar {
    let length = layout.time_viewport_width(view.width);
    let visible = length / (view.time_scale * layout.pixels_per_second);
    let ratio = if animation_end > 0.0 {
        (visible / animation_end).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Scrollbar {
        length,
        thumb: ratio * length,
    }
}

/// Pixels the track rows are scrolled up by
pub fn tracks_scroll_px(layout: &EditorLayout, view: &ViewState, track_count: usize) -> f64 {
    let overflow = track_count as f64 * layout.row_height - view.height + layout.header_height;
    (view.tracks_scroll * overflow).max(0.0)
}

/// Row index under surface y; negative above the first row
pub fn row_at(layout: &EditorLayout, view: &ViewState, track_count: usize, y: f64) -> i64 {
    let scroll = tracks_scroll_px(layout, view, track_count);
    ((y - layout.header_height + scroll) / layout.row_height).floor() as i64
}

/// Surface y of the bottom edge of `row`
pub fn row_bottom(layout: &EditorLayout, view: &ViewState, track_count: usize, row: usize) -> f64 {
    layout.header_height + layout.row_height * (row as f64 + 1.0)
        - tracks_scroll_px(layout, view, track_count)
}
