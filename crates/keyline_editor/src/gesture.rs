//! Pointer gesture states and hit regions

use crate::layout::EditorLayout;
use crate::view::ViewState;

/// What the pointer is currently doing
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingPlayhead,
    /// `grab` is the pointer's distance from the thumb's top edge
    DraggingTracksScrollbar { grab: f64 },
    /// `grab` is the pointer's distance from the thumb's left edge
    DraggingTimeScrollbar { grab: f64 },
    DraggingZoomHandle,
    /// Selected keys follow the pointer; also armed after a marquee release
    DraggingKeys,
    DrawingMarquee,
}

impl Gesture {
    /// State after the pointer is released
    pub fn released(self) -> Gesture {
        match self {
            Gesture::DrawingMarquee => Gesture::DraggingKeys,
            _ => Gesture::Idle,
        }
    }
}

/// Panel area under a press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// Time ruler in the header, right of the transport buttons
    Ruler,
    TracksScrollbar,
    /// Track rows right of the label column
    KeyArea,
    /// Bottom-left strip under the labels
    ZoomStrip,
    TimeScrollbar,
    /// Labels and transport buttons
    Outside,
}

pub fn region_at(layout: &EditorLayout, view: &ViewState, x: f64, y: f64) -> Region {
    let bottom_strip = view.height - layout.time_scroll_height;
    if x > layout.label_width && y < layout.header_height {
        Region::Ruler
    } else if x > view.width - layout.tracks_scroll_width && y > layout.header_height {
        Region::TracksScrollbar
    } else if x > layout.label_width && y > layout.header_height && y < bottom_strip {
        Region::KeyArea
    } else if x < layout.label_width && y > bottom_strip {
        Region::ZoomStrip
    } else if x > layout.label_width && y > bottom_strip {
        Region::TimeScrollbar
    } else {
        Region::Outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_of_default_panel() {
        let layout = EditorLayout::default();
        let view = ViewState::new(800.0, 200.0);
        let at = |x, y| region_at(&layout, &view, x, y);
        assert_eq!(at(300.0, 10.0), Region::Ruler);
        assert_eq!(at(790.0, 100.0), Region::TracksScrollbar);
        assert_eq!(at(790.0, 195.0), Region::TracksScrollbar);
        assert_eq!(at(300.0, 100.0), Region::KeyArea);
        assert_eq!(at(50.0, 190.0), Region::ZoomStrip);
        assert_eq!(at(300.0, 190.0), Region::TimeScrollbar);
        assert_eq!(at(50.0, 100.0), Region::Outside);
        assert_eq!(at(20.0, 10.0), Region::Outside);
    }

    #[test]
    fn marquee_release_arms_key_drag() {
        assert_eq!(Gesture::DrawingMarquee.released(), Gesture::DraggingKeys);
        assert_eq!(Gesture::DraggingKeys.released(), Gesture::Idle);
        assert_eq!(
            Gesture::DraggingTimeScrollbar { grab: 3.0 }.released(),
            Gesture::Idle
        );
    }
}
