//! Editor geometry
//!
//! Fixed sizes of the panel chrome. Everything is in surface pixels.

use serde::{Deserialize, Serialize};

/// Panel dimensions; missing fields take their defaults when deserialized
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorLayout {
    /// Width of the track label column
    pub label_width: f64,
    /// Height of one track row
    pub row_height: f64,
    /// Width of the vertical (tracks) scrollbar
    pub tracks_scroll_width: f64,
    /// Height of the horizontal (time) scrollbar and zoom strip
    pub time_scroll_height: f64,
    /// Height of the transport/ruler header
    pub header_height: f64,
    /// Initial panel height, until a saved one is loaded
    pub panel_height: f64,
    /// Horizontal pixels per second at a time scale of 1
    pub pixels_per_second: f64,
    /// Gap between the label column and time zero
    pub key_origin_padding: f64,
    /// Smallest scrollbar thumb
    pub min_thumb_size: f64,
    /// Key hit radius as a fraction of the row height
    pub hit_tolerance: f64,
}

impl Default for EditorLayout {
    fn default() -> Self {
        Self {
            label_width: 108.0,
            row_height: 20.0,
            tracks_scroll_width: 16.0,
            time_scroll_height: 16.0,
            header_height: 30.0,
            panel_height: 200.0,
            pixels_per_second: 200.0,
            key_origin_padding: 10.0,
            min_thumb_size: 20.0,
            hit_tolerance: 0.3,
        }
    }
}

/// Header buttons, left to right
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    Play,
    Pause,
    Stop,
    Export,
}

impl Transport {
    pub const ALL: [Transport; 4] = [
        Transport::Play,
        Transport::Pause,
        Transport::Stop,
        Transport::Export,
    ];
}

impl EditorLayout {
    /// Key hit radius in pixels
    pub fn key_hit_radius(&self) -> f64 {
        self.row_height * self.hit_tolerance
    }

    /// Height available to track rows for a panel of `height`
    pub fn tracks_viewport_height(&self, height: f64) -> f64 {
        height - self.header_height - self.time_scroll_height
    }

    /// Width of the time scrollbar for a panel of `width`
    pub fn time_viewport_width(&self, width: f64) -> f64 {
        width - self.label_width - self.tracks_scroll_width
    }

    /// Right edge of transport button `index`; buttons overlap by 4px
    fn button_edge(&self, index: usize) -> f64 {
        let i = index as f64;
        i * self.header_height - 4.0 * (i - 1.0)
    }

    /// Left x and width of a transport button's drawn square
    pub fn button_rect(&self, button: Transport) -> (f64, f64) {
        let i = button as usize as f64;
        (i * self.header_height - 4.0 * (i - 1.0), self.header_height - 8.0)
    }

    /// Transport button under `(x, y)`; boundaries themselves hit nothing
    pub fn transport_at(&self, x: f64, y: f64) -> Option<Transport> {
        if y >= self.header_height {
            return None;
        }
        Transport::ALL.into_iter().enumerate().find_map(|(i, button)| {
            let left = if i == 0 { f64::NEG_INFINITY } else { self.button_edge(i) };
            let right = self.button_edge(i + 1);
            (x > left && x < right).then_some(button)
        })
    }
}
