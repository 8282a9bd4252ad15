//! Rubber-band selection rectangle, in surface pixels

/// Marquee drag state
///
/// The anchor is where the press happened; the free corner follows the
/// pointer but never enters the header or the label column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Marquee {
    active: bool,
    start: (f64, f64),
    current: (f64, f64),
    /// Left and top limits for the free corner
    min: (f64, f64),
}

impl Marquee {
    /// Start at `(x, y)`; the free corner is kept at or beyond `min`
    pub fn begin(&mut self, x: f64, y: f64, min: (f64, f64)) {
        self.active = true;
        self.start = (x, y);
        self.current = (x, y);
        self.min = min;
    }

    pub fn update(&mut self, x: f64, y: f64) {
        if self.active {
            self.current = (x, y);
        }
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Free corner after clamping
    pub fn corner(&self) -> (f64, f64) {
        (self.current.0.max(self.min.0), self.current.1.max(self.min.1))
    }

    /// Normalized `(x0, y0, x1, y1)`
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if !self.active {
            return None;
        }
        let (ax, ay) = self.start;
        let (cx, cy) = self.corner();
        Some((ax.min(cx), ay.min(cy), ax.max(cx), ay.max(cy)))
    }

    pub fn take_bounds(&mut self) -> Option<(f64, f64, f64, f64)> {
        let bounds = self.bounds();
        self.active = false;
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marquee_tracks_rect() {
        let mut m = Marquee::default();
        assert_eq!(m.bounds(), None);
        m.begin(200.0, 50.0, (108.0, 30.0));
        assert_eq!(m.bounds(), Some((200.0, 50.0, 200.0, 50.0)));
        m.update(150.0, 90.0);
        assert_eq!(m.bounds(), Some((150.0, 50.0, 200.0, 90.0)));
        assert_eq!(m.take_bounds(), Some((150.0, 50.0, 200.0, 90.0)));
        assert_eq!(m.bounds(), None);
    }

    #[test]
    fn free_corner_stays_out_of_chrome() {
        let mut m = Marquee::default();
        m.begin(200.0, 50.0, (108.0, 30.0));
        m.update(20.0, 5.0);
        assert_eq!(m.corner(), (108.0, 30.0));
        assert_eq!(m.bounds(), Some((108.0, 30.0, 200.0, 50.0)));
        m.cancel();
        m.update(300.0, 300.0);
        assert_eq!(m.bounds(), None);
    }
}
