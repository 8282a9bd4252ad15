//! Path building and representation

use smallvec::SmallVec;

/// A 2D point in surface coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// A polyline path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 8]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed polygon through `points`
    pub fn polygon(points: &[Point]) -> Self {
        let mut builder = PathBuilder::new();
        for (i, p) in points.iter().enumerate() {
            builder = if i == 0 {
                builder.move_to(p.x, p.y)
            } else {
                builder.line_to(p.x, p.y)
            };
        }
        builder.close().build()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

}

/// Builder for constructing paths
pub struct PathBuilder {
    path: Path,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self { path: Path::new() }
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.path.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.path.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self
    }

    pub fn build(self) -> Path {
        self.path
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_is_closed() {
        let path = Path::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ]);
        assert_eq!(path.commands().len(), 4);
        assert_eq!(path.commands()[3], PathCommand::Close);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(0.0, 0.0)));
    }
}
