use serde::{Deserialize, Serialize};

// ── Points & Resolutions ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<[f32; 2]> for Point {
    fn from(p: [f32; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f32, f32)> for Point {
    fn from(p: (f32, f32)) -> Self {
        Self::new(p.0, p.1)
    }
}

/// Size of a rectangular coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: f32,
    pub height: f32,
}

impl Resolution {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A resolution that has not been reported yet (or never will be).
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Point at the given fraction of width and height.
    pub fn fraction(&self, fx: f32, fy: f32) -> Point {
        Point::new(self.width * fx, self.height * fy)
    }
}

// ── Transforms ──────────────────────────────────────────────────────────────

/// Map a source-resolution point onto the display surface.
///
/// Axes scale independently. Out-of-bounds points are mapped like any other.
/// When either resolution is unknown the point is returned unchanged.
pub fn to_display(p: Point, source: Resolution, display: Resolution) -> Point {
    if source.is_degenerate() || display.is_degenerate() {
        return p;
    }
    Point::new(
        p.x * display.width / source.width,
        p.y * display.height / source.height,
    )
}

/// Inverse of [`to_display`].
pub fn to_source(p: Point, source: Resolution, display: Resolution) -> Point {
    if source.is_degenerate() || display.is_degenerate() {
        return p;
    }
    Point::new(
        p.x * source.width / display.width,
        p.y * source.height / display.height,
    )
}

/// Whether `p` lies within the circle of `radius` around `center` (boundary included).
pub fn is_inside(center: Point, radius: f32, p: Point) -> bool {
    center.distance_sq(p) <= radius * radius
}

/// Index of the first point within `radius` of `p`, in list order.
pub fn hit_test(points: &[Point], radius: f32, p: Point) -> Option<usize> {
    points.iter().position(|&c| is_inside(c, radius, p))
}
