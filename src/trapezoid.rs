//! Four-anchor quadrilateral whose opposite edges stay aligned.
//!
//! Anchors are ordered top-left, top-right, bottom-right, bottom-left and live
//! in stage space: the frame's native resolution scaled by a single factor.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point, Resolution};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Top anchors share y, bottom anchors share y.
    #[default]
    Horizontal,
    /// Left anchors share x, right anchors share x.
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Anchor whose constrained coordinate follows `index`.
    pub fn partner(self, index: usize) -> Option<usize> {
        match (self, index) {
            (Orientation::Horizontal, 0) => Some(1),
            (Orientation::Horizontal, 1) => Some(0),
            (Orientation::Horizontal, 2) => Some(3),
            (Orientation::Horizontal, 3) => Some(2),
            (Orientation::Vertical, 0) => Some(3),
            (Orientation::Vertical, 3) => Some(0),
            (Orientation::Vertical, 1) => Some(2),
            (Orientation::Vertical, 2) => Some(1),
            _ => None,
        }
    }

    /// Default anchors as fractions of the frame size.
    fn default_fractions(self) -> [(f32, f32); 4] {
        match self {
            Orientation::Horizontal => [(0.25, 0.25), (0.75, 0.25), (0.9, 0.75), (0.1, 0.75)],
            Orientation::Vertical => [(0.25, 0.1), (0.5, 0.3), (0.5, 0.7), (0.25, 0.9)],
        }
    }

    pub fn default_anchors(self, size: Resolution) -> [Point; 4] {
        self.default_fractions()
            .map(|(fx, fy)| size.fraction(fx, fy))
    }
}

/// True when the quadrilateral turns the same way at every corner.
///
/// Dragging can fold the shape into a bow tie, which cannot be filled as a
/// convex polygon.
pub fn is_convex(points: &[Point; 4]) -> bool {
    let mut sign = 0.0f32;
    for i in 0..4 {
        let a = points[i];
        let b = points[(i + 1) % 4];
        let c = points[(i + 2) % 4];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross == 0.0 {
            return false;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Anchors exported in the frame's native coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trapezoid {
    pub orientation: Orientation,
    pub coordinates: [Point; 4],
}

#[derive(Clone, Debug, Default)]
pub struct TrapezoidAnnotator {
    orientation: Orientation,
    native: Resolution,
    stage: Resolution,
    anchors: Option<[Point; 4]>,
    active: Option<usize>,
    pub threshold: String,
}

impl TrapezoidAnnotator {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn anchors(&self) -> Option<&[Point; 4]> {
        self.anchors.as_ref()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Stage size; zero until the frame reports its native size.
    pub fn stage(&self) -> Resolution {
        self.stage
    }

    fn stage_scale(&self) -> f32 {
        if self.native.is_degenerate() || self.stage.is_degenerate() {
            1.0
        } else {
            self.stage.width / self.native.width
        }
    }

    /// Frame finished loading: adopt its native size and place default anchors.
    pub fn video_ready(&mut self, native: Resolution) {
        if native.is_degenerate() {
            return;
        }
        self.native = native;
        self.stage = native;
        self.anchors = Some(self.orientation.default_anchors(native));
        self.active = None;
    }

    /// Switch coupling mode and reset anchors to the new mode's defaults.
    pub fn toggle_orientation(&mut self) {
        self.orientation = self.orientation.toggled();
        if self.native.is_degenerate() {
            return;
        }
        let scale = self.stage_scale();
        self.anchors = Some(
            self.orientation
                .default_anchors(self.native)
                .map(|p| p.scaled(scale)),
        );
        self.active = None;
    }

    /// Rescale stage and anchors so the stage spans `container_width`.
    pub fn resize(&mut self, container_width: f32) {
        if self.stage.is_degenerate() || !container_width.is_finite() || container_width <= 0.0 {
            return;
        }
        let scale = container_width / self.stage.width;
        if (scale - 1.0).abs() < f32::EPSILON {
            return;
        }
        self.stage = self.stage.scaled(scale);
        if let Some(anchors) = self.anchors.as_mut() {
            for p in anchors.iter_mut() {
                *p = p.scaled(scale);
            }
        }
    }

    pub fn anchor_at(&self, pos: Point, radius: f32) -> Option<usize> {
        geometry::hit_test(self.anchors.as_ref()?, radius, pos)
    }

    pub fn begin_drag(&mut self, index: usize) {
        if self.anchors.is_some() && index < 4 {
            self.active = Some(index);
        }
    }

    /// Move one anchor and pull its partner's constrained coordinate along.
    pub fn drag_anchor(&mut self, index: usize, pos: Point) {
        let orientation = self.orientation;
        let Some(anchors) = self.anchors.as_mut() else {
            return;
        };
        if index >= anchors.len() {
            return;
        }
        anchors[index] = pos;
        if let Some(partner) = orientation.partner(index) {
            match orientation {
                Orientation::Horizontal => anchors[partner].y = pos.y,
                Orientation::Vertical => anchors[partner].x = pos.x,
            }
        }
    }

    pub fn end_drag(&mut self) -> Option<Trapezoid> {
        self.active.take()?;
        self.trapezoid()
    }

    /// Anchors mapped back to native frame coordinates.
    pub fn trapezoid(&self) -> Option<Trapezoid> {
        let anchors = self.anchors?;
        let native = self.native;
        let stage = self.stage;
        Some(Trapezoid {
            orientation: self.orientation,
            coordinates: anchors.map(|p| geometry::to_source(p, native, stage)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(orientation: Orientation) -> TrapezoidAnnotator {
        let mut t = TrapezoidAnnotator::new(orientation);
        t.video_ready(Resolution::new(1000.0, 800.0));
        t
    }

    #[test]
    fn test_no_anchors_before_ready() {
        let mut t = TrapezoidAnnotator::default();
        assert!(t.anchors().is_none());
        t.drag_anchor(0, Point::new(1.0, 1.0));
        t.resize(500.0);
        assert!(t.anchors().is_none());
        assert_eq!(t.stage(), Resolution::default());
    }

    #[test]
    fn test_horizontal_defaults() {
        let t = ready(Orientation::Horizontal);
        assert_eq!(
            t.anchors().unwrap(),
            &[
                Point::new(250.0, 200.0),
                Point::new(750.0, 200.0),
                Point::new(900.0, 600.0),
                Point::new(100.0, 600.0),
            ]
        );
    }

    #[test]
    fn test_horizontal_coupling_after_each_drag() {
        let mut t = ready(Orientation::Horizontal);
        let moves = [
            (0, Point::new(10.0, 50.0)),
            (1, Point::new(990.0, 70.0)),
            (2, Point::new(800.0, 700.0)),
            (3, Point::new(5.0, 650.0)),
        ];
        for (index, pos) in moves {
            t.begin_drag(index);
            t.drag_anchor(index, pos);
            let a = t.anchors().unwrap();
            assert_eq!(a[index], pos);
            assert_eq!(a[0].y, a[1].y);
            assert_eq!(a[2].y, a[3].y);
            t.end_drag();
        }
        let a = t.anchors().unwrap();
        assert_eq!(a[0].x, 10.0);
        assert_eq!(a[1].x, 990.0);
    }

    #[test]
    fn test_vertical_coupling_after_each_drag() {
        let mut t = ready(Orientation::Vertical);
        for (index, pos) in [
            (0, Point::new(100.0, 20.0)),
            (2, Point::new(600.0, 500.0)),
            (3, Point::new(140.0, 780.0)),
            (1, Point::new(620.0, 100.0)),
        ] {
            t.drag_anchor(index, pos);
            let a = t.anchors().unwrap();
            assert_eq!(a[0].x, a[3].x);
            assert_eq!(a[1].x, a[2].x);
        }
    }

    #[test]
    fn test_toggle_resets_to_mode_defaults() {
        let mut t = ready(Orientation::Horizontal);
        t.drag_anchor(0, Point::new(1.0, 1.0));
        t.toggle_orientation();
        assert_eq!(t.orientation(), Orientation::Vertical);
        assert_eq!(t.anchors().unwrap()[0], Point::new(250.0, 80.0));
        t.toggle_orientation();
        assert_eq!(t.anchors().unwrap()[0], Point::new(250.0, 200.0));
    }

    #[test]
    fn test_toggle_after_resize_keeps_stage_fractions() {
        let mut t = ready(Orientation::Horizontal);
        t.resize(500.0);
        t.toggle_orientation();
        let p = t.anchors().unwrap()[1];
        assert!((p.x - 250.0).abs() < 1e-3, "{p:?}");
        assert!((p.y - 120.0).abs() < 1e-3, "{p:?}");
    }

    #[test]
    fn test_dragging_past_partner_breaks_convexity() {
        let mut t = ready(Orientation::Horizontal);
        assert!(is_convex(t.anchors().unwrap()));
        t.begin_drag(0);
        t.drag_anchor(0, Point::new(950.0, 200.0));
        assert!(!is_convex(t.anchors().unwrap()));
        t.drag_anchor(0, Point::new(500.0, 200.0));
        assert!(is_convex(t.anchors().unwrap()));
    }

    #[test]
    fn test_resize_scales_uniformly() {
        let mut t = ready(Orientation::Horizontal);
        t.resize(500.0);
        assert_eq!(t.stage(), Resolution::new(500.0, 400.0));
        assert_eq!(t.anchors().unwrap()[2], Point::new(450.0, 300.0));
        t.resize(500.0);
        assert_eq!(t.stage(), Resolution::new(500.0, 400.0));
    }

    #[test]
    fn test_trapezoid_exported_in_native_space() {
        let mut t = ready(Orientation::Horizontal);
        t.resize(500.0);
        t.begin_drag(0);
        t.drag_anchor(0, Point::new(50.0, 40.0));
        let trap = t.end_drag().unwrap();
        assert_eq!(trap.coordinates[0], Point::new(100.0, 80.0));
        assert_eq!(trap.coordinates[1], Point::new(750.0, 80.0));
        assert!(t.end_drag().is_none());
    }

    #[test]
    fn test_anchor_hit_test() {
        let t = ready(Orientation::Horizontal);
        assert_eq!(t.anchor_at(Point::new(752.0, 198.0), 8.0), Some(1));
        assert_eq!(t.anchor_at(Point::new(500.0, 500.0), 8.0), None);
    }
}
