//! Two-point distance calibration over a still image.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point, Resolution};

pub const DEFAULT_MARKER_RADIUS: f32 = 6.0;

/// Two reference points in source-image space plus the real-world distance
/// between them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownDistance {
    pub coordinates: [Point; 2],
    pub meter_measurement: Option<f64>,
}

/// Parse the distance field. Empty, non-numeric or out-of-range text yields `None`.
pub fn parse_meters(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    rounded.is_finite().then_some(rounded)
}

#[derive(Clone, Debug)]
pub struct ProximityEditor {
    points: Vec<Point>,
    natural: Resolution,
    display: Resolution,
    distance: String,
    marker_radius: f32,
    dragging: Option<usize>,
    pub show_preview: bool,
}

impl Default for ProximityEditor {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_MARKER_RADIUS)
    }
}

impl ProximityEditor {
    pub fn new(distance: String, marker_radius: f32) -> Self {
        Self {
            points: Vec::new(),
            natural: Resolution::default(),
            display: Resolution::default(),
            distance,
            marker_radius,
            dragging: None,
            show_preview: true,
        }
    }

    /// Points in source-image space, oldest first.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn display_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|&p| geometry::to_display(p, self.natural, self.display))
            .collect()
    }

    pub fn distance(&self) -> &str {
        &self.distance
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// The distance field only accepts input once both points are marked.
    pub fn distance_enabled(&self) -> bool {
        self.points.len() == 2
    }

    /// Update the image's native size and its on-screen size.
    pub fn set_viewport(&mut self, natural: Resolution, display: Resolution) {
        self.natural = natural;
        self.display = display;
    }

    pub fn known_distance(&self) -> Option<KnownDistance> {
        match self.points.as_slice() {
            [a, b] => Some(KnownDistance {
                coordinates: [*a, *b],
                meter_measurement: parse_meters(&self.distance),
            }),
            _ => None,
        }
    }

    /// Marker under the pointer, in point order.
    pub fn marker_at(&self, display_pos: Point) -> Option<usize> {
        geometry::hit_test(&self.display_points(), self.marker_radius, display_pos)
    }

    /// Append a point, evicting the oldest once more than two are held.
    pub fn add_point(&mut self, display_pos: Point) -> Option<KnownDistance> {
        self.points
            .push(geometry::to_source(display_pos, self.natural, self.display));
        if self.points.len() > 2 {
            self.points.remove(0);
        }
        self.known_distance()
    }

    /// Start dragging the marker under the pointer, or add a point if there is none.
    pub fn pointer_down(&mut self, display_pos: Point) -> Option<KnownDistance> {
        match self.marker_at(display_pos) {
            Some(index) => {
                self.dragging = Some(index);
                None
            }
            None => self.add_point(display_pos),
        }
    }

    pub fn drag_to(&mut self, display_pos: Point) -> Option<KnownDistance> {
        let index = self.dragging?;
        let point = self.points.get_mut(index)?;
        *point = geometry::to_source(display_pos, self.natural, self.display);
        self.known_distance()
    }

    pub fn release(&mut self) -> Option<KnownDistance> {
        self.dragging.take()?;
        self.known_distance()
    }

    pub fn set_distance(&mut self, text: impl Into<String>) -> Option<KnownDistance> {
        self.distance = text.into();
        self.known_distance()
    }

    /// Restore a previously recorded calibration.
    pub fn load(&mut self, known: &KnownDistance) {
        self.points = known.coordinates.to_vec();
        self.distance = known
            .meter_measurement
            .map(|m| m.to_string())
            .unwrap_or_default();
        self.dragging = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_window_keeps_last_two() {
        let mut e = ProximityEditor::default();
        assert!(e.add_point(Point::new(100.0, 100.0)).is_none());
        assert!(e.add_point(Point::new(200.0, 200.0)).is_some());
        e.add_point(Point::new(300.0, 300.0));
        assert_eq!(
            e.points(),
            &[Point::new(200.0, 200.0), Point::new(300.0, 300.0)]
        );
    }

    #[test]
    fn test_points_stored_in_source_space() {
        let mut e = ProximityEditor::default();
        e.set_viewport(Resolution::new(1000.0, 500.0), Resolution::new(500.0, 250.0));
        e.add_point(Point::new(50.0, 25.0));
        assert_eq!(e.points(), &[Point::new(100.0, 50.0)]);
        assert_eq!(e.display_points(), vec![Point::new(50.0, 25.0)]);
    }

    #[test]
    fn test_distance_enabled_only_with_two_points() {
        let mut e = ProximityEditor::default();
        assert!(!e.distance_enabled());
        e.add_point(Point::new(1.0, 1.0));
        assert!(!e.distance_enabled());
        e.add_point(Point::new(100.0, 1.0));
        assert!(e.distance_enabled());
        e.add_point(Point::new(200.0, 1.0));
        assert!(e.distance_enabled());
    }

    #[test]
    fn test_distance_edit_emits_rounded_meters() {
        let mut e = ProximityEditor::default();
        assert!(e.set_distance("3").is_none());
        e.add_point(Point::new(0.0, 0.0));
        let known = e.add_point(Point::new(100.0, 0.0)).unwrap();
        assert_eq!(known.meter_measurement, Some(3.0));

        let known = e.set_distance("2.123456").unwrap();
        assert_eq!(known.meter_measurement, Some(2.1235));
        assert_eq!(e.set_distance("").unwrap().meter_measurement, None);
        assert_eq!(e.set_distance("far").unwrap().meter_measurement, None);
    }

    #[test]
    fn test_huge_distance_is_rejected() {
        assert_eq!(parse_meters("1e305"), None);
        assert_eq!(parse_meters("123.45678"), Some(123.4568));
        assert_eq!(parse_meters(" 12.5 "), Some(12.5));
    }

    #[test]
    fn test_load_without_measurement_clears_distance() {
        let mut e = ProximityEditor::new("7".to_string(), DEFAULT_MARKER_RADIUS);
        e.load(&KnownDistance {
            coordinates: [Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
            meter_measurement: None,
        });
        assert_eq!(e.distance(), "");
        assert_eq!(e.known_distance().unwrap().meter_measurement, None);

        e.load(&KnownDistance {
            coordinates: [Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
            meter_measurement: Some(4.5),
        });
        assert_eq!(e.distance(), "4.5");
    }

    #[test]
    fn test_drag_marker_updates_point_live() {
        let mut e = ProximityEditor::default();
        e.add_point(Point::new(10.0, 10.0));
        e.add_point(Point::new(100.0, 100.0));

        assert!(e.pointer_down(Point::new(102.0, 98.0)).is_none());
        assert_eq!(e.dragging(), Some(1));
        let known = e.drag_to(Point::new(150.0, 120.0)).unwrap();
        assert_eq!(known.coordinates[1], Point::new(150.0, 120.0));
        assert_eq!(e.points().len(), 2);

        assert!(e.release().is_some());
        assert_eq!(e.dragging(), None);
        assert!(e.release().is_none());
    }

    #[test]
    fn test_click_on_marker_does_not_add() {
        let mut e = ProximityEditor::default();
        e.add_point(Point::new(10.0, 10.0));
        e.pointer_down(Point::new(12.0, 10.0));
        assert_eq!(e.points().len(), 1);
    }

    #[test]
    fn test_known_distance_json_shape() {
        let known = KnownDistance {
            coordinates: [Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
            meter_measurement: None,
        };
        let json = serde_json::to_value(&known).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"coordinates": [[1.0, 2.0], [3.0, 4.0]], "meterMeasurement": null})
        );
    }
}
