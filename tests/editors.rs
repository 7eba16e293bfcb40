use serde_json::json;

use zone_annotate::form::{FormOutcome, FormState, DEFAULT_SWITCHES};
use zone_annotate::geometry::{to_display, to_source};
use zone_annotate::polygon::{PolygonEditor, Zone};
use zone_annotate::proximity::ProximityEditor;
use zone_annotate::trapezoid::{Orientation, TrapezoidAnnotator};
use zone_annotate::{Point, Resolution};

fn switches() -> Vec<String> {
    DEFAULT_SWITCHES.iter().map(|s| s.to_string()).collect()
}

#[test]
fn proximity_clicks_keep_last_two_points() {
    let mut editor = ProximityEditor::default();
    for p in [(100.0, 100.0), (200.0, 200.0), (300.0, 300.0)] {
        editor.pointer_down(Point::from(p));
    }
    assert_eq!(
        editor.points(),
        &[Point::new(200.0, 200.0), Point::new(300.0, 300.0)]
    );
}

#[test]
fn proximity_emits_calibration_json() {
    let mut editor = ProximityEditor::default();
    editor.set_viewport(Resolution::new(1920.0, 1080.0), Resolution::new(960.0, 540.0));
    editor.pointer_down(Point::new(10.0, 20.0));
    editor.pointer_down(Point::new(400.0, 20.0));
    let known = editor.set_distance("12.5").unwrap();
    assert_eq!(
        serde_json::to_value(&known).unwrap(),
        json!({"coordinates": [[20.0, 40.0], [800.0, 40.0]], "meterMeasurement": 12.5})
    );
}

#[test]
fn polygon_session_round_trips_through_source_space() {
    let source = Resolution::new(1280.0, 720.0);
    let mut editor = PolygonEditor::new(source, 25.0);
    editor.resize(Resolution::new(640.0, 360.0));

    let mut last = None;
    for p in [(10.0, 10.0), (300.0, 20.0), (310.0, 300.0), (15.0, 290.0)] {
        last = editor.pointer_down(Point::from(p));
        editor.pointer_up();
    }
    editor.pointer_down(Point::new(300.0, 20.0));
    last = editor.pointer_move(Point::new(320.0, 30.0)).or(last);
    editor.pointer_up();

    let zone = last.unwrap();
    assert_eq!(zone.len(), 4);
    assert_eq!(zone.coordinates[1], Point::new(640.0, 60.0));

    // The host hands the zone back after a resize; display vertices follow.
    let mut reloaded = PolygonEditor::new(source, 25.0);
    reloaded.resize(Resolution::new(1280.0, 720.0));
    reloaded.load_zone(&zone);
    assert_eq!(reloaded.vertices()[1], Point::new(640.0, 60.0));
    assert_eq!(reloaded.zone(), zone);
}

#[test]
fn polygon_hit_radius_boundary() {
    let mut editor = PolygonEditor::new(Resolution::default(), 25.0);
    editor.pointer_down(Point::new(0.0, 0.0));
    editor.pointer_down(Point::new(15.0, 20.0));
    assert_eq!(editor.selected(), Some(0));
    editor.pointer_up();
    editor.pointer_down(Point::new(15.0, 20.1));
    assert_eq!(editor.vertices().len(), 2);
}

#[test]
fn zone_file_loads_into_editor() {
    let zone: Zone = serde_json::from_value(json!({"coordinates": [[0, 0], [1280, 720]]})).unwrap();
    let mut editor = PolygonEditor::new(Resolution::new(1280.0, 720.0), 25.0);
    editor.resize(Resolution::new(320.0, 180.0));
    editor.load_zone(&zone);
    assert_eq!(editor.vertices()[1], Point::new(320.0, 180.0));
}

#[test]
fn coordinate_round_trip_grid() {
    let source = Resolution::new(1280.0, 720.0);
    for display in [Resolution::new(333.0, 777.0), Resolution::new(1920.0, 1080.0)] {
        for x in [-50.0_f32, 0.0, 17.3, 1280.0, 2000.0] {
            let p = Point::new(x, x * 0.5);
            let back = to_source(to_display(p, source, display), source, display);
            assert!((back.x - p.x).abs() < 1e-3);
            assert!((back.y - p.y).abs() < 1e-3);
        }
    }
}

#[test]
fn trapezoid_coupling_survives_resize_and_toggle() {
    let mut t = TrapezoidAnnotator::new(Orientation::Horizontal);
    t.video_ready(Resolution::new(1280.0, 720.0));
    t.resize(640.0);
    t.drag_anchor(3, Point::new(40.0, 330.0));
    let a = t.anchors().unwrap();
    assert_eq!(a[2].y, a[3].y);
    assert_eq!(a[0].y, a[1].y);

    t.toggle_orientation();
    t.drag_anchor(2, Point::new(500.0, 300.0));
    let a = t.anchors().unwrap();
    assert_eq!(a[1].x, a[2].x);
    assert_eq!(a[0].x, a[3].x);
}

#[test]
fn form_prepopulates_and_submits() {
    let schema = json!({"A": {"f1": "string"}});
    let mut form = FormState::new(&schema, None, true, switches()).unwrap();
    assert_eq!(form.values()["processors"]["A"]["f1"], json!(""));

    form.set_value("A.f1", "rtsp://cam");
    let FormOutcome::Saved(values) = form.submit() else {
        panic!("expected saved outcome");
    };
    assert_eq!(values, json!({"processors": {"A": {"f1": "rtsp://cam"}}}));
}
