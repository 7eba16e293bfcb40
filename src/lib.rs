//! Zone annotation editors: polygon zones, two-point distance calibration and
//! trapezoid areas over a camera frame, plus a schema-driven settings form.
//!
//! The editor state machines (`polygon`, `proximity`, `trapezoid`, `form`) are
//! plain Rust; `ui` wires them to egui.

pub mod error;
pub mod form;
pub mod geometry;
pub mod input;
pub mod polygon;
pub mod proximity;
pub mod settings;
pub mod trapezoid;
pub mod ui;

pub use error::{Error, Result};
pub use geometry::{Point, Resolution};
