//! Click-to-add / drag-to-move vertex editor.
//!
//! Vertices are edited in display space. The persisted form is a [`Zone`] in
//! source-resolution space; every change re-emits the whole zone.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point, Resolution};

pub const DEFAULT_HIT_RADIUS: f32 = 25.0;

/// A vertex list expressed in source-resolution coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub coordinates: Vec<Point>,
}

impl Zone {
    pub fn new(coordinates: Vec<Point>) -> Self {
        Self { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditState {
    Idle,
    DraggingVertex { index: usize },
}

#[derive(Clone, Debug)]
pub struct PolygonEditor {
    vertices: Vec<Point>,
    source: Resolution,
    display: Resolution,
    hit_radius: f32,
    state: EditState,
}

impl PolygonEditor {
    pub fn new(source: Resolution, hit_radius: f32) -> Self {
        Self {
            vertices: Vec::new(),
            source,
            display: Resolution::default(),
            hit_radius,
            state: EditState::Idle,
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn display(&self) -> Resolution {
        self.display
    }

    pub fn source(&self) -> Resolution {
        self.source
    }

    /// Vertex currently being dragged, if any.
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            EditState::DraggingVertex { index } => Some(index),
            EditState::Idle => None,
        }
    }

    /// The outline is only drawn closed once it can enclose an area.
    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Current vertices projected back into source space.
    pub fn zone(&self) -> Zone {
        Zone::new(
            self.vertices
                .iter()
                .map(|&p| geometry::to_source(p, self.source, self.display))
                .collect(),
        )
    }

    /// Replace the vertices with an externally supplied zone.
    pub fn load_zone(&mut self, zone: &Zone) {
        self.vertices = zone
            .coordinates
            .iter()
            .map(|&p| geometry::to_display(p, self.source, self.display))
            .collect();
        self.state = EditState::Idle;
    }

    /// Re-derive display vertices for a new viewport size.
    pub fn resize(&mut self, display: Resolution) {
        if display == self.display {
            return;
        }
        let zone = self.zone();
        self.display = display;
        self.vertices = zone
            .coordinates
            .iter()
            .map(|&p| geometry::to_display(p, self.source, self.display))
            .collect();
    }

    pub fn hit_test(&self, pos: Point) -> Option<usize> {
        geometry::hit_test(&self.vertices, self.hit_radius, pos)
    }

    /// Select the vertex under the pointer, or append a new one.
    ///
    /// Returns the updated zone when the vertex list changed.
    pub fn pointer_down(&mut self, pos: Point) -> Option<Zone> {
        match self.hit_test(pos) {
            Some(index) => {
                self.state = EditState::DraggingVertex { index };
                None
            }
            None => {
                self.vertices.push(pos);
                self.state = EditState::Idle;
                Some(self.zone())
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Point) -> Option<Zone> {
        let EditState::DraggingVertex { index } = self.state else {
            return None;
        };
        let vertex = self.vertices.get_mut(index)?;
        *vertex = pos;
        Some(self.zone())
    }

    pub fn pointer_up(&mut self) {
        self.state = EditState::Idle;
    }

    pub fn clear(&mut self) -> Zone {
        self.vertices.clear();
        self.state = EditState::Idle;
        self.zone()
    }
}
