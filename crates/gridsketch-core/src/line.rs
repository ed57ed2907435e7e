//! Line segment type.

use crate::geometry::{distance, length_in_millimeters};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique line identifier (creation timestamp in milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// Reference to one endpoint of a stored line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    pub line_id: LineId,
    pub which: Endpoint,
}

impl EndpointRef {
    pub fn new(line_id: LineId, which: Endpoint) -> Self {
        Self { line_id, which }
    }
}

/// A straight segment between two world points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(id: LineId, start: Point, end: Point) -> Self {
        Self { id, start, end }
    }

    /// Position of the given endpoint.
    pub fn endpoint(&self, which: Endpoint) -> Point {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Replace one endpoint.
    pub fn set_endpoint(&mut self, which: Endpoint, point: Point) {
        match which {
            Endpoint::Start => self.start = point,
            Endpoint::End => self.end = point,
        }
    }

    /// Both endpoints, start first.
    pub fn endpoints(&self) -> [(Endpoint, Point); 2] {
        [(Endpoint::Start, self.start), (Endpoint::End, self.end)]
    }

    /// Length in world units.
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Length in whole millimetres.
    pub fn length_mm(&self) -> i64 {
        length_in_millimeters(Some(self.start), Some(self.end))
    }

    /// Whether the line rounds to zero millimetres.
    pub fn is_zero_length(&self) -> bool {
        self.length_mm() == 0
    }

    /// Vector from start to end.
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// The same line shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            id: self.id,
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}
