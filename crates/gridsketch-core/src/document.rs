//! The ordered line set that makes up a drawing.

use crate::line::{EndpointRef, Line, LineId};
use kurbo::Point;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Ordered collection of lines. Order is z-order and the basis of
/// index-based selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSet {
    lines: Vec<Line>,
    /// Largest id ever seen, used to keep freshly allocated ids unique.
    last_id: u64,
}

impl LineSet {
    /// Create an empty line set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a line set from already identified lines.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let mut set = Self::new();
        set.replace_all(lines);
        set
    }

    /// Allocate an id: the current time in milliseconds, bumped past any id
    /// already known to this set.
    pub fn next_id(&mut self) -> LineId {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let id = now_ms.max(self.last_id.saturating_add(1));
        self.last_id = id;
        LineId(id)
    }

    /// Append a line that already carries an id.
    pub fn add(&mut self, line: Line) {
        self.last_id = self.last_id.max(line.id.0);
        self.lines.push(line);
    }

    /// Append a new segment with a fresh id.
    pub fn push_segment(&mut self, start: Point, end: Point) -> LineId {
        let id = self.next_id();
        self.lines.push(Line::new(id, start, end));
        id
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn get_by_id(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    /// Move one endpoint. Returns false if the line is gone or the point
    /// did not change.
    pub fn set_endpoint(&mut self, target: EndpointRef, point: Point) -> bool {
        match self.lines.iter_mut().find(|line| line.id == target.line_id) {
            Some(line) if line.endpoint(target.which) != point => {
                line.set_endpoint(target.which, point);
                true
            }
            _ => false,
        }
    }

    /// Position of a referenced endpoint.
    pub fn endpoint(&self, target: EndpointRef) -> Option<Point> {
        self.get_by_id(target.line_id)
            .map(|line| line.endpoint(target.which))
    }

    /// Replace the whole record at `index`, keeping its position.
    pub fn replace(&mut self, index: usize, line: Line) -> bool {
        match self.lines.get_mut(index) {
            Some(slot) => {
                self.last_id = self.last_id.max(line.id.0);
                *slot = line;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Line> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    /// Replace every line. Ids stay reserved so later allocations do not
    /// reuse them.
    pub fn replace_all(&mut self, lines: Vec<Line>) {
        let max_id = lines.iter().map(|line| line.id.0).max().unwrap_or(0);
        self.last_id = self.last_id.max(max_id);
        self.lines = lines;
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Drop every line whose length rounds to zero millimetres.
    /// Returns how many were removed.
    pub fn prune_zero_length(&mut self) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !line.is_zero_length());
        before - self.lines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn as_slice(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a LineSet {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
