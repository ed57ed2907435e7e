//! Snap functionality for aligning points to the grid and existing endpoints.

use crate::document::LineSet;
use crate::query::{Exclude, find_nearby_endpoint};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Grid size for snapping (matches the visual grid). One coarse unit.
pub const GRID_SIZE: f64 = 20.0;

/// Number of fine subdivisions per coarse grid unit.
pub const FINE_SUBDIVISIONS: f64 = 10.0;

/// Grid granularity used for snapping and for the fine grid overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridMode {
    /// Snap to whole grid units.
    #[default]
    Coarse,
    /// Snap to tenths of a grid unit.
    Fine,
}

impl GridMode {
    /// Toggle between coarse and fine.
    pub fn toggled(self) -> Self {
        match self {
            GridMode::Coarse => GridMode::Fine,
            GridMode::Fine => GridMode::Coarse,
        }
    }

    /// Snap spacing in world units.
    pub fn size(self) -> f64 {
        match self {
            GridMode::Coarse => GRID_SIZE,
            GridMode::Fine => GRID_SIZE / FINE_SUBDIVISIONS,
        }
    }
}

/// What a snapped point locked onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// An existing line endpoint (or the pending start point).
    Endpoint,
    /// A grid intersection.
    Grid,
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    pub kind: SnapKind,
}

impl SnapResult {
    pub fn is_endpoint(&self) -> bool {
        self.kind == SnapKind::Endpoint
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Snap to an endpoint within `threshold` if there is one, else to the grid.
pub fn snap_point(
    point: Point,
    lines: &LineSet,
    pending: Option<Point>,
    threshold: f64,
    exclude: Exclude,
    mode: GridMode,
) -> SnapResult {
    match find_nearby_endpoint(point, lines, pending, threshold, exclude) {
        Some(endpoint) => SnapResult {
            point: endpoint,
            kind: SnapKind::Endpoint,
        },
        None => SnapResult {
            point: snap_to_grid(point, mode.size()),
            kind: SnapKind::Grid,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let p = snap_to_grid(Point::new(15.0, 25.0), 20.0);
        assert!((p.x - 20.0).abs() < f64::EPSILON);
        assert!((p.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_to_grid_exact() {
        let p = snap_to_grid(Point::new(100.0, 100.0), GRID_SIZE);
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_snap_to_grid_rounds_each_axis() {
        let p = snap_to_grid(Point::new(205.0, 89.0), GRID_SIZE);
        assert_eq!(p, Point::new(200.0, 80.0));
    }

    #[test]
    fn test_snap_to_grid_is_idempotent() {
        for mode in [GridMode::Coarse, GridMode::Fine] {
            for raw in [
                Point::new(13.7, -41.2),
                Point::new(0.9, 1234.5),
                Point::new(-7.0, -7.0),
            ] {
                let once = snap_to_grid(raw, mode.size());
                let twice = snap_to_grid(once, mode.size());
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_grid_mode_sizes() {
        assert!((GridMode::Coarse.size() - 20.0).abs() < f64::EPSILON);
        assert!((GridMode::Fine.size() - 2.0).abs() < f64::EPSILON);
        assert_eq!(GridMode::Coarse.toggled(), GridMode::Fine);
        assert_eq!(GridMode::Fine.toggled(), GridMode::Coarse);
    }

    #[test]
    fn test_snap_point_prefers_endpoint() {
        let mut lines = LineSet::new();
        lines.push_segment(Point::new(13.0, 13.0), Point::new(100.0, 13.0));

        let result = snap_point(
            Point::new(16.0, 11.0),
            &lines,
            None,
            10.0,
            Exclude::Nothing,
            GridMode::Coarse,
        );
        assert_eq!(result.kind, SnapKind::Endpoint);
        assert_eq!(result.point, Point::new(13.0, 13.0));
    }

    #[test]
    fn test_snap_point_falls_back_to_grid() {
        let lines = LineSet::new();
        let result = snap_point(
            Point::new(31.0, 9.0),
            &lines,
            None,
            10.0,
            Exclude::Nothing,
            GridMode::Fine,
        );
        assert_eq!(result.kind, SnapKind::Grid);
        assert_eq!(result.point, Point::new(32.0, 10.0));
    }
}
