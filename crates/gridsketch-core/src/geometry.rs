//! Pure geometry helpers shared by snapping, hit-testing and length display.

use kurbo::{Point, Vec2};

use crate::snap::GRID_SIZE;

/// One coarse grid unit is one centimetre.
pub const MILLIMETERS_PER_GRID_UNIT: f64 = 10.0;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `point` to the segment `a`-`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to that endpoint. A zero-length segment degrades to the
/// distance to `a`.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq == 0.0 {
        return distance(point, a);
    }

    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let projection = a + seg * t;
    distance(point, projection)
}

/// Length of a segment in whole millimetres.
///
/// Returns 0 when either endpoint is missing, which is how the preview
/// readout behaves before a line has been started.
pub fn length_in_millimeters(a: Option<Point>, b: Option<Point>) -> i64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            (distance(a, b) / GRID_SIZE * MILLIMETERS_PER_GRID_UNIT).round() as i64
        }
        _ => 0,
    }
}

/// Endpoint reached by walking `length_mm` millimetres from `start` along
/// `direction`.
///
/// Only the angle of `direction` matters. A zero vector points along +x.
pub fn point_from_length_and_direction(start: Point, length_mm: f64, direction: Vec2) -> Point {
    let angle = direction.y.atan2(direction.x);
    let world_length = length_mm / MILLIMETERS_PER_GRID_UNIT * GRID_SIZE;
    Point::new(
        start.x + world_length * angle.cos(),
        start.y + world_length * angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_to_segment_perpendicular() {
        let d = distance_to_segment(
            Point::new(50.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        assert!((d - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_distance_to_segment_clamps_to_ends() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        let before = distance_to_segment(Point::new(-30.0, 40.0), a, b);
        let after = distance_to_segment(Point::new(103.0, 4.0), a, b);
        assert!((before - 50.0).abs() < 1e-10);
        assert!((after - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let a = Point::new(20.0, 20.0);
        let p = Point::new(23.0, 24.0);
        assert_eq!(distance_to_segment(p, a, a), distance(p, a));
    }

    #[test]
    fn test_length_in_millimeters() {
        let a = Some(Point::new(100.0, 100.0));
        let b = Some(Point::new(200.0, 100.0));
        assert_eq!(length_in_millimeters(a, b), 50);
    }

    #[test]
    fn test_length_is_symmetric() {
        let pairs = [
            (Point::new(0.0, 0.0), Point::new(13.0, 7.0)),
            (Point::new(-40.0, 12.5), Point::new(220.0, -3.0)),
            (Point::new(5.0, 5.0), Point::new(5.0, 5.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(
                length_in_millimeters(Some(a), Some(b)),
                length_in_millimeters(Some(b), Some(a))
            );
        }
    }

    #[test]
    fn test_length_missing_point_is_zero() {
        assert_eq!(length_in_millimeters(None, Some(Point::new(40.0, 0.0))), 0);
        assert_eq!(length_in_millimeters(Some(Point::ZERO), None), 0);
    }

    #[test]
    fn test_point_from_length_and_direction() {
        let start = Point::new(100.0, 100.0);
        let end = point_from_length_and_direction(start, 50.0, Vec2::new(1.0, 0.0));
        assert!((end.x - 200.0).abs() < 1e-9);
        assert!((end.y - 100.0).abs() < 1e-9);

        // Direction magnitude is irrelevant
        let end = point_from_length_and_direction(start, 30.0, Vec2::new(0.0, 7.0));
        assert!((end.x - 100.0).abs() < 1e-9);
        assert!((end.y - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_from_length_inverts_length() {
        let start = Point::new(0.0, 0.0);
        let end = point_from_length_and_direction(start, 75.0, Vec2::new(3.0, 4.0));
        assert_eq!(length_in_millimeters(Some(start), Some(end)), 75);
    }
}
