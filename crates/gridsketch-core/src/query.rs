//! Spatial queries over the line set: endpoint proximity and line picking.
//!
//! Both queries are linear scans. At the scale this editor targets (tens to
//! a few hundred lines) that is cheaper than maintaining an index.

use crate::document::LineSet;
use crate::geometry::{distance, distance_to_segment};
use crate::line::{EndpointRef, LineId};
use kurbo::Point;

/// Distances closer than this are treated as a tie.
const TIE_EPSILON: f64 = 1e-9;

/// Endpoints a query should ignore.
///
/// A drag must not snap onto the very endpoint (or line) it is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exclude {
    #[default]
    Nothing,
    Endpoint(EndpointRef),
    Line(LineId),
}

impl Exclude {
    fn skips(&self, endpoint: EndpointRef) -> bool {
        match *self {
            Exclude::Nothing => false,
            Exclude::Endpoint(excluded) => excluded == endpoint,
            Exclude::Line(id) => endpoint.line_id == id,
        }
    }
}

/// First endpoint within `threshold` of `point`, in store order (start
/// before end), followed by the pending start point.
///
/// This is first-match, not nearest: when two endpoints are both in range
/// the earlier line wins.
pub fn find_nearby_endpoint(
    point: Point,
    lines: &LineSet,
    pending: Option<Point>,
    threshold: f64,
    exclude: Exclude,
) -> Option<Point> {
    if let Some(hit) = find_endpoint_at(point, lines, threshold, exclude) {
        return lines
            .get_by_id(hit.line_id)
            .map(|line| line.endpoint(hit.which));
    }
    pending.filter(|p| distance(point, *p) < threshold)
}

/// Which stored endpoint lies within `threshold` of `point`, first match.
pub fn find_endpoint_at(
    point: Point,
    lines: &LineSet,
    threshold: f64,
    exclude: Exclude,
) -> Option<EndpointRef> {
    lines.iter().find_map(|line| {
        line.endpoints().into_iter().find_map(|(which, p)| {
            let endpoint = EndpointRef::new(line.id, which);
            (!exclude.skips(endpoint) && distance(point, p) < threshold).then_some(endpoint)
        })
    })
}

/// A line picked by [`find_line_at_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    /// Position in the line set.
    pub index: usize,
    pub id: LineId,
    /// Distance from the query point to the segment.
    pub distance: f64,
}

/// The line closest to `point` with a distance under `threshold`.
///
/// On equal distance the shorter line wins, so a short segment is not
/// shadowed by a long one passing through the same spot. Every line is
/// examined; there is no early exit.
pub fn find_line_at_point(point: Point, lines: &LineSet, threshold: f64) -> Option<LineHit> {
    let mut best: Option<(LineHit, f64)> = None;

    for (index, line) in lines.iter().enumerate() {
        let d = distance_to_segment(point, line.start, line.end);
        if d >= threshold {
            continue;
        }

        let length = line.length();
        let better = match best {
            None => true,
            Some((hit, best_length)) => {
                if (d - hit.distance).abs() < TIE_EPSILON {
                    length < best_length
                } else {
                    d < hit.distance
                }
            }
        };

        if better {
            best = Some((
                LineHit {
                    index,
                    id: line.id,
                    distance: d,
                },
                length,
            ));
        }
    }

    best.map(|(hit, _)| hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{Endpoint, Line};

    fn lines_from(segments: &[((f64, f64), (f64, f64))]) -> LineSet {
        let mut set = LineSet::new();
        for (i, (a, b)) in segments.iter().enumerate() {
            set.add(Line::new(
                LineId(i as u64 + 1),
                Point::new(a.0, a.1),
                Point::new(b.0, b.1),
            ));
        }
        set
    }

    #[test]
    fn test_nearby_endpoint_none_when_far() {
        let lines = lines_from(&[((0.0, 0.0), (100.0, 0.0))]);
        let found = find_nearby_endpoint(Point::new(50.0, 50.0), &lines, None, 10.0, Exclude::Nothing);
        assert!(found.is_none());
    }

    #[test]
    fn test_nearby_endpoint_first_match_wins() {
        // Second line's start is nearer, but the first line is scanned first
        let lines = lines_from(&[((0.0, 0.0), (100.0, 0.0)), ((104.0, 0.0), (200.0, 0.0))]);
        let found = find_nearby_endpoint(Point::new(103.0, 0.0), &lines, None, 10.0, Exclude::Nothing);
        assert_eq!(found, Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_nearby_endpoint_includes_pending_start() {
        let lines = LineSet::new();
        let pending = Some(Point::new(40.0, 40.0));
        let found = find_nearby_endpoint(Point::new(43.0, 41.0), &lines, pending, 10.0, Exclude::Nothing);
        assert_eq!(found, pending);
    }

    #[test]
    fn test_nearby_endpoint_respects_exclusion() {
        let lines = lines_from(&[((0.0, 0.0), (100.0, 0.0))]);
        let own = EndpointRef::new(LineId(1), Endpoint::End);

        let found = find_nearby_endpoint(Point::new(98.0, 0.0), &lines, None, 10.0, Exclude::Endpoint(own));
        assert!(found.is_none());

        let found = find_nearby_endpoint(Point::new(2.0, 0.0), &lines, None, 10.0, Exclude::Line(LineId(1)));
        assert!(found.is_none());
    }

    #[test]
    fn test_find_endpoint_at_reports_which() {
        let lines = lines_from(&[((0.0, 0.0), (100.0, 0.0)), ((0.0, 100.0), (100.0, 100.0))]);
        let hit = find_endpoint_at(Point::new(97.0, 104.0), &lines, 10.0, Exclude::Nothing);
        assert_eq!(hit, Some(EndpointRef::new(LineId(2), Endpoint::End)));
    }

    #[test]
    fn test_line_at_point_below_threshold() {
        let lines = lines_from(&[((0.0, 0.0), (100.0, 0.0))]);
        let hit = find_line_at_point(Point::new(50.0, 4.0), &lines, 10.0).unwrap();
        assert_eq!(hit.index, 0);
        assert!((hit.distance - 4.0).abs() < 1e-10);

        // Threshold is exclusive
        assert!(find_line_at_point(Point::new(50.0, 10.0), &lines, 10.0).is_none());
    }

    #[test]
    fn test_line_at_point_picks_closer() {
        let lines = lines_from(&[((0.0, 0.0), (100.0, 0.0)), ((0.0, 6.0), (100.0, 6.0))]);
        let hit = find_line_at_point(Point::new(50.0, 5.0), &lines, 10.0).unwrap();
        assert_eq!(hit.id, LineId(2));
    }

    #[test]
    fn test_line_at_point_tie_prefers_shorter() {
        // Both segments are exactly 3.0 away; lengths 120 and 40
        let lines = lines_from(&[((0.0, 0.0), (120.0, 0.0)), ((40.0, 6.0), (80.0, 6.0))]);
        let hit = find_line_at_point(Point::new(60.0, 3.0), &lines, 10.0).unwrap();
        assert_eq!(hit.id, LineId(2));
        assert_eq!(hit.index, 1);

        // Order does not matter
        let lines = lines_from(&[((40.0, 6.0), (80.0, 6.0)), ((0.0, 0.0), (120.0, 0.0))]);
        let hit = find_line_at_point(Point::new(60.0, 3.0), &lines, 10.0).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_line_at_point_empty_set() {
        assert!(find_line_at_point(Point::ZERO, &LineSet::new(), 10.0).is_none());
    }
}
