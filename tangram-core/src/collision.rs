//! Overlap guard run on every drag tick.
//!
//! A separating-axis pass rules out clearly disjoint pairs; survivors get an
//! exact intersection polygon by half-plane clipping, whose area decides.

use crate::config::DEFAULT_ALLOW_THRESHOLD;
use crate::model::{Point, signed_area};

/// Clip edges whose determinant falls below this are treated as parallel.
const PARALLEL_EPS: f64 = 1e-10;

fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

fn project(poly: &[Point], axis: Point) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in poly {
        let dot = p.x * axis.x + p.y * axis.y;
        lo = lo.min(dot);
        hi = hi.max(dot);
    }
    (lo, hi)
}

/// Separating-axis test over every edge normal of both outlines.
///
/// Exact for convex outlines and conservative (may report overlap) for
/// concave ones. Shared edges or corners do not count as overlap.
pub fn polygons_overlap(a: &[Point], b: &[Point]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    for poly in [a, b] {
        let n = poly.len();
        for i in 0..n {
            let e = poly[(i + 1) % n] - poly[i];
            if e.x == 0.0 && e.y == 0.0 {
                continue;
            }
            let axis = Point::new(-e.y, e.x);
            let (min_a, max_a) = project(a, axis);
            let (min_b, max_b) = project(b, axis);
            if max_a <= min_b || max_b <= min_a {
                return false;
            }
        }
    }
    true
}

/// Where segment `p1 -> p2` crosses the infinite line through `e1 -> e2`.
fn line_intersection(p1: Point, p2: Point, e1: Point, e2: Point) -> Option<Point> {
    let r = p2 - p1;
    let s = e2 - e1;
    let det = cross(r, s);
    if det.abs() < PARALLEL_EPS {
        return None;
    }
    let t = cross(e1 - p1, s) / det;
    Some(Point::new(p1.x + t * r.x, p1.y + t * r.y))
}

fn clip_against_edge(poly: &[Point], e1: Point, e2: Point, orient: f64) -> Vec<Point> {
    let inside = |p: Point| cross(e2 - e1, p - e1) * orient >= 0.0;
    let n = poly.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let cur = poly[i];
        let next = poly[(i + 1) % n];
        match (inside(cur), inside(next)) {
            (true, true) => out.push(cur),
            (true, false) => {
                out.push(cur);
                if let Some(p) = line_intersection(cur, next, e1, e2) {
                    out.push(p);
                }
            }
            (false, true) => {
                if let Some(p) = line_intersection(cur, next, e1, e2) {
                    out.push(p);
                }
            }
            (false, false) => {}
        }
    }
    out
}

/// Intersection of `subject` with `clip`, clipping against each edge of
/// `clip` in order. Either winding is accepted for both outlines; `clip` is
/// assumed convex.
pub fn intersection_polygon(subject: &[Point], clip: &[Point]) -> Vec<Point> {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }
    let orient = signed_area(clip).signum();
    if orient == 0.0 {
        return Vec::new();
    }
    let n = clip.len();
    let mut out = subject.to_vec();
    for i in 0..n {
        out = clip_against_edge(&out, clip[i], clip[(i + 1) % n], orient);
        if out.is_empty() {
            break;
        }
    }
    out
}

/// Absolute area of the overlap between two outlines.
pub fn intersection_area(a: &[Point], b: &[Point]) -> f64 {
    let poly = intersection_polygon(a, b);
    if poly.len() < 3 {
        return 0.0;
    }
    signed_area(&poly).abs()
}

/// Decide whether moving a piece to `candidate` must be reverted.
///
/// Each other outline is tested in turn; the first blocking pair wins. A
/// pair blocks when the outlines intersect and the overlap, as a fraction
/// of `candidate_area`, is *below* `allow_threshold`. Larger overlaps are
/// let through. Degenerate input never blocks.
pub fn is_blocked(
    candidate: &[Point],
    others: &[Vec<Point>],
    candidate_area: f64,
    allow_threshold: f64,
) -> bool {
    if candidate.len() < 3 || !(candidate_area.is_finite() && candidate_area > 0.0) {
        return false;
    }
    for (idx, other) in others.iter().enumerate() {
        if !polygons_overlap(candidate, other) {
            continue;
        }
        let ratio = intersection_area(candidate, other) / candidate_area;
        if ratio < allow_threshold {
            tracing::debug!(other = idx, ratio, allow_threshold, "move blocked by overlap");
            return true;
        }
    }
    false
}

/// [`is_blocked`] with the stock threshold.
pub fn is_blocked_default(candidate: &[Point], others: &[Vec<Point>], candidate_area: f64) -> bool {
    is_blocked(candidate, others, candidate_area, DEFAULT_ALLOW_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_at(x: f64, y: f64, side: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ]
    }

    #[test]
    fn sat_separated_touching_and_overlapping() {
        let a = square_at(0.0, 0.0, 1.0);
        assert!(!polygons_overlap(&a, &square_at(3.0, 0.0, 1.0)));
        assert!(!polygons_overlap(&a, &square_at(1.0, 0.0, 1.0)));
        assert!(!polygons_overlap(&a, &square_at(1.0, 1.0, 1.0)));
        assert!(polygons_overlap(&a, &square_at(0.5, 0.5, 1.0)));
    }

    #[test]
    fn sat_catches_rotated_diamond() {
        let a = square_at(0.0, 0.0, 2.0);
        let diamond = vec![
            Point::new(1.0, -0.5),
            Point::new(2.5, 1.0),
            Point::new(1.0, 2.5),
            Point::new(-0.5, 1.0),
        ];
        assert!(polygons_overlap(&a, &diamond));
        let far = vec![
            Point::new(4.0, 2.5),
            Point::new(5.0, 3.5),
            Point::new(4.0, 4.5),
            Point::new(3.0, 3.5),
        ];
        assert!(!polygons_overlap(&a, &far));
    }

    #[test]
    fn clipped_area_of_offset_squares() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(0.5, 0.5, 1.0);
        assert_abs_diff_eq!(intersection_area(&a, &b), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn clipping_ignores_winding() {
        let a = square_at(0.0, 0.0, 1.0);
        let mut b = square_at(0.5, 0.0, 1.0);
        b.reverse();
        assert_abs_diff_eq!(intersection_area(&a, &b), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(intersection_area(&b, &a), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn contained_triangle_keeps_its_area() {
        let sq = square_at(0.0, 0.0, 4.0);
        let tri = vec![
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 3.0),
        ];
        assert_abs_diff_eq!(intersection_area(&tri, &sq), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn disjoint_clip_is_empty() {
        let a = square_at(0.0, 0.0, 1.0);
        let b = square_at(5.0, 5.0, 1.0);
        assert!(intersection_polygon(&a, &b).is_empty());
        assert_eq!(intersection_area(&a, &b), 0.0);
    }

    #[test]
    fn parallel_segment_yields_no_point() {
        let p = line_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(2.0, 1.0),
        );
        assert!(p.is_none());
        let hit = line_intersection(
            Point::new(0.5, -1.0),
            Point::new(0.5, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(hit.x, 0.5);
        assert_abs_diff_eq!(hit.y, 0.0);
    }

    #[test]
    fn small_overlap_blocks_large_overlap_passes() {
        let other = vec![square_at(0.0, 0.0, 1.0)];
        let ten_percent = square_at(0.9, 0.0, 1.0);
        assert!(is_blocked(&ten_percent, &other, 1.0, 0.15));
        let twenty_percent = square_at(0.8, 0.0, 1.0);
        assert!(!is_blocked(&twenty_percent, &other, 1.0, 0.15));
        let on_top = square_at(0.0, 0.0, 1.0);
        assert!(!is_blocked(&on_top, &other, 1.0, 0.15));
    }

    #[test]
    fn touching_or_distant_pieces_never_block() {
        let other = vec![square_at(0.0, 0.0, 1.0)];
        assert!(!is_blocked_default(&square_at(1.0, 0.0, 1.0), &other, 1.0));
        assert!(!is_blocked_default(&square_at(4.0, 4.0, 1.0), &other, 1.0));
    }

    #[test]
    fn any_blocking_neighbour_blocks() {
        let others = vec![square_at(10.0, 10.0, 1.0), square_at(0.0, 0.0, 1.0)];
        assert!(is_blocked_default(&square_at(0.95, 0.0, 1.0), &others, 1.0));
    }

    #[test]
    fn degenerate_inputs_do_not_block() {
        let cand = square_at(0.9, 0.0, 1.0);
        assert!(!is_blocked_default(&cand, &[], 1.0));
        let other = vec![square_at(0.0, 0.0, 1.0)];
        assert!(!is_blocked_default(&cand, &other, 0.0));
        assert!(!is_blocked_default(&cand, &other, f64::NAN));
        assert!(!is_blocked_default(&cand[..2], &other, 1.0));
    }
}
