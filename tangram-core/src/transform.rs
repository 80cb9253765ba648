use crate::model::{Piece, Point, Pose};

/// One side of a world polygon, derived on demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
    pub length: f64,
    /// Direction in degrees, `atan2` convention (`(-180, 180]`).
    pub angle: f64,
    pub midpoint: Point,
}

impl Edge {
    pub fn new(start: Point, end: Point) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        Edge {
            start,
            end,
            length: dx.hypot(dy),
            angle: dy.atan2(dx).to_degrees(),
            midpoint: Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0),
        }
    }
}

fn rotate_about(p: Point, c: Point, deg: f64) -> Point {
    let dx = p.x - c.x;
    let dy = p.y - c.y;
    let (s, ca) = deg.to_radians().sin_cos();
    Point {
        x: c.x + dx * ca - dy * s,
        y: c.y + dx * s + dy * ca,
    }
}

/// Map a local outline into world space under `pose`.
///
/// Each vertex is rotated about the pivot, then shifted by the position.
/// Vertex count and order are preserved. Callers must pass at least three
/// points; [`Piece`] enforces that at construction.
pub fn transform_points(local: &[Point], pose: &Pose) -> Vec<Point> {
    local
        .iter()
        .map(|&q| rotate_about(q, pose.pivot, pose.rotation) + pose.position)
        .collect()
}

/// World-space vertices of a piece at its current pose.
pub fn world_points(piece: &Piece) -> Vec<Point> {
    transform_points(piece.local(), &piece.pose)
}

/// Closed edge loop: edge `i` joins vertex `i` to vertex `(i + 1) % n`.
pub fn edges_of(pts: &[Point]) -> Vec<Edge> {
    let n = pts.len();
    (0..n).map(|i| Edge::new(pts[i], pts[(i + 1) % n])).collect()
}
