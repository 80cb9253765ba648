use geo::{Area, Centroid};
use geo_types::{LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Basic two dimensional point used for geometry operations.
///
/// Serialized as a `[x, y]` pair so puzzle files stay compact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Point { x: v[0], y: v[1] }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }
}

/// Placement of a piece: rotation about `pivot` (local frame), then a
/// translation by `position`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    /// Degrees, counter-clockwise positive, always in `[0, 360)`.
    pub rotation: f64,
    pub pivot: Point,
}

impl Pose {
    pub fn new(position: Point, rotation: f64, pivot: Point) -> Self {
        Pose {
            position,
            rotation: normalize_degrees(rotation),
            pivot,
        }
    }

    pub fn with_rotation(self, rotation: f64) -> Self {
        Pose {
            rotation: normalize_degrees(rotation),
            ..self
        }
    }

    pub fn with_position(self, position: Point) -> Self {
        Pose { position, ..self }
    }
}

/// One tangram piece with its immutable local outline and a mutable pose.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub id: u32,
    pub pose: Pose,
    /// Display color, `#rrggbb`. Never read by the geometry.
    pub color: String,
    local: Vec<Point>,
    area: f64,
    placed: bool,
}

impl Piece {
    /// Build a piece, validating the outline and caching its area.
    pub fn new(id: u32, local: Vec<Point>, pose: Pose, color: impl Into<String>) -> Result<Self> {
        if local.len() < 3 {
            return Err(EngineError::TooFewVertices { len: local.len() });
        }
        let area = to_geo_polygon(&local).unsigned_area();
        if area.is_nan() || area <= 0.0 {
            return Err(EngineError::DegenerateArea);
        }
        Ok(Piece {
            id,
            pose: Pose::new(pose.position, pose.rotation, pose.pivot),
            color: color.into(),
            local,
            area,
            placed: false,
        })
    }

    /// Like [`Piece::new`] but rotates about the outline's centroid.
    pub fn with_default_pivot(
        id: u32,
        local: Vec<Point>,
        position: Point,
        rotation: f64,
        color: impl Into<String>,
    ) -> Result<Self> {
        let pivot = centroid(&local).ok_or(EngineError::DegenerateArea)?;
        Piece::new(id, local, Pose::new(position, rotation, pivot), color)
    }

    pub fn local(&self) -> &[Point] {
        &self.local
    }

    /// Absolute area of the local outline.
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub(crate) fn set_placed(&mut self, placed: bool) {
        self.placed = placed;
    }
}

/// One fragment of the silhouette, already in world coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetPolygon {
    pub id: u32,
    pub points: Vec<Point>,
}

impl TargetPolygon {
    pub fn new(id: u32, points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 {
            return Err(EngineError::TooFewVertices { len: points.len() });
        }
        Ok(TargetPolygon { id, points })
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Smallest unsigned angle between two directions, in `[0, 180]`.
pub fn angle_distance(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Shoelace sum; sign follows the winding.
pub fn signed_area(pts: &[Point]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut s = 0.0;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        s += a.x * b.y - b.x * a.y;
    }
    s / 2.0
}

pub(crate) fn to_geo_polygon(pts: &[Point]) -> Polygon<f64> {
    let ring: Vec<(f64, f64)> = pts.iter().map(|p| (p.x, p.y)).collect();
    Polygon::new(LineString::from(ring), vec![])
}

fn centroid(pts: &[Point]) -> Option<Point> {
    to_geo_polygon(pts)
        .centroid()
        .map(|c| Point::new(c.x(), c.y()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square(side: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ]
    }

    #[test]
    fn piece_caches_absolute_area() {
        let mut pts = square(2.0);
        pts.reverse();
        let p = Piece::new(1, pts, Pose::default(), "#000000").unwrap();
        assert_abs_diff_eq!(p.area(), 4.0, epsilon = 1e-12);
        assert!(!p.is_placed());
    }

    #[test]
    fn piece_rejects_short_and_flat_outlines() {
        let two = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert_eq!(
            Piece::new(1, two, Pose::default(), "#000000"),
            Err(EngineError::TooFewVertices { len: 2 })
        );
        let flat = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        assert_eq!(
            Piece::new(1, flat, Pose::default(), "#000000"),
            Err(EngineError::DegenerateArea)
        );
    }

    #[test]
    fn default_pivot_is_centroid() {
        let p = Piece::with_default_pivot(3, square(4.0), Point::new(5.0, 5.0), 0.0, "#fff")
            .unwrap();
        assert_abs_diff_eq!(p.pose.pivot.x, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.pose.pivot.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn rotation_is_normalized() {
        assert_abs_diff_eq!(normalize_degrees(-90.0), 270.0);
        assert_abs_diff_eq!(normalize_degrees(720.0), 0.0);
        assert_abs_diff_eq!(normalize_degrees(359.5), 359.5);
        let pose = Pose::new(Point::default(), -30.0, Point::default());
        assert_abs_diff_eq!(pose.rotation, 330.0);
        assert_abs_diff_eq!(pose.with_rotation(370.0).rotation, 10.0);
    }

    #[test]
    fn angle_distance_wraps() {
        assert_abs_diff_eq!(angle_distance(179.0, -179.0), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_distance(0.0, 180.0), 180.0);
        assert_abs_diff_eq!(angle_distance(10.0, 350.0), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Point = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(back, Point::new(3.0, 4.0));
    }

    #[test]
    fn shoelace_sign_follows_winding() {
        let ccw = square(1.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_abs_diff_eq!(signed_area(&ccw), 1.0);
        assert_abs_diff_eq!(signed_area(&cw), -1.0);
        assert_abs_diff_eq!(signed_area(&ccw[..2]), 0.0);
    }
}
