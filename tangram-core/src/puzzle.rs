use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::model::{Piece, Point, Pose, TargetPolygon};
use crate::palette::piece_color;
use crate::session::PuzzleSession;

/// Side of one grid step of the standard set when a puzzle file omits it.
pub const DEFAULT_UNIT: f64 = 25.0;

/// Piece definition as stored by the editor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PieceSpec {
    pub id: u32,
    pub points: Vec<Point>,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    // rotation center in local coordinates; centroid when absent
    #[serde(default)]
    pub pivot: Option<Point>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Full puzzle: the silhouette plus the pieces used to fill it.
///
/// When `pieces` is empty the classic seven-piece set is used, sized by
/// `unit`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    #[serde(default)]
    pub name: String,
    pub targets: Vec<TargetPolygon>,
    #[serde(default)]
    pub pieces: Vec<PieceSpec>,
    pub unit: Option<f64>,
}

impl PuzzleDefinition {
    pub fn from_json_str(txt: &str) -> Result<Self> {
        serde_json::from_str(txt).map_err(|e| EngineError::Parse(e.to_string()))
    }

    pub fn build_targets(&self) -> Result<Vec<TargetPolygon>> {
        self.targets
            .iter()
            .map(|t| TargetPolygon::new(t.id, t.points.clone()))
            .collect()
    }

    pub fn build_pieces(&self) -> Result<Vec<Piece>> {
        if self.pieces.is_empty() {
            return standard_set(self.unit.unwrap_or(DEFAULT_UNIT));
        }
        self.pieces
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let color = spec.color.clone().unwrap_or_else(|| piece_color(i));
                match spec.pivot {
                    Some(pivot) => Piece::new(
                        spec.id,
                        spec.points.clone(),
                        Pose::new(spec.position, spec.rotation, pivot),
                        color,
                    ),
                    None => Piece::with_default_pivot(
                        spec.id,
                        spec.points.clone(),
                        spec.position,
                        spec.rotation,
                        color,
                    ),
                }
            })
            .collect()
    }

    pub fn into_session(self, config: EngineConfig) -> Result<PuzzleSession> {
        let pieces = self.build_pieces()?;
        let targets = self.build_targets()?;
        PuzzleSession::new(pieces, targets, config)
    }
}

// Classic dissection of a 4x4 square, in grid units.
const STANDARD_OUTLINES: [&[(f64, f64)]; 7] = [
    &[(0.0, 0.0), (4.0, 0.0), (2.0, 2.0)],
    &[(0.0, 0.0), (2.0, 2.0), (0.0, 4.0)],
    &[(2.0, 4.0), (4.0, 2.0), (4.0, 4.0)],
    &[(4.0, 0.0), (4.0, 2.0), (3.0, 1.0)],
    &[(3.0, 1.0), (4.0, 2.0), (3.0, 3.0), (2.0, 2.0)],
    &[(2.0, 2.0), (3.0, 3.0), (1.0, 3.0)],
    &[(0.0, 4.0), (1.0, 3.0), (3.0, 3.0), (2.0, 4.0)],
];

/// The seven tangram pieces (two large, one medium and two small
/// triangles, a square and a parallelogram), assembled into a square of
/// side `4 * unit` at the origin. Each piece pivots about its centroid.
pub fn standard_set(unit: f64) -> Result<Vec<Piece>> {
    STANDARD_OUTLINES
        .iter()
        .enumerate()
        .map(|(i, outline)| {
            let pts = outline
                .iter()
                .map(|&(x, y)| Point::new(x * unit, y * unit))
                .collect();
            Piece::with_default_pivot(i as u32 + 1, pts, Point::default(), 0.0, piece_color(i))
        })
        .collect()
}

/// Square silhouette matching [`standard_set`] in its solved position.
pub fn standard_square(unit: f64) -> TargetPolygon {
    let s = 4.0 * unit;
    TargetPolygon {
        id: 1,
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(s, 0.0),
            Point::new(s, s),
            Point::new(0.0, s),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn standard_set_tiles_the_square() {
        let set = standard_set(10.0).unwrap();
        assert_eq!(set.len(), 7);
        let total: f64 = set.iter().map(Piece::area).sum();
        assert_abs_diff_eq!(total, 1600.0, epsilon = 1e-9);
        let ids: Vec<u32> = set.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(set[0].color, piece_color(0));
    }

    #[test]
    fn parses_explicit_pieces() {
        let txt = r##"{
            "name": "house",
            "targets": [{"id": 1, "points": [[0,0],[100,0],[100,100],[0,100]]}],
            "pieces": [
                {"id": 7, "points": [[0,0],[100,0],[100,100],[0,100]],
                 "position": [5, 5], "rotation": -10, "pivot": [50, 50], "color": "#123456"},
                {"id": 8, "points": [[0,0],[60,0],[0,60]]}
            ]
        }"##;
        let def = PuzzleDefinition::from_json_str(txt).unwrap();
        assert_eq!(def.name, "house");
        let pieces = def.build_pieces().unwrap();
        assert_eq!(pieces[0].id, 7);
        assert_abs_diff_eq!(pieces[0].pose.rotation, 350.0);
        assert_eq!(pieces[0].pose.pivot, Point::new(50.0, 50.0));
        assert_eq!(pieces[0].color, "#123456");
        assert_abs_diff_eq!(pieces[1].pose.pivot.x, 20.0, epsilon = 1e-9);
        assert_eq!(pieces[1].color, piece_color(1));
        assert_eq!(def.build_targets().unwrap().len(), 1);
    }

    #[test]
    fn missing_pieces_fall_back_to_standard_set() {
        let txt = r#"{"targets": [{"id": 1, "points": [[0,0],[80,0],[80,80],[0,80]]}], "unit": 20}"#;
        let session = PuzzleDefinition::from_json_str(txt)
            .unwrap()
            .into_session(EngineConfig::default())
            .unwrap();
        assert_eq!(session.pieces().len(), 7);
        // laid out on the silhouette, but nothing has been released yet
        assert!(session.pieces().iter().all(|p| !p.is_placed()));
        assert_eq!(session.completion(), 0);
    }

    #[test]
    fn bad_documents_are_reported() {
        assert!(matches!(
            PuzzleDefinition::from_json_str("[]"),
            Err(EngineError::Parse(_))
        ));
        let def = PuzzleDefinition::from_json_str(r#"{"targets": [{"id": 1, "points": [[0,0],[1,1]]}]}"#)
            .unwrap();
        assert_eq!(
            def.build_targets(),
            Err(EngineError::TooFewVertices { len: 2 })
        );
    }
}
