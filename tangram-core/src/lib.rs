//! Geometric engine behind the tangram editor.
//!
//! Everything here is a pure function of its inputs: world-space transforms,
//! edge snapping, overlap blocking and silhouette coverage. The only state
//! lives in [`PuzzleSession`], which callers own explicitly.

pub mod collision;
pub mod config;
pub mod coverage;
pub mod error;
pub mod model;
pub mod palette;
pub mod puzzle;
pub mod session;
pub mod snap;
pub mod transform;

pub use collision::{
    intersection_area, intersection_polygon, is_blocked, is_blocked_default, polygons_overlap,
};
pub use config::{CollisionPolicy, CoverageConfig, EngineConfig, SnapTolerances};
pub use coverage::{Bounds, Coverage, FitTransform, coverage, coverage_with, measure_coverage};
pub use error::{EngineError, Result};
pub use model::{Piece, Point, Pose, TargetPolygon, angle_distance, normalize_degrees, signed_area};
pub use palette::piece_color;
pub use puzzle::{PieceSpec, PuzzleDefinition, standard_set, standard_square};
pub use session::{DragOutcome, PuzzleSession};
pub use snap::{find_snap, find_snap_with};
pub use transform::{Edge, edges_of, transform_points, world_points};
