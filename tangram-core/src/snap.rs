//! Edge-to-edge snapping of a released piece onto the silhouette.

use crate::config::SnapTolerances;
use crate::error::{EngineError, Result};
use crate::model::{Piece, Pose, TargetPolygon, angle_distance, normalize_degrees};
use crate::transform::{Edge, edges_of, transform_points, world_points};

/// [`find_snap_with`] using the default tolerances.
pub fn find_snap(piece: &Piece, targets: &[TargetPolygon]) -> Result<Option<Pose>> {
    find_snap_with(piece, targets, &SnapTolerances::default())
}

/// Search for a small rotation + translation that lays one of the piece's
/// edges onto a silhouette edge.
///
/// Pairs are scanned piece edge first, then target edges in the order the
/// targets were supplied; the first pair that survives every check wins.
/// Returns `Ok(None)` when nothing lines up and `Err` only when a target
/// outline is malformed. The piece itself is never mutated.
pub fn find_snap_with(
    piece: &Piece,
    targets: &[TargetPolygon],
    tol: &SnapTolerances,
) -> Result<Option<Pose>> {
    if let Some(bad) = targets.iter().find(|t| t.points.len() < 3) {
        return Err(EngineError::TooFewVertices {
            len: bad.points.len(),
        });
    }
    if targets.is_empty() {
        return Ok(None);
    }

    let piece_edges = edges_of(&world_points(piece));
    let target_edges: Vec<Edge> = targets.iter().flat_map(|t| edges_of(&t.points)).collect();

    for pe in &piece_edges {
        for te in &target_edges {
            if let Some(pose) = try_pair(piece, pe, te, tol) {
                return Ok(Some(pose));
            }
        }
    }
    tracing::trace!(piece = piece.id, "no snap candidate within tolerance");
    Ok(None)
}

fn try_pair(piece: &Piece, pe: &Edge, te: &Edge, tol: &SnapTolerances) -> Option<Pose> {
    if (pe.length - te.length).abs() > tol.length {
        return None;
    }

    let direct = angle_distance(pe.angle, te.angle);
    let reversed = angle_distance(pe.angle + 180.0, te.angle);
    if direct > tol.angle && reversed > tol.angle {
        return None;
    }
    let chosen = if direct <= reversed {
        pe.angle
    } else {
        pe.angle + 180.0
    };
    let delta = signed_degrees(te.angle - chosen);

    let trial = piece.pose.with_rotation(piece.pose.rotation + delta);
    let rotated = edges_of(&transform_points(piece.local(), &trial));
    // The rotation moves every edge, so re-find the one sitting on `te`.
    // Closest midpoint wins here, not the first in vertex order.
    let aligned = rotated
        .iter()
        .filter(|e| (e.length - te.length).abs() <= tol.length)
        .map(|e| (e, e.midpoint.distance(te.midpoint)))
        .filter(|(_, d)| *d <= tol.midpoint)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| *e)?;

    let shift = te.midpoint - aligned.midpoint;
    let start = aligned.start + shift;
    let end = aligned.end + shift;
    let same = (start.distance(te.start), end.distance(te.end));
    let swapped = (start.distance(te.end), end.distance(te.start));
    let (a, b) = if same.0 + same.1 <= swapped.0 + swapped.1 {
        same
    } else {
        swapped
    };
    if a.max(b) > tol.endpoint {
        return None;
    }

    let pose = trial.with_position(piece.pose.position + shift);
    tracing::debug!(
        piece = piece.id,
        delta,
        dx = shift.x,
        dy = shift.y,
        "snap matched"
    );
    Some(pose)
}

/// Wrap into `(-180, 180]` so the correction is the short way round.
fn signed_degrees(deg: f64) -> f64 {
    let d = normalize_degrees(deg);
    if d > 180.0 { d - 360.0 } else { d }
}
