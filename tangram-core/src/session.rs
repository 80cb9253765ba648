use std::collections::HashSet;

use crate::collision::is_blocked;
use crate::config::EngineConfig;
use crate::coverage::{Coverage, coverage_with, measure_coverage};
use crate::error::{EngineError, Result};
use crate::model::{Piece, Point, Pose, TargetPolygon};
use crate::snap::find_snap_with;
use crate::transform::{transform_points, world_points};

/// What happened to a requested drag or rotation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The new pose was applied.
    Moved,
    /// The collision guard rejected the step; the pose is unchanged.
    Reverted,
}

/// Puzzle state owned by whoever drives drag and drop.
///
/// Holds the pieces, the silhouette and the tunables. Every mutation goes
/// through one of the methods below, which consult the pure engine
/// functions and apply their verdict in one step.
#[derive(Clone, Debug)]
pub struct PuzzleSession {
    pieces: Vec<Piece>,
    initial: Vec<Pose>,
    targets: Vec<TargetPolygon>,
    config: EngineConfig,
}

impl PuzzleSession {
    pub fn new(pieces: Vec<Piece>, targets: Vec<TargetPolygon>, config: EngineConfig) -> Result<Self> {
        if let Some(bad) = targets.iter().find(|t| t.points.len() < 3) {
            return Err(EngineError::TooFewVertices {
                len: bad.points.len(),
            });
        }
        let mut seen = HashSet::new();
        for p in &pieces {
            if !seen.insert(p.id) {
                return Err(EngineError::DuplicatePiece(p.id));
            }
        }
        let initial = pieces.iter().map(|p| p.pose).collect();
        Ok(PuzzleSession {
            pieces,
            initial,
            targets,
            config,
        })
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: u32) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn targets(&self) -> &[TargetPolygon] {
        &self.targets
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn index_of(&self, id: u32) -> Result<usize> {
        self.pieces
            .iter()
            .position(|p| p.id == id)
            .ok_or(EngineError::UnknownPiece(id))
    }

    /// World outlines of every piece except the one at `skip`.
    pub fn others_world(&self, skip: usize) -> Vec<Vec<Point>> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, p)| world_points(p))
            .collect()
    }

    fn try_pose(&mut self, idx: usize, pose: Pose) -> DragOutcome {
        let candidate = transform_points(self.pieces[idx].local(), &pose);
        let others = self.others_world(idx);
        let piece = &mut self.pieces[idx];
        if is_blocked(
            &candidate,
            &others,
            piece.area(),
            self.config.collision.allow_threshold,
        ) {
            tracing::debug!(piece = piece.id, "drag step reverted");
            return DragOutcome::Reverted;
        }
        piece.pose = pose;
        DragOutcome::Moved
    }

    /// One pointer-move tick: move piece `id` so its pose position becomes
    /// `position`, unless the guard blocks it. The guard checks against every
    /// other piece in the session, placed or loose.
    pub fn drag_to(&mut self, id: u32, position: Point) -> Result<DragOutcome> {
        let idx = self.index_of(id)?;
        let pose = self.pieces[idx].pose.with_position(position);
        Ok(self.try_pose(idx, pose))
    }

    /// Rotate piece `id` by `delta` degrees, guarded like a drag.
    pub fn rotate_by(&mut self, id: u32, delta: f64) -> Result<DragOutcome> {
        let idx = self.index_of(id)?;
        let current = self.pieces[idx].pose;
        let pose = current.with_rotation(current.rotation + delta);
        Ok(self.try_pose(idx, pose))
    }

    /// Pointer release: try to snap piece `id` onto the silhouette.
    ///
    /// On a match the corrected pose is applied and the piece is marked
    /// placed; otherwise it stays where it was dropped and is marked
    /// unplaced. Returns whether it snapped.
    pub fn release(&mut self, id: u32) -> Result<bool> {
        let idx = self.index_of(id)?;
        let snapped = find_snap_with(&self.pieces[idx], &self.targets, &self.config.snap)?;
        let piece = &mut self.pieces[idx];
        match snapped {
            Some(pose) => {
                piece.pose = pose;
                piece.set_placed(true);
                tracing::debug!(piece = id, "piece placed");
                Ok(true)
            }
            None => {
                if piece.is_placed() {
                    tracing::debug!(piece = id, "piece unplaced");
                }
                piece.set_placed(false);
                Ok(false)
            }
        }
    }

    fn placed_pieces(&self) -> Vec<Piece> {
        self.pieces.iter().filter(|p| p.is_placed()).cloned().collect()
    }

    /// Completion percentage of the silhouette, recomputed from scratch.
    /// Only placed pieces count; loose pieces never contribute.
    pub fn completion(&self) -> u8 {
        coverage_with(&self.placed_pieces(), &self.targets, &self.config.coverage)
    }

    /// Pixel counts behind [`PuzzleSession::completion`].
    pub fn measure(&self) -> Result<Coverage> {
        measure_coverage(&self.placed_pieces(), &self.targets, &self.config.coverage)
    }

    /// Put every piece back at the pose it had when the session was built.
    pub fn reset(&mut self) {
        for (piece, pose) in self.pieces.iter_mut().zip(&self.initial) {
            piece.pose = *pose;
            piece.set_placed(false);
        }
    }
}
