//! Silhouette coverage by mask comparison.
//!
//! Targets and pieces are filled into two masks sharing one fit transform;
//! coverage is the share of target pixels that are also piece pixels. Masks
//! are rebuilt from scratch on every call.

use geo::BoundingRect;
use geo_types::MultiPoint;
use tiny_skia::{FillRule, Mask, PathBuilder, Transform};

use crate::config::{CoverageConfig, DEFAULT_MASK_PADDING};
use crate::error::{EngineError, Result};
use crate::model::{Piece, Point, TargetPolygon};
use crate::transform::world_points;

/// Axis-aligned box around a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Box around `pts`; `None` when the iterator is empty.
    pub fn of_points<'a>(pts: impl IntoIterator<Item = &'a Point>) -> Option<Bounds> {
        let mp: MultiPoint<f64> = pts.into_iter().map(|p| (p.x, p.y)).collect();
        let r = mp.bounding_rect()?;
        Some(Bounds {
            min: Point::new(r.min().x, r.min().y),
            max: Point::new(r.max().x, r.max().y),
        })
    }

    /// Box around every vertex of every target.
    pub fn of_targets(targets: &[TargetPolygon]) -> Option<Bounds> {
        Bounds::of_points(targets.iter().flat_map(|t| t.points.iter()))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Uniform scale + offset placing a world box inside a pixel surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    pub scale: f64,
    pub offset: Point,
}

impl FitTransform {
    /// Fit `bounds` into `width x height` with `padding` pixels kept clear on
    /// every side, centred along the slack axis.
    pub fn fit(bounds: Bounds, width: u32, height: u32, padding: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidMask { width, height });
        }
        let (bw, bh) = (bounds.width(), bounds.height());
        if !(bw.is_finite() && bh.is_finite()) || bw <= 0.0 || bh <= 0.0 {
            return Err(EngineError::DegenerateBounds);
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let avail_w = (w - 2.0 * padding).max(1.0);
        let avail_h = (h - 2.0 * padding).max(1.0);
        let scale = (avail_w / bw).min(avail_h / bh);
        Ok(FitTransform {
            scale,
            offset: Point::new(
                (w - bw * scale) / 2.0 - bounds.min.x * scale,
                (h - bh * scale) / 2.0 - bounds.min.y * scale,
            ),
        })
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    /// Closed pixel-space path for an outline, or `None` if it has fewer
    /// than three vertices.
    pub fn path(&self, poly: &[Point]) -> Option<tiny_skia::Path> {
        if poly.len() < 3 {
            return None;
        }
        let mut pb = PathBuilder::new();
        let first = self.apply(poly[0]);
        pb.move_to(first.x as f32, first.y as f32);
        for p in &poly[1..] {
            let q = self.apply(*p);
            pb.line_to(q.x as f32, q.y as f32);
        }
        pb.close();
        pb.finish()
    }
}

/// Raw pixel counts behind a coverage percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Pixels on in both the target and the piece mask.
    pub covered: usize,
    /// Pixels on in the target mask.
    pub target: usize,
}

impl Coverage {
    pub fn percent(&self) -> u8 {
        if self.target == 0 {
            return 0;
        }
        let pct = (self.covered as f64 / self.target as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

fn rasterize<'a>(
    polys: impl IntoIterator<Item = &'a [Point]>,
    fit: &FitTransform,
    width: u32,
    height: u32,
) -> Result<Mask> {
    let mut mask = Mask::new(width, height).ok_or(EngineError::InvalidMask { width, height })?;
    for poly in polys {
        if let Some(path) = fit.path(poly) {
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        }
    }
    Ok(mask)
}

/// Pixel counts for `pieces` over `targets`.
///
/// Empty piece or target lists give an all-zero result. Malformed targets,
/// a flat silhouette or an empty mask are reported as errors.
pub fn measure_coverage(
    pieces: &[Piece],
    targets: &[TargetPolygon],
    cfg: &CoverageConfig,
) -> Result<Coverage> {
    if pieces.is_empty() || targets.is_empty() {
        return Ok(Coverage::default());
    }
    if let Some(bad) = targets.iter().find(|t| t.points.len() < 3) {
        return Err(EngineError::TooFewVertices {
            len: bad.points.len(),
        });
    }
    let bounds = Bounds::of_targets(targets).ok_or(EngineError::DegenerateBounds)?;
    let fit = FitTransform::fit(bounds, cfg.mask_width, cfg.mask_height, cfg.padding)?;

    let target_mask = rasterize(
        targets.iter().map(|t| t.points.as_slice()),
        &fit,
        cfg.mask_width,
        cfg.mask_height,
    )?;
    let world: Vec<Vec<Point>> = pieces.iter().map(world_points).collect();
    let piece_mask = rasterize(
        world.iter().map(Vec::as_slice),
        &fit,
        cfg.mask_width,
        cfg.mask_height,
    )?;

    let mut out = Coverage::default();
    for (t, p) in target_mask.data().iter().zip(piece_mask.data()) {
        if *t != 0 {
            out.target += 1;
            if *p != 0 {
                out.covered += 1;
            }
        }
    }
    tracing::debug!(
        covered = out.covered,
        target = out.target,
        percent = out.percent(),
        "coverage measured"
    );
    Ok(out)
}

/// Percentage of the silhouette covered by `pieces`, `0..=100`.
///
/// Any degenerate input reads as zero coverage.
pub fn coverage(
    pieces: &[Piece],
    targets: &[TargetPolygon],
    mask_width: u32,
    mask_height: u32,
) -> u8 {
    let cfg = CoverageConfig {
        mask_width,
        mask_height,
        padding: DEFAULT_MASK_PADDING,
    };
    coverage_with(pieces, targets, &cfg)
}

pub fn coverage_with(pieces: &[Piece], targets: &[TargetPolygon], cfg: &CoverageConfig) -> u8 {
    match measure_coverage(pieces, targets, cfg) {
        Ok(c) => c.percent(),
        Err(e) => {
            tracing::debug!(error = %e, "coverage treated as zero");
            0
        }
    }
}
