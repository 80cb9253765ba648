//! Off-screen thumbnails of a tangram puzzle.
//!
//! The silhouette is filled in a flat grey and the pieces are painted on top
//! in their own colors, all through the same fit transform the coverage
//! estimator uses.

use png::{BitDepth, ColorType, Encoder};
use tangram_core::{Bounds, EngineError, FitTransform, Piece, Point, TargetPolygon, world_points};
use tiny_skia::{Color, FillRule, Paint, Pixmap, Stroke, Transform};

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("pixmap alloc failed for {width}x{height}")]
    Alloc { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Colors and spacing of a thumbnail.
#[derive(Clone, Copy, Debug)]
pub struct ThumbnailStyle {
    pub background: Color,
    pub silhouette: Color,
    pub outline: Color,
    pub stroke_width: f32,
    pub padding: f64,
    /// Opacity applied to pieces that are not snapped in place.
    pub loose_alpha: u8,
}

impl Default for ThumbnailStyle {
    fn default() -> Self {
        ThumbnailStyle {
            background: Color::WHITE,
            silhouette: Color::from_rgba8(0x9e, 0x9e, 0x9e, 0xff),
            outline: Color::from_rgba8(0x33, 0x33, 0x33, 0xff),
            stroke_width: 1.2,
            padding: 8.0,
            loose_alpha: 0xcc,
        }
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 0xff))
}

fn piece_paint(piece: &Piece, style: &ThumbnailStyle) -> Paint<'static> {
    let mut color = parse_hex_color(&piece.color).unwrap_or(style.silhouette);
    if !piece.is_placed() {
        color.apply_opacity(f32::from(style.loose_alpha) / 255.0);
    }
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Render `targets` and `pieces` into a `width x height` pixmap.
///
/// The view is framed on the silhouette and the pieces together, so loose
/// pieces lying beside the board stay visible.
pub fn render_thumbnail(
    targets: &[TargetPolygon],
    pieces: &[Piece],
    width: u32,
    height: u32,
    style: &ThumbnailStyle,
) -> Result<Pixmap, ThumbnailError> {
    let world: Vec<Vec<Point>> = pieces.iter().map(world_points).collect();
    let bounds = Bounds::of_points(
        targets
            .iter()
            .flat_map(|t| t.points.iter())
            .chain(world.iter().flatten()),
    )
    .ok_or(EngineError::DegenerateBounds)?;
    let fit = FitTransform::fit(bounds, width, height, style.padding)?;

    let mut pixmap = Pixmap::new(width, height).ok_or(ThumbnailError::Alloc { width, height })?;
    pixmap.fill(style.background);

    let mut silhouette = Paint::default();
    silhouette.set_color(style.silhouette);
    silhouette.anti_alias = true;
    for t in targets {
        if let Some(path) = fit.path(&t.points) {
            pixmap.fill_path(&path, &silhouette, FillRule::Winding, Transform::identity(), None);
        }
    }

    let mut outline = Paint::default();
    outline.set_color(style.outline);
    outline.anti_alias = true;
    let stroke = Stroke {
        width: style.stroke_width,
        ..Stroke::default()
    };
    for (piece, pts) in pieces.iter().zip(&world) {
        let Some(path) = fit.path(pts) else {
            continue;
        };
        pixmap.fill_path(
            &path,
            &piece_paint(piece, style),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        pixmap.stroke_path(&path, &outline, &stroke, Transform::identity(), None);
    }
    tracing::debug!(width, height, pieces = pieces.len(), "thumbnail rendered");
    Ok(pixmap)
}

/// Encode a pixmap as an RGBA8 PNG. Same pixels give the same bytes.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ThumbnailError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(pixmap.data())?;
    }
    Ok(buf)
}
