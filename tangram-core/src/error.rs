/// Failures the engine reports instead of a neutral result.
///
/// The interactive callers fold most of these into "no snap" or "zero
/// coverage"; keeping them as values lets tests tell a structurally invalid
/// input apart from a genuine miss.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("polygon needs at least 3 vertices, got {len}")]
    TooFewVertices { len: usize },
    #[error("polygon has zero area")]
    DegenerateArea,
    #[error("mask size {width}x{height} is empty")]
    InvalidMask { width: u32, height: u32 },
    #[error("target bounding box is degenerate")]
    DegenerateBounds,
    #[error("unknown piece id: {0}")]
    UnknownPiece(u32),
    #[error("duplicate piece id: {0}")]
    DuplicatePiece(u32),
    #[error("puzzle parse error: {0}")]
    Parse(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
