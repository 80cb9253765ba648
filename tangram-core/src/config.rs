use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Max edge-length mismatch for a snap candidate (length units).
pub const SNAP_LENGTH_TOLERANCE: f64 = 12.0;
/// Max direction mismatch for a snap candidate (degrees).
pub const SNAP_ANGLE_TOLERANCE: f64 = 10.0;
/// Max distance between matched midpoints after the rotation step.
pub const SNAP_MIDPOINT_TOLERANCE: f64 = 18.0;
/// Max endpoint displacement once the midpoints coincide.
pub const SNAP_ENDPOINT_TOLERANCE: f64 = 20.0;
/// Overlap ratio under which a drag move is blocked.
pub const DEFAULT_ALLOW_THRESHOLD: f64 = 0.15;
pub const DEFAULT_MASK_WIDTH: u32 = 200;
pub const DEFAULT_MASK_HEIGHT: u32 = 160;
/// Margin kept around the silhouette when fitting it into a mask (px).
pub const DEFAULT_MASK_PADDING: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapTolerances {
    pub length: f64,
    pub angle: f64,
    pub midpoint: f64,
    pub endpoint: f64,
}

impl Default for SnapTolerances {
    fn default() -> Self {
        SnapTolerances {
            length: SNAP_LENGTH_TOLERANCE,
            angle: SNAP_ANGLE_TOLERANCE,
            midpoint: SNAP_MIDPOINT_TOLERANCE,
            endpoint: SNAP_ENDPOINT_TOLERANCE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionPolicy {
    pub allow_threshold: f64,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        CollisionPolicy {
            allow_threshold: DEFAULT_ALLOW_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    pub mask_width: u32,
    pub mask_height: u32,
    pub padding: f64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        CoverageConfig {
            mask_width: DEFAULT_MASK_WIDTH,
            mask_height: DEFAULT_MASK_HEIGHT,
            padding: DEFAULT_MASK_PADDING,
        }
    }
}

/// Tunables for the whole engine. Any field missing from a config file
/// keeps its default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub snap: SnapTolerances,
    pub collision: CollisionPolicy,
    pub coverage: CoverageConfig,
}

impl EngineConfig {
    pub fn from_json_str(txt: &str) -> Result<Self> {
        serde_json::from_str(txt).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&txt)
    }
}
