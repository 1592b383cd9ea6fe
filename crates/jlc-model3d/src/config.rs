use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Calibrated thresholds used by the placement engine.
///
/// The defaults were tuned against the fixture corpus shipped in
/// `tests/resources/corpus.toml`. Any retuning should be checked against that
/// corpus with [`crate::corpus::FixtureCorpus::check`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Origin offsets with `|dy|` below this (mm) are measurement noise.
    pub min_intentional_offset: f64,
    /// Parts shorter than this (mm) get the relative offset check.
    pub short_part_height: f64,
    /// Max `|dy| / height` for an intentional offset on a short part.
    pub short_part_offset_ratio: f64,
    /// Offsets with `|dy|` above this (mm) are gross data errors.
    pub max_plausible_offset: f64,
    /// Tolerance (mm) on `|height - 2 * z_max|` for vertically centered boxes.
    pub symmetric_tolerance: f64,
    /// `|cy| / height` above which the box center skew is deliberate.
    pub significant_cy_ratio: f64,
    /// `z_min` must be below `-below_plane_epsilon` (mm) for a connector.
    pub below_plane_epsilon: f64,
    /// Origin-offset parts with `|cy|` below this (mm) use the offset alone.
    pub centered_cy_limit: f64,
    /// Connector/origin-offset: `z_max > ratio * |z_min|` sits on the plane.
    pub mostly_above_ratio: f64,
    /// Regular: `z_max < ratio * |z_min|` hangs below the plane.
    pub regular_below_ratio: f64,
    /// Regular: `z_max > ratio * |z_min|` sits on the plane.
    pub regular_above_ratio: f64,
    /// Regular: parts taller than this (mm) above the plane...
    pub tall_part_height: f64,
    /// ...and deeper than this (mm) below it use the declared Z.
    pub deep_part_depth: f64,
    /// Declared model Z (mm) within this of zero means surface mount.
    pub mount_z_epsilon: f64,
    /// Angle tolerance (degrees) for rotation classification.
    pub rotation_tolerance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_intentional_offset: 0.5,
            short_part_height: 3.0,
            short_part_offset_ratio: 0.4,
            max_plausible_offset: 50.0,
            symmetric_tolerance: 0.01,
            significant_cy_ratio: 0.05,
            below_plane_epsilon: 0.001,
            centered_cy_limit: 0.5,
            mostly_above_ratio: 2.0,
            regular_below_ratio: 0.5,
            regular_above_ratio: 3.0,
            tall_part_height: 5.0,
            deep_part_depth: 1.0,
            mount_z_epsilon: 0.001,
            rotation_tolerance: 0.5,
        }
    }
}

impl Thresholds {
    /// Parse thresholds from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("Failed to parse placement thresholds")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read thresholds from {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Invalid thresholds file {}", path.display()))
    }
}
