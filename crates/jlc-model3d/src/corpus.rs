//! Known-good placements used as a regression oracle for threshold tuning.

use anyhow::Context;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::config::Thresholds;
use crate::error::PlacementError;
use crate::geometry::BoundingBox;
use crate::metadata::{OriginOffset, RotationTriple, SourceMetadata};
use crate::transform::{PlacementInput, place};

const DEFAULT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expected {
    Offset([f64; 3]),
    UnsupportedRotation,
    NoGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureCase {
    pub id: String,
    #[serde(default)]
    pub note: String,
    pub bbox: Option<BoundingBox>,
    #[serde(default)]
    pub origin_offset: OriginOffset,
    #[serde(default)]
    pub declared_z: f64,
    #[serde(default)]
    pub rotation: RotationTriple,
    pub expected: Expected,
    /// Overrides the corpus tolerance for this case.
    pub tolerance: Option<f64>,
}

impl FixtureCase {
    pub fn input(&self, thresholds: &Thresholds) -> PlacementInput {
        PlacementInput {
            bbox: self.bbox,
            metadata: SourceMetadata::new(
                self.origin_offset,
                self.declared_z,
                self.rotation,
                thresholds,
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureCorpus {
    /// Max per-axis offset error in millimetres.
    pub tolerance: Option<f64>,
    #[serde(rename = "case", default)]
    pub cases: Vec<FixtureCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureMismatch {
    pub id: String,
    pub expected: Expected,
    pub actual: String,
}

impl fmt::Display for FixtureMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {:?}, got {}",
            self.id, self.expected, self.actual
        )
    }
}

impl FixtureCorpus {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("Failed to parse fixture corpus")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture corpus {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Invalid fixture corpus {}", path.display()))
    }

    /// Run every case through the engine and collect the ones that disagree.
    pub fn check(&self, thresholds: &Thresholds) -> Vec<FixtureMismatch> {
        let default_tolerance = self.tolerance.unwrap_or(DEFAULT_TOLERANCE);
        self.cases
            .iter()
            .filter_map(|case| {
                let tolerance = case.tolerance.unwrap_or(default_tolerance);
                let placement = place(&case.input(thresholds), thresholds);
                let matches = match (&case.expected, &placement.issue) {
                    (Expected::Offset(expected), None) => expected
                        .iter()
                        .zip(placement.transform.offset)
                        .all(|(e, a)| (e - a).abs() <= tolerance),
                    (
                        Expected::UnsupportedRotation,
                        Some(PlacementError::UnsupportedRotation { .. }),
                    ) => true,
                    (Expected::NoGeometry, Some(PlacementError::NoGeometry)) => true,
                    _ => false,
                };
                if matches {
                    return None;
                }
                let actual = match &placement.issue {
                    Some(err) => err.to_string(),
                    None => format!("offset {:?}", placement.transform.offset),
                };
                Some(FixtureMismatch {
                    id: case.id.clone(),
                    expected: case.expected.clone(),
                    actual,
                })
            })
            .collect()
    }
}
