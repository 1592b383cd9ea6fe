//! Four-way placement classification of a model against its footprint.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;
use crate::geometry::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementKind {
    Symmetric,
    Connector,
    OriginOffset,
    Regular,
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PlacementKind::Symmetric => "symmetric",
            PlacementKind::Connector => "connector",
            PlacementKind::OriginOffset => "origin-offset",
            PlacementKind::Regular => "regular",
        };
        f.write_str(text)
    }
}

/// A classification together with the values its offset rules consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementClass {
    /// Box vertically centered on the reference plane.
    Symmetric,
    /// Asymmetric body reaching below the plane.
    Connector { cy: f64, has_origin_offset: bool },
    /// Intentional declared origin offset.
    OriginOffset { cy: f64 },
    Regular { cy: f64, significant_cy: bool },
}

impl PlacementClass {
    pub fn kind(&self) -> PlacementKind {
        match self {
            PlacementClass::Symmetric => PlacementKind::Symmetric,
            PlacementClass::Connector { .. } => PlacementKind::Connector,
            PlacementClass::OriginOffset { .. } => PlacementKind::OriginOffset,
            PlacementClass::Regular { .. } => PlacementKind::Regular,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifierInput {
    pub cy: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub height: f64,
    pub has_origin_offset: bool,
}

impl ClassifierInput {
    pub fn new(bbox: &BoundingBox, has_origin_offset: bool) -> Self {
        Self {
            cy: bbox.center().y,
            z_min: bbox.z_min(),
            z_max: bbox.z_max(),
            height: bbox.height(),
            has_origin_offset,
        }
    }

    /// Center skew relative to part height; zero for flat models.
    pub fn cy_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.cy.abs() / self.height
        } else {
            0.0
        }
    }

    fn has_significant_cy(&self, thresholds: &Thresholds) -> bool {
        self.cy_ratio() > thresholds.significant_cy_ratio
    }
}

type ClassRule = (PlacementKind, fn(&ClassifierInput, &Thresholds) -> bool);

/// Evaluated in order, first match wins; anything else is `Regular`.
const CLASS_RULES: [ClassRule; 3] = [
    (PlacementKind::Symmetric, |i, t| {
        (i.height - 2.0 * i.z_max).abs() < t.symmetric_tolerance
    }),
    (PlacementKind::Connector, |i, t| {
        i.has_significant_cy(t) && i.z_min < -t.below_plane_epsilon
    }),
    (PlacementKind::OriginOffset, |i, _| i.has_origin_offset),
];

pub fn classify(input: &ClassifierInput, thresholds: &Thresholds) -> PlacementClass {
    let kind = CLASS_RULES
        .iter()
        .find(|(_, matches)| matches(input, thresholds))
        .map_or(PlacementKind::Regular, |(kind, _)| *kind);

    match kind {
        PlacementKind::Symmetric => PlacementClass::Symmetric,
        PlacementKind::Connector => PlacementClass::Connector {
            cy: input.cy,
            has_origin_offset: input.has_origin_offset,
        },
        PlacementKind::OriginOffset => PlacementClass::OriginOffset { cy: input.cy },
        PlacementKind::Regular => PlacementClass::Regular {
            cy: input.cy,
            significant_cy: input.has_significant_cy(thresholds),
        },
    }
}
