//! Placing many components at once and summarising what needs attention.

use rayon::prelude::*;
use serde::Serialize;

use crate::classify::PlacementKind;
use crate::config::Thresholds;
use crate::error::PlacementError;
use crate::spurious::SpuriousReason;
use crate::transform::{Placement, PlacementInput, Transform, place};

#[derive(Debug, Clone)]
pub struct Component {
    pub lcsc_id: String,
    pub input: PlacementInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentReport {
    pub lcsc_id: String,
    pub transform: Transform,
    pub kind: Option<PlacementKind>,
    pub spurious_offset: Option<SpuriousReason>,
    pub needs_review: bool,
}

/// Per-component results in input order, plus the ids a user should look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub components: Vec<ComponentReport>,
    /// Unsupported rotations: the transform is a best effort.
    pub needs_review: Vec<String>,
    /// No mesh was available, so no model offset was computed.
    pub without_geometry: Vec<String>,
}

impl ImportReport {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn push(&mut self, lcsc_id: String, placement: Placement) {
        match &placement.issue {
            Some(PlacementError::UnsupportedRotation { .. }) => {
                self.needs_review.push(lcsc_id.clone());
            }
            Some(PlacementError::NoGeometry) => self.without_geometry.push(lcsc_id.clone()),
            None => {}
        }
        self.components.push(ComponentReport {
            needs_review: placement.needs_review(),
            kind: placement.kind(),
            transform: placement.transform,
            spurious_offset: placement.spurious_offset,
            lcsc_id,
        });
    }
}

/// Place every component. Components are independent, so the work is spread
/// over the rayon pool; the report keeps input order.
pub fn place_all(components: &[Component], thresholds: &Thresholds) -> ImportReport {
    let placements: Vec<Placement> = components
        .par_iter()
        .map(|component| place(&component.input, thresholds))
        .collect();

    let mut report = ImportReport::default();
    for (component, placement) in components.iter().zip(placements) {
        report.push(component.lcsc_id.clone(), placement);
    }
    if !report.needs_review.is_empty() {
        log::warn!(
            "{} model(s) need manual placement review in KiCad: {}",
            report.needs_review.len(),
            report.needs_review.join(", ")
        );
    }
    report
}
