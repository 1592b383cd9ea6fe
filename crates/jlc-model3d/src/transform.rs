use serde::{Deserialize, Serialize};

use crate::classify::{ClassifierInput, PlacementClass, PlacementKind, classify};
use crate::config::Thresholds;
use crate::error::PlacementError;
use crate::geometry::BoundingBox;
use crate::metadata::SourceMetadata;
use crate::offset::{OffsetInput, compute_offset};
use crate::rotation;
use crate::spurious::{SpuriousReason, filter_origin_offset};

/// Placement written into a footprint's `(model ...)` block.
///
/// Offsets are millimetres, rotations degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub offset: [f64; 3],
    pub rotation: [f64; 3],
}

impl Transform {
    pub const ZERO: Transform = Transform {
        offset: [0.0; 3],
        rotation: [0.0; 3],
    };
}

/// Per-component engine input: model bounds (if a mesh was available) and
/// the declared EasyEDA metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementInput {
    pub bbox: Option<BoundingBox>,
    pub metadata: SourceMetadata,
}

/// Outcome of placing one component.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub transform: Transform,
    /// `None` when there was no geometry to classify.
    pub class: Option<PlacementClass>,
    pub spurious_offset: Option<SpuriousReason>,
    pub issue: Option<PlacementError>,
}

impl Placement {
    pub fn kind(&self) -> Option<PlacementKind> {
        self.class.as_ref().map(PlacementClass::kind)
    }

    /// Low-confidence transforms that should be checked by hand in KiCad.
    pub fn needs_review(&self) -> bool {
        matches!(self.issue, Some(PlacementError::UnsupportedRotation { .. }))
    }

    pub fn into_result(self) -> Result<Transform, PlacementError> {
        match self.issue {
            Some(err) => Err(err),
            None => Ok(self.transform),
        }
    }
}

/// Compute a component's model transform without failing.
///
/// Missing geometry yields the zero transform; an unsupported rotation yields
/// the best-effort transform. Both are recorded in [`Placement::issue`].
pub fn place(input: &PlacementInput, thresholds: &Thresholds) -> Placement {
    let Some(bbox) = input.bbox else {
        log::warn!("No 3D model geometry, leaving model transform at zero");
        return Placement {
            transform: Transform::ZERO,
            class: None,
            spurious_offset: None,
            issue: Some(PlacementError::NoGeometry),
        };
    };
    let meta = &input.metadata;

    let verdict = filter_origin_offset(meta.origin_offset, &bbox, meta.mount, thresholds);
    let class = classify(
        &ClassifierInput::new(&bbox, verdict.has_origin_offset()),
        thresholds,
    );
    let half_turn = rotation::is_half_turn(meta.rotation.z, thresholds);
    let unrotated = compute_offset(
        &OffsetInput::new(
            class,
            &bbox,
            verdict.effective_offset(),
            meta.declared_z,
            meta.mount,
            half_turn,
        ),
        thresholds,
    );
    let offset = rotation::apply(&unrotated, &meta.rotation);

    let transform = Transform {
        offset: offset.to_array(),
        rotation: [
            rotation::clean(meta.rotation.x),
            rotation::clean(meta.rotation.y),
            rotation::clean(meta.rotation.z),
        ],
    };
    log::debug!(
        "Placed {} model at ({:.3}, {:.3}, {:.3})",
        class.kind(),
        transform.offset[0],
        transform.offset[1],
        transform.offset[2]
    );

    let issue = rotation::is_unsupported(&meta.rotation, thresholds).then(|| {
        log::warn!(
            "Model rotation {} combines X/Y and Z axes; placement needs manual review",
            meta.rotation
        );
        PlacementError::UnsupportedRotation {
            rotation: meta.rotation,
            best_effort: transform,
        }
    });

    Placement {
        transform,
        class: Some(class),
        spurious_offset: verdict.spurious_reason(),
        issue,
    }
}

/// Strict form of [`place`]: both reportable conditions are errors.
pub fn compute_transform(
    input: &PlacementInput,
    thresholds: &Thresholds,
) -> Result<Transform, PlacementError> {
    place(input, thresholds).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MountType, OriginOffset, RotationTriple};
    use glam::DVec3;

    fn bbox(z_min: f64, z_max: f64, cy: f64) -> BoundingBox {
        BoundingBox::new(
            DVec3::new(-1.0, 0.0, z_min),
            DVec3::new(1.0, 2.0 * cy, z_max),
        )
    }

    fn input(bbox: Option<BoundingBox>, dy: f64, declared_z: f64, rz: f64) -> PlacementInput {
        let thresholds = Thresholds::default();
        PlacementInput {
            bbox,
            metadata: SourceMetadata::new(
                OriginOffset::new(0.0, dy),
                declared_z,
                RotationTriple::new(0.0, 0.0, rz),
                &thresholds,
            ),
        }
    }

    #[test]
    fn missing_geometry_gives_zero_transform() {
        let placement = place(&input(None, 2.0, 1.0, 0.0), &Thresholds::default());
        assert_eq!(placement.transform, Transform::ZERO);
        assert_eq!(placement.kind(), None);
        assert!(!placement.needs_review());
        assert_eq!(placement.into_result(), Err(PlacementError::NoGeometry));
    }

    #[test]
    fn half_turn_origin_offset_matches_unrotated_case() {
        let thresholds = Thresholds::default();
        let part = bbox(-1.0, 3.24, 0.0);

        // C386758
        let turned = place(&input(Some(part), -1.587, 0.0, -180.0), &thresholds);
        assert_eq!(turned.kind(), Some(PlacementKind::OriginOffset));
        assert_eq!(turned.transform.offset, [0.0, 1.587, 0.0]);
        assert_eq!(turned.transform.rotation, [0.0, 0.0, -180.0]);

        let straight = place(&input(Some(part), -1.587, 0.0, 0.0), &thresholds);
        assert_eq!(straight.transform.offset, turned.transform.offset);
    }

    #[test]
    fn spurious_offsets_are_reported_not_failed() {
        // C7519
        let placement = place(
            &input(Some(bbox(0.0, 1.649, 0.0)), 0.965, 0.0, 0.0),
            &Thresholds::default(),
        );
        assert_eq!(
            placement.spurious_offset,
            Some(SpuriousReason::ImplausibleForShortPart)
        );
        assert_eq!(placement.kind(), Some(PlacementKind::Regular));
        assert_eq!(placement.into_result(), Ok(Transform::ZERO));
    }

    #[test]
    fn tilted_and_turned_model_is_flagged() {
        // C2318
        let mut part = input(Some(bbox(0.0, 2.0, 0.0)), 0.0, 0.0, 90.0);
        part.metadata.rotation.x = 90.0;

        let placement = place(&part, &Thresholds::default());
        assert!(placement.needs_review());
        assert_eq!(placement.transform.rotation, [90.0, 0.0, 90.0]);

        match compute_transform(&part, &Thresholds::default()) {
            Err(PlacementError::UnsupportedRotation {
                rotation,
                best_effort,
            }) => {
                assert_eq!(rotation, RotationTriple::new(90.0, 0.0, 90.0));
                assert_eq!(best_effort, placement.transform);
            }
            other => panic!("expected unsupported rotation, got {other:?}"),
        }
    }

    #[test]
    fn identical_inputs_give_identical_transforms() {
        let thresholds = Thresholds::default();
        let part = input(Some(bbox(-1.3, 4.1, 0.37)), 1.1, 0.8, 180.0);
        let first = place(&part, &thresholds);
        let second = place(&part, &thresholds);
        assert_eq!(first, second);
        for (a, b) in first.transform.offset.iter().zip(second.transform.offset) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn through_hole_metadata_is_derived() {
        let part = input(Some(bbox(-3.5, 3.5, 0.0)), 0.0, 3.5, 0.0);
        assert_eq!(part.metadata.mount, MountType::ThroughHole);
        let placement = place(&part, &Thresholds::default());
        assert_eq!(placement.kind(), Some(PlacementKind::Symmetric));
        assert_eq!(placement.transform.offset, [0.0, 0.0, 0.0]);
    }
}
