//! Model translation for each placement class, before rotation correction.

use crate::classify::{PlacementClass, PlacementKind};
use crate::config::Thresholds;
use crate::geometry::BoundingBox;
use crate::metadata::{MountType, OriginOffset};

/// Offset in the model's own frame.
///
/// `half_turn` records that the rotation stage will turn the XY pair by the
/// declared 180° Z rotation, so the footprint-frame `dy` term was written
/// without its usual negation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnrotatedOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub half_turn: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct OffsetInput {
    pub class: PlacementClass,
    pub z_min: f64,
    pub z_max: f64,
    pub origin_offset: OriginOffset,
    pub declared_z: f64,
    pub mount: MountType,
    pub half_turn: bool,
}

impl OffsetInput {
    pub fn new(
        class: PlacementClass,
        bbox: &BoundingBox,
        origin_offset: OriginOffset,
        declared_z: f64,
        mount: MountType,
        half_turn: bool,
    ) -> Self {
        Self {
            class,
            z_min: bbox.z_min(),
            z_max: bbox.z_max(),
            origin_offset,
            declared_z,
            mount,
            half_turn,
        }
    }

    fn kind(&self) -> PlacementKind {
        self.class.kind()
    }

    fn depth(&self) -> f64 {
        self.z_min.abs()
    }

    fn in_kinds(&self, kinds: &[PlacementKind]) -> bool {
        kinds.contains(&self.kind())
    }

    /// Footprint `dy` as a model-frame Y term.
    fn dy_term(&self) -> f64 {
        if self.half_turn {
            self.origin_offset.dy
        } else {
            -self.origin_offset.dy
        }
    }
}

const SKEWED: [PlacementKind; 2] = [PlacementKind::Connector, PlacementKind::OriginOffset];

type ZRule = (
    &'static str,
    fn(&OffsetInput, &Thresholds) -> bool,
    fn(&OffsetInput) -> f64,
);

/// Vertical placement, evaluated in order; first match wins.
const Z_RULES: [ZRule; 10] = [
    (
        "symmetric surface mount sits on its lower half",
        |i, _| i.kind() == PlacementKind::Symmetric && i.mount == MountType::SurfaceMount,
        |i| i.z_max,
    ),
    (
        "symmetric through-hole straddles the board",
        |i, _| i.kind() == PlacementKind::Symmetric,
        |_| 0.0,
    ),
    (
        "entirely above plane uses declared z",
        |i, _| i.z_min >= 0.0,
        |i| i.declared_z,
    ),
    (
        "skewed, mostly above plane",
        |i, t| i.in_kinds(&SKEWED) && i.z_max > t.mostly_above_ratio * i.depth(),
        |_| 0.0,
    ),
    (
        "skewed, mostly below plane",
        |i, _| i.in_kinds(&SKEWED) && i.z_max < i.depth(),
        |i| i.z_max,
    ),
    (
        "skewed, balanced about plane",
        |i, _| i.in_kinds(&SKEWED),
        |i| -i.z_min / 2.0,
    ),
    // Only regular parts get past the skewed catch-all above.
    (
        "regular, hangs below plane",
        |i, t| i.z_max < t.regular_below_ratio * i.depth(),
        |i| i.z_max,
    ),
    (
        "regular, sits on plane",
        |i, t| i.z_max > t.regular_above_ratio * i.depth(),
        |_| 0.0,
    ),
    (
        "regular, tall and deep uses declared z",
        |i, t| i.z_max > t.tall_part_height && i.depth() > t.deep_part_depth,
        |i| i.declared_z,
    ),
    ("regular, default", |_, _| true, |_| 0.0),
];

fn offset_z(input: &OffsetInput, thresholds: &Thresholds) -> f64 {
    let (rule, _, value) = Z_RULES
        .iter()
        .find(|(_, applies, _)| applies(input, thresholds))
        .unwrap_or(&Z_RULES[Z_RULES.len() - 1]);
    log::debug!("Model z offset rule: {rule}");
    value(input)
}

fn offset_y(input: &OffsetInput, thresholds: &Thresholds) -> f64 {
    match input.class {
        PlacementClass::Symmetric => 0.0,
        PlacementClass::Connector {
            cy,
            has_origin_offset,
        } => {
            if has_origin_offset {
                -cy + input.dy_term()
            } else {
                -cy
            }
        }
        PlacementClass::OriginOffset { cy } => {
            if cy.abs() < thresholds.centered_cy_limit {
                input.dy_term()
            } else {
                -cy + input.dy_term()
            }
        }
        PlacementClass::Regular { cy, significant_cy } => {
            if significant_cy {
                -cy
            } else {
                0.0
            }
        }
    }
}

pub fn compute_offset(input: &OffsetInput, thresholds: &Thresholds) -> UnrotatedOffset {
    UnrotatedOffset {
        x: input.origin_offset.dx,
        y: offset_y(input, thresholds),
        z: offset_z(input, thresholds),
        half_turn: input.half_turn,
    }
}
