//! Separates intentional model origin offsets from noise in EasyEDA data.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;
use crate::geometry::BoundingBox;
use crate::metadata::{MountType, OriginOffset};

/// Why a declared origin offset was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpuriousReason {
    /// Too small to be deliberate.
    BelowNoiseFloor,
    /// Large relative to a short part's height.
    ImplausibleForShortPart,
    /// Gross data error.
    BeyondPlausibleRange,
}

impl fmt::Display for SpuriousReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SpuriousReason::BelowNoiseFloor => "below noise floor",
            SpuriousReason::ImplausibleForShortPart => "implausible for a short part",
            SpuriousReason::BeyondPlausibleRange => "beyond plausible range",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OffsetVerdict {
    Intentional(OriginOffset),
    Spurious(SpuriousReason),
}

impl OffsetVerdict {
    pub fn has_origin_offset(&self) -> bool {
        matches!(self, OffsetVerdict::Intentional(_))
    }

    /// The offset downstream stages should use; spurious offsets count as none.
    pub fn effective_offset(&self) -> OriginOffset {
        match self {
            OffsetVerdict::Intentional(offset) => *offset,
            OffsetVerdict::Spurious(_) => OriginOffset::default(),
        }
    }

    pub fn spurious_reason(&self) -> Option<SpuriousReason> {
        match self {
            OffsetVerdict::Intentional(_) => None,
            OffsetVerdict::Spurious(reason) => Some(*reason),
        }
    }
}

struct SpuriousInput {
    dy: f64,
    height: f64,
}

type SpuriousRule = (SpuriousReason, fn(&SpuriousInput, &Thresholds) -> bool);

/// Evaluated in order, first match wins.
const SPURIOUS_RULES: [SpuriousRule; 3] = [
    (SpuriousReason::BelowNoiseFloor, |i, t| {
        i.dy.abs() < t.min_intentional_offset
    }),
    (SpuriousReason::ImplausibleForShortPart, |i, t| {
        i.height < t.short_part_height && i.dy.abs() > t.short_part_offset_ratio * i.height
    }),
    (SpuriousReason::BeyondPlausibleRange, |i, t| {
        i.dy.abs() > t.max_plausible_offset
    }),
];

/// Classify a declared origin offset against the model's bounds.
///
/// Only `dy` is judged; the mount type does not change the outcome with the
/// current rule set but is part of the signal so rules can use it.
pub fn filter_origin_offset(
    offset: OriginOffset,
    bbox: &BoundingBox,
    _mount: MountType,
    thresholds: &Thresholds,
) -> OffsetVerdict {
    let input = SpuriousInput {
        dy: offset.dy,
        height: bbox.height(),
    };
    match SPURIOUS_RULES
        .iter()
        .find(|(_, matches)| matches(&input, thresholds))
    {
        Some((reason, _)) => {
            log::debug!(
                "Discarding origin offset ({:.3}, {:.3}) mm on {:.3} mm tall model: {reason}",
                offset.dx,
                offset.dy,
                input.height
            );
            OffsetVerdict::Spurious(*reason)
        }
        None => OffsetVerdict::Intentional(offset),
    }
}
