//! Z rotation handling for declared model rotations.
//!
//! Only half turns about Z are corrected. Combining an X or Y rotation with
//! any Z rotation has no known mapping between the EasyEDA and KiCad
//! conventions and is reported instead of guessed at.

use glam::{DVec2, DVec3};

use crate::config::Thresholds;
use crate::metadata::RotationTriple;
use crate::offset::UnrotatedOffset;

/// Values closer to zero than this after rotation are floating point residue.
const RESIDUE: f64 = 1e-9;

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

fn is_zero_angle(angle: f64, thresholds: &Thresholds) -> bool {
    normalize_degrees(angle).abs() < thresholds.rotation_tolerance
}

/// True when `rz` is within tolerance of +180° or -180°.
pub fn is_half_turn(rz: f64, thresholds: &Thresholds) -> bool {
    (normalize_degrees(rz).abs() - 180.0).abs() < thresholds.rotation_tolerance
}

/// True for a tilted model (X or Y rotation) that is also turned about Z.
pub fn is_unsupported(rotation: &RotationTriple, thresholds: &Thresholds) -> bool {
    let tilted =
        !is_zero_angle(rotation.x, thresholds) || !is_zero_angle(rotation.y, thresholds);
    tilted && !is_zero_angle(rotation.z, thresholds)
}

/// Rotate the XY part of an offset into the footprint frame.
///
/// Offsets computed for a half turn are turned by the declared `rz`; all
/// others pass through the identity rotation.
pub fn apply(offset: &UnrotatedOffset, rotation: &RotationTriple) -> DVec3 {
    let angle = if offset.half_turn { rotation.z } else { 0.0 };
    let xy = DVec2::from_angle(angle.to_radians()).rotate(DVec2::new(offset.x, offset.y));
    DVec3::new(clean(xy.x), clean(xy.y), clean(offset.z))
}

/// Drop float residue and negative zero.
pub(crate) fn clean(value: f64) -> f64 {
    if value.abs() < RESIDUE { 0.0 } else { value }
}
