use crate::metadata::RotationTriple;
use crate::transform::Transform;
use thiserror::Error;

/// Conditions the placement engine reports to its caller.
///
/// Neither is fatal to an import: the lenient entry point
/// ([`crate::place`]) still hands back a usable [`Transform`] for both.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("3D model has no vertices")]
    NoGeometry,
    #[error("unsupported model rotation {rotation}: tilt combined with Z rotation needs manual review")]
    UnsupportedRotation {
        rotation: RotationTriple,
        best_effort: Transform,
    },
}
