//! 3D model placement for EasyEDA/JLCPCB parts imported into KiCad.
//!
//! EasyEDA's declared model anchors, heights and rotations are frequently
//! inconsistent with the model meshes it serves. This crate infers the
//! `(offset ...)` and `(rotate ...)` values of a KiCad footprint's model
//! reference from the mesh bounding box plus those declared values:
//!
//! 1. [`geometry`] reduces the mesh to a [`BoundingBox`].
//! 2. [`metadata`] reads the declared origin offset, Z and rotation.
//! 3. [`spurious`] discards origin offsets that are noise.
//! 4. [`classify`] assigns one of four [`PlacementClass`]es.
//! 5. [`offset`] computes the translation in the model frame.
//! 6. [`rotation`] turns it into the footprint frame.
//!
//! Every step is a pure function of one component's inputs. [`place`] runs the
//! whole pipeline and [`batch::place_all`] fans it out over many components.

pub mod batch;
pub mod classify;
pub mod config;
pub mod corpus;
pub mod error;
pub mod geometry;
pub mod kicad;
pub mod metadata;
pub mod offset;
pub mod rotation;
pub mod spurious;
pub mod transform;

pub use classify::{PlacementClass, PlacementKind};
pub use config::Thresholds;
pub use error::PlacementError;
pub use geometry::BoundingBox;
pub use metadata::{DeclaredModel, MountType, OriginOffset, RotationTriple, SourceMetadata};
pub use transform::{Placement, PlacementInput, Transform, compute_transform, place};

/// Build engine input straight from EasyEDA data: the model's OBJ text (if it
/// could be fetched), the footprint's 3D outline node and the footprint origin
/// in canvas units.
pub fn input_from_easyeda(
    obj_source: Option<&str>,
    model: &DeclaredModel,
    footprint_origin: (f64, f64),
    thresholds: &Thresholds,
) -> PlacementInput {
    let bbox = obj_source.and_then(|source| match BoundingBox::from_obj(source) {
        Ok(bbox) => Some(bbox),
        Err(err) => {
            log::warn!("Ignoring 3D model {}: {err}", model.uuid);
            None
        }
    });
    PlacementInput {
        bbox,
        metadata: SourceMetadata::from_declared(model, footprint_origin, thresholds),
    }
}
