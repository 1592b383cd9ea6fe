//! Placement-relevant values declared by EasyEDA footprints.
//!
//! EasyEDA attaches the 3D model to a footprint through an `SVGNODE` shape
//! whose `attrs` carry the model anchor (`c_origin`), its height above the
//! board (`z`) and its rotation (`c_rotation`). Positions are in canvas units
//! of 10 mil; `z` is in hundredths of a millimetre.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;

/// One EasyEDA canvas unit (10 mil) in millimetres.
pub const EASYEDA_UNIT_MM: f64 = 0.254;

/// Declared model `z` units per millimetre.
pub const DECLARED_Z_PER_MM: f64 = 100.0;

const SVGNODE_PREFIX: &str = "SVGNODE~";
const OUTLINE_3D: &str = "outline3D";

/// Declared model rotation, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationTriple {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationTriple {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for RotationTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Declared displacement of the model anchor from the footprint origin (mm).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginOffset {
    pub dx: f64,
    pub dy: f64,
}

impl OriginOffset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountType {
    SurfaceMount,
    ThroughHole,
}

impl MountType {
    /// A model declared at board level is surface mount.
    pub fn from_declared_z(declared_z: f64, thresholds: &Thresholds) -> Self {
        if declared_z.abs() < thresholds.mount_z_epsilon {
            MountType::SurfaceMount
        } else {
            MountType::ThroughHole
        }
    }
}

/// The 3D outline node of an EasyEDA footprint, in raw canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredModel {
    pub uuid: String,
    pub title: String,
    pub origin_x: f64,
    pub origin_y: f64,
    pub z: f64,
    pub rotation: RotationTriple,
}

#[derive(Deserialize)]
struct SvgNode {
    #[serde(default)]
    attrs: SvgNodeAttrs,
}

#[derive(Default, Deserialize)]
struct SvgNodeAttrs {
    #[serde(default)]
    c_etype: String,
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    c_origin: String,
    #[serde(default)]
    z: String,
    #[serde(default)]
    c_rotation: String,
}

impl DeclaredModel {
    /// Decode one footprint shape record.
    ///
    /// Returns `None` for anything other than an `SVGNODE` 3D outline.
    pub fn from_shape(shape: &str) -> anyhow::Result<Option<Self>> {
        let Some(json) = shape.strip_prefix(SVGNODE_PREFIX) else {
            return Ok(None);
        };
        let node: SvgNode =
            serde_json::from_str(json).context("Failed to decode EasyEDA SVGNODE shape")?;
        let attrs = node.attrs;
        if attrs.c_etype != OUTLINE_3D {
            return Ok(None);
        }

        let [origin_x, origin_y] = parse_numbers::<2>(&attrs.c_origin)
            .with_context(|| format!("Invalid 3D model origin {:?}", attrs.c_origin))?;
        let z = if attrs.z.trim().is_empty() {
            0.0
        } else {
            parse_number(&attrs.z).with_context(|| format!("Invalid 3D model z {:?}", attrs.z))?
        };
        let rotation = if attrs.c_rotation.trim().is_empty() {
            RotationTriple::default()
        } else {
            let [x, y, z] = parse_numbers::<3>(&attrs.c_rotation)
                .with_context(|| format!("Invalid 3D model rotation {:?}", attrs.c_rotation))?;
            RotationTriple::new(x, y, z)
        };

        Ok(Some(Self {
            uuid: attrs.uuid,
            title: attrs.title,
            origin_x,
            origin_y,
            z,
            rotation,
        }))
    }

    /// First 3D outline among a footprint's shape records.
    pub fn find_in_shapes<'a, I>(shapes: I) -> anyhow::Result<Option<Self>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for shape in shapes {
            if let Some(model) = Self::from_shape(shape)? {
                return Ok(Some(model));
            }
        }
        Ok(None)
    }
}

fn parse_number(field: &str) -> anyhow::Result<f64> {
    let value: f64 = field.trim().parse()?;
    anyhow::ensure!(value.is_finite(), "non-finite value {value}");
    Ok(value)
}

fn parse_numbers<const N: usize>(field: &str) -> anyhow::Result<[f64; N]> {
    let parts: Vec<&str> = field.split(',').collect();
    anyhow::ensure!(
        parts.len() == N,
        "expected {N} comma separated values, found {}",
        parts.len()
    );
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_number(part)?;
    }
    Ok(out)
}

/// Everything the engine needs to know about a part besides its mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub origin_offset: OriginOffset,
    /// Declared model height above the board, in millimetres.
    pub declared_z: f64,
    pub mount: MountType,
    pub rotation: RotationTriple,
}

impl SourceMetadata {
    pub fn new(
        origin_offset: OriginOffset,
        declared_z: f64,
        rotation: RotationTriple,
        thresholds: &Thresholds,
    ) -> Self {
        Self {
            origin_offset,
            declared_z,
            mount: MountType::from_declared_z(declared_z, thresholds),
            rotation,
        }
    }

    /// Convert a declared model relative to the footprint origin (canvas units).
    pub fn from_declared(
        model: &DeclaredModel,
        footprint_origin: (f64, f64),
        thresholds: &Thresholds,
    ) -> Self {
        let (fp_x, fp_y) = footprint_origin;
        let origin_offset = OriginOffset::new(
            (model.origin_x - fp_x) * EASYEDA_UNIT_MM,
            (model.origin_y - fp_y) * EASYEDA_UNIT_MM,
        );
        Self::new(
            origin_offset,
            model.z / DECLARED_Z_PER_MM,
            model.rotation,
            thresholds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(attrs: &str) -> String {
        format!(
            r#"SVGNODE~{{"gId":"g1_outline","nodeName":"g","nodeType":1,"layerid":"19","attrs":{attrs},"childNodes":[]}}"#
        )
    }

    #[test]
    fn decodes_outline_node() {
        let shape = outline(
            r#"{"c_width":"23.622","c_height":"11.811","c_origin":"4000,3006.25","z":"3.937","c_rotation":"0,0,180","title":"SOT-23","uuid":"abc123","c_etype":"outline3D"}"#,
        );
        let model = DeclaredModel::from_shape(&shape).unwrap().unwrap();

        assert_eq!(model.uuid, "abc123");
        assert_eq!(model.title, "SOT-23");
        assert_eq!(model.origin_x, 4000.0);
        assert_eq!(model.origin_y, 3006.25);
        assert_eq!(model.z, 3.937);
        assert_eq!(model.rotation, RotationTriple::new(0.0, 0.0, 180.0));
    }

    #[test]
    fn missing_z_and_rotation_default_to_zero() {
        let shape = outline(r#"{"c_origin":"10,20","uuid":"u","c_etype":"outline3D"}"#);
        let model = DeclaredModel::from_shape(&shape).unwrap().unwrap();
        assert_eq!(model.z, 0.0);
        assert_eq!(model.rotation, RotationTriple::default());
    }

    #[test]
    fn ignores_other_shapes() {
        assert_eq!(
            DeclaredModel::from_shape("TRACK~1~3~~4000 3000 4010 3000~gge1~0").unwrap(),
            None
        );
        let silk = outline(r#"{"c_etype":"silkscreen","c_origin":"0,0"}"#);
        assert_eq!(DeclaredModel::from_shape(&silk).unwrap(), None);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(DeclaredModel::from_shape("SVGNODE~{not json").is_err());
        let bad_origin = outline(r#"{"c_origin":"12","c_etype":"outline3D"}"#);
        assert!(DeclaredModel::from_shape(&bad_origin).is_err());
        let bad_rotation =
            outline(r#"{"c_origin":"1,2","c_rotation":"0,x,0","c_etype":"outline3D"}"#);
        assert!(DeclaredModel::from_shape(&bad_rotation).is_err());
    }

    #[test]
    fn finds_first_outline_in_shape_list() {
        let first = outline(r#"{"c_origin":"1,2","uuid":"first","c_etype":"outline3D"}"#);
        let second = outline(r#"{"c_origin":"3,4","uuid":"second","c_etype":"outline3D"}"#);
        let shapes = [
            "PAD~RECT~4000~3000~6~6~1~~1~0~~0~gge2~0",
            first.as_str(),
            second.as_str(),
        ];

        let model = DeclaredModel::find_in_shapes(shapes).unwrap().unwrap();
        assert_eq!(model.uuid, "first");
        assert_eq!(DeclaredModel::find_in_shapes(["TEXT~P~0~0"]).unwrap(), None);
    }

    #[test]
    fn converts_to_millimetres_relative_to_footprint() {
        let model = DeclaredModel {
            uuid: "u".into(),
            title: "t".into(),
            origin_x: 4010.0,
            origin_y: 2995.0,
            z: -13.3858,
            rotation: RotationTriple::new(0.0, 0.0, 90.0),
        };
        let meta = SourceMetadata::from_declared(&model, (4000.0, 3000.0), &Thresholds::default());

        assert!((meta.origin_offset.dx - 2.54).abs() < 1e-9);
        assert!((meta.origin_offset.dy + 1.27).abs() < 1e-9);
        assert!((meta.declared_z + 0.133858).abs() < 1e-9);
        assert_eq!(meta.mount, MountType::ThroughHole);
        assert_eq!(meta.rotation.z, 90.0);
    }

    #[test]
    fn declared_z_is_in_hundredths_of_a_millimetre() {
        let model = DeclaredModel {
            uuid: "u".into(),
            title: "t".into(),
            origin_x: 0.0,
            origin_y: 0.0,
            z: 635.0,
            rotation: RotationTriple::default(),
        };
        let meta = SourceMetadata::from_declared(&model, (0.0, 0.0), &Thresholds::default());
        assert!((meta.declared_z - 6.35).abs() < 1e-9);
        assert_eq!(meta.origin_offset, OriginOffset::new(0.0, 0.0));
    }

    #[test]
    fn board_level_model_is_surface_mount() {
        let thresholds = Thresholds::default();
        assert_eq!(
            MountType::from_declared_z(0.0, &thresholds),
            MountType::SurfaceMount
        );
        assert_eq!(
            MountType::from_declared_z(-0.0005, &thresholds),
            MountType::SurfaceMount
        );
        assert_eq!(
            MountType::from_declared_z(-1.2, &thresholds),
            MountType::ThroughHole
        );
    }
}
