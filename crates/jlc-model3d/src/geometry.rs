//! Axis-aligned bounds of a 3D model mesh.

use crate::error::PlacementError;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a model, in millimetres.
///
/// Z is the board normal: `z = 0` is the reference plane the model is
/// authored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    z_min: f64,
    z_max: f64,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        let (lo, hi) = (min.min(max), min.max(max));
        Self {
            x_min: lo.x,
            x_max: hi.x,
            y_min: lo.y,
            y_max: hi.y,
            z_min: lo.z,
            z_max: hi.z,
        }
    }

    /// Bounds of a vertex stream. An empty stream has no geometry.
    pub fn from_points<I>(points: I) -> Result<Self, PlacementError>
    where
        I: IntoIterator,
        I::Item: Into<DVec3>,
    {
        let mut points = points.into_iter().map(Into::<DVec3>::into);
        let first = points.next().ok_or(PlacementError::NoGeometry)?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Ok(Self::new(min, max))
    }

    /// Bounds of the `v` records of an OBJ document.
    ///
    /// Normals, texture coordinates, faces and materials are ignored, as are
    /// vertex lines whose coordinates do not parse.
    pub fn from_obj(source: &str) -> Result<Self, PlacementError> {
        Self::from_points(source.lines().filter_map(parse_obj_vertex))
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn z_min(&self) -> f64 {
        self.z_min
    }

    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    pub fn min(&self) -> DVec3 {
        DVec3::new(self.x_min, self.y_min, self.z_min)
    }

    pub fn max(&self) -> DVec3 {
        DVec3::new(self.x_max, self.y_max, self.z_max)
    }

    pub fn height(&self) -> f64 {
        self.z_max - self.z_min
    }

    pub fn center(&self) -> DVec3 {
        (self.min() + self.max()) / 2.0
    }
}

fn parse_obj_vertex(line: &str) -> Option<DVec3> {
    let mut fields = line.split_whitespace();
    if fields.next()? != "v" {
        return None;
    }

    let mut coords = [0.0; 3];
    for coord in &mut coords {
        let field = fields.next()?;
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() => *coord = value,
            _ => {
                log::debug!("Skipping malformed OBJ vertex line: {line}");
                return None;
            }
        }
    }
    Some(DVec3::from_array(coords))
}
