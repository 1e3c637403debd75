//! Basic types for stlrelief

use nalgebra::Vector3;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Single triangular face record as stored in an STL file
///
/// Vertices are expected in counter-clockwise order when viewed from the side
/// the normal points to. The normal may be the zero vector for degenerate or
/// relief-generated facets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Facet {
    /// Facet normal
    pub normal: Vector3<f32>,
    /// Corner positions (v0, v1, v2)
    pub vertices: [Vector3<f32>; 3],
    /// Attribute byte count; reserved, always written as 0
    pub attribute: u16,
}

impl Facet {
    /// Number of `f32` values in one facet record
    pub const FLOAT_COUNT: usize = 12;

    /// Create a facet from a normal and three vertices
    pub fn new(normal: Vector3<f32>, v0: Vector3<f32>, v1: Vector3<f32>, v2: Vector3<f32>) -> Self {
        Self {
            normal,
            vertices: [v0, v1, v2],
            attribute: 0,
        }
    }

    pub fn v0(&self) -> Vector3<f32> {
        self.vertices[0]
    }

    pub fn v1(&self) -> Vector3<f32> {
        self.vertices[1]
    }

    pub fn v2(&self) -> Vector3<f32> {
        self.vertices[2]
    }

    /// Flatten into `[nx, ny, nz, v0x, v0y, v0z, v1x, ..., v2z]`
    pub fn to_array(&self) -> [f32; Self::FLOAT_COUNT] {
        let mut out = [0.0f32; Self::FLOAT_COUNT];
        out[0..3].copy_from_slice(self.normal.as_slice());
        for (i, v) in self.vertices.iter().enumerate() {
            out[3 + i * 3..6 + i * 3].copy_from_slice(v.as_slice());
        }
        out
    }

    /// Inverse of [`Facet::to_array`]
    pub fn from_array(values: [f32; Self::FLOAT_COUNT]) -> Self {
        let vec = |i: usize| Vector3::new(values[i], values[i + 1], values[i + 2]);
        Self::new(vec(0), vec(3), vec(6), vec(9))
    }

    /// First non-finite component, if any
    pub fn first_non_finite(&self) -> Option<f32> {
        self.to_array().into_iter().find(|v| !v.is_finite())
    }

    /// True if the stored normal is exactly zero
    pub fn has_zero_normal(&self) -> bool {
        self.normal == Vector3::zeros()
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.vertices;
        write!(
            f,
            "Facet(n=({}, {}, {}), ({}, {}, {}), ({}, {}, {}), ({}, {}, {}))",
            self.normal.x,
            self.normal.y,
            self.normal.z,
            a.x,
            a.y,
            a.z,
            b.x,
            b.y,
            b.z,
            c.x,
            c.y,
            c.z
        )
    }
}

/// Named axis directions usable as explicit facet normals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::PosX => Vector3::new(1.0, 0.0, 0.0),
            Axis::NegX => Vector3::new(-1.0, 0.0, 0.0),
            Axis::PosY => Vector3::new(0.0, 1.0, 0.0),
            Axis::NegY => Vector3::new(0.0, -1.0, 0.0),
            Axis::PosZ => Vector3::new(0.0, 0.0, 1.0),
            Axis::NegZ => Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

impl From<Axis> for Vector3<f32> {
    fn from(axis: Axis) -> Self {
        axis.unit()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBox3 {
    min: Vector3<f32>,
    max: Vector3<f32>,
}

impl BBox3 {
    /// Create a new bounding box
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        debug_assert!(min.x <= max.x);
        debug_assert!(min.y <= max.y);
        debug_assert!(min.z <= max.z);
        Self { min, max }
    }

    /// Create an empty bounding box
    pub fn empty() -> Self {
        Self {
            min: Vector3::repeat(f32::MAX),
            max: Vector3::repeat(f32::MIN),
        }
    }

    pub fn min(&self) -> Vector3<f32> {
        self.min
    }

    pub fn max(&self) -> Vector3<f32> {
        self.max
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Check if the bounding box is empty
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand the bounding box to include a point
    pub fn include_point(&mut self, point: Vector3<f32>) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }
}

impl Default for BBox3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BBox3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "BBox3(empty)");
        }
        write!(
            f,
            "BBox3(<{}, {}, {}> .. <{}, {}, {}>)",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_array_order() {
        let facet = Facet::new(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        );
        assert_eq!(
            facet.to_array(),
            [0.0, 0.0, 1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
        assert_eq!(Facet::from_array(facet.to_array()), facet);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut facet = Facet::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Vector3::x(),
            Vector3::y(),
        );
        assert!(facet.first_non_finite().is_none());
        facet.vertices[2].z = f32::INFINITY;
        assert_eq!(facet.first_non_finite(), Some(f32::INFINITY));
    }

    #[test]
    fn test_axis_units() {
        assert_eq!(Vector3::from(Axis::NegZ), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(Axis::PosY.unit().norm(), 1.0);
    }

    #[test]
    fn test_bbox_include() {
        let mut bbox = BBox3::empty();
        assert!(bbox.is_empty());
        bbox.include_point(Vector3::new(1.0, -2.0, 0.5));
        bbox.include_point(Vector3::new(-1.0, 2.0, 0.0));
        assert_eq!(bbox.min(), Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max(), Vector3::new(1.0, 2.0, 0.5));
        assert_eq!(bbox.center(), Vector3::new(0.0, 0.0, 0.25));
    }
}
