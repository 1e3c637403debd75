//! Polygon facet builder and normal math

use crate::{Error, Facet, Mesh, Result};
use nalgebra::Vector3;

/// Outcome of adding a single face
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceReport {
    /// Normal computed from the vertices
    Ok { index: usize },
    /// Zero-area triangle; stored with a zero normal
    Degenerate { index: usize },
}

impl FaceReport {
    /// Facet index in the mesh
    pub fn index(&self) -> usize {
        match *self {
            FaceReport::Ok { index } | FaceReport::Degenerate { index } => index,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, FaceReport::Degenerate { .. })
    }

    /// Turn a degenerate report into `Error::DegenerateGeometry`
    ///
    /// The facet stays in the mesh either way.
    pub fn into_result(self, mesh: &Mesh) -> Result<usize> {
        match self {
            FaceReport::Ok { index } => Ok(index),
            FaceReport::Degenerate { index } => {
                let corners = mesh
                    .facet(index)
                    .map(|f| f.vertices.map(|v| [v.x, v.y, v.z]))
                    .unwrap_or_default();
                Err(Error::DegenerateGeometry(corners))
            }
        }
    }
}

/// Unit normal of triangle ABC by the right-hand rule
///
/// Returns `None` when AB x AC has zero length.
pub fn triangle_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Option<Vector3<f32>> {
    let cross = (b - a).cross(&(c - a));
    let norm = cross.norm();
    if norm == 0.0 || !norm.is_finite() {
        None
    } else {
        Some(cross / norm)
    }
}

impl Mesh {
    /// Add triangle ABC with its normal computed by the right-hand rule
    ///
    /// Collinear or coincident points still produce a facet, with a zero
    /// normal, and the report says so.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stlrelief::Mesh;
    /// use nalgebra::Vector3;
    ///
    /// let mut mesh = Mesh::new();
    /// let report = mesh.add_triangle(
    ///     Vector3::new(0.0, 0.0, 0.0),
    ///     Vector3::new(1.0, 0.0, 0.0),
    ///     Vector3::new(0.0, 1.0, 0.0),
    /// );
    /// assert!(!report.is_degenerate());
    /// assert_eq!(mesh.facets()[0].normal, Vector3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn add_triangle(&mut self, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> FaceReport {
        match triangle_normal(a, b, c) {
            Some(normal) => FaceReport::Ok {
                index: self.add_facet(Facet::new(normal, a, b, c)),
            },
            None => FaceReport::Degenerate {
                index: self.add_facet(Facet::new(Vector3::zeros(), a, b, c)),
            },
        }
    }

    /// Add a facet with an explicit normal, e.g. `Axis::PosZ.into()`
    pub fn add_face_with_normal(
        &mut self,
        a: Vector3<f32>,
        b: Vector3<f32>,
        c: Vector3<f32>,
        normal: impl Into<Vector3<f32>>,
    ) -> usize {
        self.add_facet(Facet::new(normal.into(), a, b, c))
    }

    /// Fan-triangulate a polygon around its first point
    ///
    /// Emits (p0, p1, p2), then for every further point `pi` the triangle
    /// (previous, pi, p0). An n-gon gives n - 2 facets. Points must share a
    /// winding order; convexity and planarity are not checked.
    pub fn add_polygon(&mut self, points: &[Vector3<f32>]) -> Result<Vec<FaceReport>> {
        let [p0, p1, p2, rest @ ..] = points else {
            return Err(Error::InvalidParameter(format!(
                "Polygon needs at least 3 points, got {}",
                points.len()
            )));
        };

        let mut reports = Vec::with_capacity(points.len() - 2);
        reports.push(self.add_triangle(*p0, *p1, *p2));

        let mut last = *p2;
        for &point in rest {
            reports.push(self.add_triangle(last, point, *p0));
            last = point;
        }
        Ok(reports)
    }

    /// Unit normal recomputed from a facet's vertices
    pub fn recomputed_normal(&self, index: usize) -> Result<Vector3<f32>> {
        let facet = self.facet(index).ok_or_else(|| {
            Error::InvalidParameter(format!("Facet index {} out of range", index))
        })?;
        Ok(triangle_normal(facet.v0(), facet.v1(), facet.v2()).unwrap_or_else(Vector3::zeros))
    }

    /// Area of a facet
    pub fn facet_area(&self, index: usize) -> Result<f32> {
        let facet = self.facet(index).ok_or_else(|| {
            Error::InvalidParameter(format!("Facet index {} out of range", index))
        })?;
        Ok(0.5 * (facet.v1() - facet.v0()).cross(&(facet.v2() - facet.v0())).norm())
    }

    /// Compute total surface area of the mesh
    pub fn surface_area(&self) -> f32 {
        self.iter()
            .map(|f| 0.5 * (f.v1() - f.v0()).cross(&(f.v2() - f.v0())).norm())
            .sum()
    }

    /// Signed volume of a closed, consistently oriented mesh.
    ///
    /// Uses the standard triangle-tetrahedron decomposition against the origin.
    /// If the mesh is not closed or triangle winding is inconsistent, results may be meaningless.
    pub fn signed_volume(&self) -> f32 {
        self.iter()
            .map(|f| f.v0().dot(&f.v1().cross(&f.v2())))
            .sum::<f32>()
            / 6.0
    }
}
