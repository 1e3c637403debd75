//! Mesh transformation operations

use crate::{Facet, Mesh};
use nalgebra::Vector3;

impl Mesh {
    /// Create a copy with every vertex shifted by `offset`
    ///
    /// Normals are unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stlrelief::Mesh;
    /// use nalgebra::Vector3;
    ///
    /// let mut mesh = Mesh::new();
    /// mesh.add_triangle(Vector3::zeros(), Vector3::x(), Vector3::y());
    /// let moved = mesh.translated(Vector3::new(1.0, 0.0, 0.0));
    /// assert_eq!(moved.facets()[0].v0(), Vector3::new(1.0, 0.0, 0.0));
    /// ```
    pub fn translated(&self, offset: Vector3<f32>) -> Mesh {
        self.iter()
            .map(|f| Facet {
                vertices: f.vertices.map(|v| v + offset),
                ..*f
            })
            .collect()
    }

    /// Create a copy scaled per axis, then shifted by `offset`
    ///
    /// Normals are recomputed from the transformed vertices since a
    /// non-uniform scale changes their direction; zero normals stay zero.
    pub fn create_transformed(&self, scale: Vector3<f32>, offset: Vector3<f32>) -> Mesh {
        self.iter()
            .map(|f| {
                let vertices = f.vertices.map(|v| v.component_mul(&scale) + offset);
                let normal = if f.has_zero_normal() {
                    Vector3::zeros()
                } else {
                    super::triangle_normal(vertices[0], vertices[1], vertices[2])
                        .unwrap_or_else(Vector3::zeros)
                };
                Facet {
                    normal,
                    vertices,
                    attribute: f.attribute,
                }
            })
            .collect()
    }

    /// Copy recentred so the bounding box center sits at the origin
    pub fn centered(&self) -> Mesh {
        let bbox = self.bounding_box();
        if bbox.is_empty() {
            return self.clone();
        }
        self.translated(-bbox.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_triangle(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        );
        mesh
    }

    #[test]
    fn test_translated_keeps_normal() {
        let moved = triangle().translated(Vector3::new(1.0, 0.0, 0.0));
        let facet = moved.facets()[0];
        assert_eq!(facet.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(facet.vertices[1], Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_mirror_flips_normal() {
        let mirrored =
            triangle().create_transformed(Vector3::new(1.0, 1.0, -1.0), Vector3::zeros());
        // mirroring in z keeps the triangle in the z = 0 plane; winding unchanged
        assert_eq!(mirrored.facets()[0].normal, Vector3::new(0.0, 0.0, 1.0));

        let flipped =
            triangle().create_transformed(Vector3::new(-1.0, 1.0, 1.0), Vector3::zeros());
        assert_eq!(flipped.facets()[0].normal, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_centered() {
        let centered = triangle().centered();
        let bbox = centered.bounding_box();
        assert_eq!(bbox.center(), Vector3::zeros());
        assert!(Mesh::new().centered().is_empty());
    }
}
