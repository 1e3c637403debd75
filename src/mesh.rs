//! Facet list representation

use crate::{BBox3, Facet, StlMode, Result};
use std::path::Path;

pub mod io; // STL encoder and decoder
mod math; // Polygon facet builder
mod relief; // Heightmap relief builder
mod transform; // Translation helpers

pub use io::{format_exp, read_ascii, read_binary, write_ascii, write_binary, write_binary_seekable};
pub use math::{triangle_normal, FaceReport};

/// Triangle mesh stored as independent STL facets
///
/// Facets keep insertion order and are only ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    facets: Vec<Facet>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for `capacity` facets
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            facets: Vec::with_capacity(capacity),
        }
    }

    /// Append a facet
    ///
    /// Returns the facet index.
    pub fn add_facet(&mut self, facet: Facet) -> usize {
        self.facets.push(facet);
        self.facets.len() - 1
    }

    /// Get facet count
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Get a facet by index
    pub fn facet(&self, index: usize) -> Option<&Facet> {
        self.facets.get(index)
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Facet> {
        self.facets.iter()
    }

    /// Bounding box over all vertices
    pub fn bounding_box(&self) -> BBox3 {
        let mut bbox = BBox3::empty();
        for facet in &self.facets {
            for v in facet.vertices {
                bbox.include_point(v);
            }
        }
        bbox
    }

    /// Number of facets whose normal is the zero vector
    pub fn zero_normal_count(&self) -> usize {
        self.facets.iter().filter(|f| f.has_zero_normal()).count()
    }

    /// Save to an STL file in the given layout
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use stlrelief::{Mesh, StlMode};
    /// use nalgebra::Vector3;
    ///
    /// let mut mesh = Mesh::new();
    /// mesh.add_triangle(Vector3::zeros(), Vector3::x(), Vector3::y());
    /// mesh.save_stl("triangle.stl", StlMode::Binary)?;
    /// # Ok::<(), stlrelief::Error>(())
    /// ```
    pub fn save_stl<P: AsRef<Path>>(&self, path: P, mode: StlMode) -> Result<()> {
        io::save_stl_impl(self, path, mode, &crate::EncoderConfig::default())
    }

    /// Save to an STL file with an explicit header and solid name
    pub fn save_stl_with_config<P: AsRef<Path>>(
        &self,
        path: P,
        mode: StlMode,
        config: &crate::EncoderConfig,
    ) -> Result<()> {
        io::save_stl_impl(self, path, mode, config)
    }

    /// Load from a binary STL file
    pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Self> {
        io::load_stl_impl(path).map(|(_, mesh)| mesh)
    }

    /// Load from an ASCII STL file
    pub fn load_stl_ascii<P: AsRef<Path>>(path: P) -> Result<Self> {
        io::load_stl_ascii_impl(path).map(|(_, mesh)| mesh)
    }
}

impl From<Vec<Facet>> for Mesh {
    fn from(facets: Vec<Facet>) -> Self {
        Self { facets }
    }
}

impl FromIterator<Facet> for Mesh {
    fn from_iter<I: IntoIterator<Item = Facet>>(iter: I) -> Self {
        Self {
            facets: iter.into_iter().collect(),
        }
    }
}

impl Extend<Facet> for Mesh {
    fn extend<I: IntoIterator<Item = Facet>>(&mut self, iter: I) {
        self.facets.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Facet;
    type IntoIter = std::slice::Iter<'a, Facet>;

    fn into_iter(self) -> Self::IntoIter {
        self.facets.iter()
    }
}

impl IntoIterator for Mesh {
    type Item = Facet;
    type IntoIter = std::vec::IntoIter<Facet>;

    fn into_iter(self) -> Self::IntoIter {
        self.facets.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.bounding_box().is_empty());
    }

    #[test]
    fn test_add_facet_keeps_order() {
        let mut mesh = Mesh::new();
        let a = Facet::new(Vector3::zeros(), Vector3::zeros(), Vector3::x(), Vector3::y());
        let b = Facet::new(Vector3::zeros(), Vector3::zeros(), Vector3::y(), Vector3::z());
        assert_eq!(mesh.add_facet(a), 0);
        assert_eq!(mesh.add_facet(b), 1);
        assert_eq!(mesh.facet(0), Some(&a));
        assert_eq!(mesh.facet(1), Some(&b));
        assert_eq!(mesh.facet(2), None);
        assert_eq!(mesh.zero_normal_count(), 2);
    }

    #[test]
    fn test_bounding_box() {
        let mesh: Mesh = vec![Facet::new(
            Vector3::z(),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 3.0, -4.0),
        )]
        .into();
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min(), Vector3::new(-1.0, 0.0, -4.0));
        assert_eq!(bbox.max(), Vector3::new(2.0, 3.0, 0.0));
    }
}
