//! Heightmap to relief surface conversion

use crate::{Error, Facet, Heightmap, Mesh, ReliefConfig, Result};
use nalgebra::Vector3;

impl Mesh {
    /// Build a relief mesh from a heightmap
    ///
    /// # Example
    ///
    /// ```rust
    /// use stlrelief::{Heightmap, Mesh, ReliefConfig};
    ///
    /// let map = Heightmap::filled(4, 3, 0.0);
    /// let mesh = Mesh::from_relief(&map, &ReliefConfig::default())?;
    /// assert_eq!(mesh.facet_count(), 2 * 3 * 2);
    /// # Ok::<(), stlrelief::Error>(())
    /// ```
    pub fn from_relief(map: &Heightmap, config: &ReliefConfig) -> Result<Self> {
        let mut mesh = Mesh::new();
        mesh.add_relief(map, config)?;
        Ok(mesh)
    }

    /// Append the relief surface of `map`
    ///
    /// Each 2x2 window of cells becomes two triangles, (tr, pt, br) and
    /// (br, pt, bl), when all four of its cells are below the threshold.
    /// Windows touching a background cell are left open. Cell values are
    /// scaled by `config.depth_scale` into z; x and y are the cell indices
    /// shifted so the grid is centered on the origin. Normals are zero.
    ///
    /// Returns the number of facets added.
    pub fn add_relief(&mut self, map: &Heightmap, config: &ReliefConfig) -> Result<usize> {
        if map.is_empty() {
            return Err(Error::InvalidParameter(
                "Heightmap has no cells".to_string(),
            ));
        }
        if !config.depth_scale.is_finite() || config.threshold.is_nan() {
            return Err(Error::InvalidParameter(format!(
                "Relief depth scale {} / threshold {} not usable",
                config.depth_scale, config.threshold
            )));
        }

        let rotated;
        let grid = if config.rotate && map.cols() >= map.rows() {
            rotated = map.rotated_cw();
            &rotated
        } else {
            map
        };

        let (m, n) = (grid.rows(), grid.cols());
        let half_m = m as f32 / 2.0;
        let half_n = n as f32 / 2.0;
        let before = self.facet_count();

        for i in 0..m.saturating_sub(1) {
            for k in 0..n.saturating_sub(1) {
                let corners = [
                    grid.at(i, k),
                    grid.at(i, k + 1),
                    grid.at(i + 1, k),
                    grid.at(i + 1, k + 1),
                ];
                // NaN cells fail the comparison and are masked too
                if !corners.iter().all(|v| *v < config.threshold) {
                    continue;
                }

                let x = i as f32 - half_m;
                let y = k as f32 - half_n;
                let point = |dx: f32, dy: f32, value: f32| {
                    Vector3::new(x + dx, y + dy, value * config.depth_scale)
                };
                let pt = point(0.0, 0.0, corners[0]);
                let tr = point(0.0, 1.0, corners[1]);
                let bl = point(1.0, 0.0, corners[2]);
                let br = point(1.0, 1.0, corners[3]);

                self.add_facet(Facet::new(Vector3::zeros(), tr, pt, br));
                self.add_facet(Facet::new(Vector3::zeros(), br, pt, bl));
            }
        }

        Ok(self.facet_count() - before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BACKGROUND;

    fn flat() -> ReliefConfig {
        ReliefConfig::default().with_rotate(false)
    }

    #[test]
    fn test_single_window() {
        let map = Heightmap::from_rows(&[[10.0, 20.0], [30.0, 40.0]]).unwrap();
        let mesh = Mesh::from_relief(&map, &flat()).unwrap();

        assert_eq!(mesh.facet_count(), 2);
        let pt = Vector3::new(-1.0, -1.0, -1.0);
        let tr = Vector3::new(-1.0, 0.0, -2.0);
        let bl = Vector3::new(0.0, -1.0, -3.0);
        let br = Vector3::new(0.0, 0.0, -4.0);

        let upper = mesh.facets()[0];
        let lower = mesh.facets()[1];
        assert_eq!(upper.normal, Vector3::zeros());
        assert_eq!(lower.normal, Vector3::zeros());
        for (got, want) in upper.vertices.iter().zip([tr, pt, br]) {
            assert!((got - want).norm() < 1e-6, "{:?} vs {:?}", got, want);
        }
        for (got, want) in lower.vertices.iter().zip([br, pt, bl]) {
            assert!((got - want).norm() < 1e-6, "{:?} vs {:?}", got, want);
        }
    }

    #[test]
    fn test_background_cell_masks_touching_windows() {
        let mut map = Heightmap::filled(3, 3, 0.0);
        map.set_value(0, 1, BACKGROUND);
        let mesh = Mesh::from_relief(&map, &flat()).unwrap();

        // windows (0,0) and (0,1) touch the bright cell; (1,0) and (1,1) do not
        assert_eq!(mesh.facet_count(), 4);
        let bright = Vector3::new(0.0 - 1.5, 1.0 - 1.5, 0.0);
        for facet in mesh.iter() {
            for v in facet.vertices {
                assert!(v.x > bright.x, "facet uses row 0: {}", facet);
            }
        }
    }

    #[test]
    fn test_all_background_is_empty() {
        let map = Heightmap::filled(5, 4, BACKGROUND);
        let mut mesh = Mesh::new();
        assert_eq!(mesh.add_relief(&map, &flat()).unwrap(), 0);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_wide_grid_is_rotated() {
        let map = Heightmap::filled(2, 5, 0.0);
        let mesh = Mesh::from_relief(&map, &ReliefConfig::default()).unwrap();
        assert_eq!(mesh.facet_count(), 2 * 4);

        // after rotation the 5-long side runs along x
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min().x, -2.5);
        assert_eq!(bbox.max().x, 1.5);
        assert_eq!(bbox.min().y, -1.0);
        assert_eq!(bbox.max().y, 0.0);
    }

    #[test]
    fn test_rotation_disabled_keeps_layout() {
        let map = Heightmap::filled(2, 5, 0.0);
        let mesh = Mesh::from_relief(&map, &flat()).unwrap();
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min().x, -1.0);
        assert_eq!(bbox.max().y, 1.5);
    }

    #[test]
    fn test_single_row_has_no_windows() {
        let map = Heightmap::filled(1, 6, 0.0);
        let mesh = Mesh::from_relief(&map, &flat()).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_empty_map_rejected() {
        let map = Heightmap::filled(0, 3, 0.0);
        assert!(matches!(
            Mesh::from_relief(&map, &flat()),
            Err(Error::InvalidParameter(_))
        ));
    }
}
