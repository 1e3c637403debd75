//! Scalar grid used as relief input

use crate::{Error, Result};

/// Row-major grid of intensity values
///
/// Rows run along the first index (`m`), columns along the second (`n`).
/// Intensities usually come from an 8-bit grayscale raster, 0 being ink and
/// 255 background, but any `f32` range works with a matching threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl Heightmap {
    /// Grid of `rows` x `cols` cells all set to `value`
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    /// Grid from row-major values
    pub fn from_vec(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(Error::InvalidParameter(format!(
                "Heightmap of {}x{} needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                values.len()
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// Grid from nested rows; all rows must have the same length
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::InvalidParameter(format!(
                    "Heightmap row {} has {} values, expected {}",
                    index,
                    row.len(),
                    cols
                )));
            }
            values.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, values)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: f32) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        self.values[row * self.cols + col] = value;
    }

    pub(crate) fn at(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.cols + col]
    }

    /// True if any cell is below `threshold`
    pub fn contains_active_cells(&self, threshold: f32) -> bool {
        self.values.iter().any(|value| *value < threshold)
    }

    /// Quarter turn clockwise
    ///
    /// Row `i` of the result is column `i` of the source read bottom to top,
    /// so an `m x n` grid becomes `n x m`.
    pub fn rotated_cw(&self) -> Self {
        let (m, n) = (self.rows, self.cols);
        let mut values = Vec::with_capacity(self.values.len());
        for i in 0..n {
            for j in 0..m {
                values.push(self.at(m - 1 - j, i));
            }
        }
        Self {
            rows: n,
            cols: m,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let map = Heightmap::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(map.rows(), 2);
        assert_eq!(map.cols(), 3);
        assert_eq!(map.get(1, 2), Some(6.0));
        assert_eq!(map.get(2, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows: Vec<Vec<f32>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            Heightmap::from_rows(&rows),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rotated_cw() {
        // 1 2 3        4 1
        // 4 5 6   ->   5 2
        //              6 3
        let map = Heightmap::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let rotated = map.rotated_cw();
        assert_eq!(rotated.rows(), 3);
        assert_eq!(rotated.cols(), 2);
        assert_eq!(rotated.values(), &[4.0, 1.0, 5.0, 2.0, 6.0, 3.0]);
    }

    #[test]
    fn test_active_cells() {
        let mut map = Heightmap::filled(2, 2, 255.0);
        assert!(!map.contains_active_cells(255.0));
        map.set_value(1, 1, 0.0);
        assert!(map.contains_active_cells(255.0));
    }
}
