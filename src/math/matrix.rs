use serde::{Serialize, Deserialize};
use std::ops::{Index, IndexMut};

/// A dense, rectangular grid of `f64` values.
///
/// Every tensor in the network is built from these grids padded to the width
/// of the widest layer. Only the leading cells of each row are meaningful for
/// a given layer; the trailing padding stays at zero and is never read by the
/// propagation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a `rows × cols` grid and copies `block` into its top-left corner.
    ///
    /// `block` may be ragged as long as it fits; anything outside it is zero.
    pub fn padded_from(block: &[Vec<f64>], rows: usize, cols: usize) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for (i, row) in block.iter().enumerate().take(rows) {
            for (j, &value) in row.iter().enumerate().take(cols) {
                res.data[i][j] = value;
            }
        }
        res
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row]
    }

    /// Copies the `rows × cols` top-left block out as owned vectors.
    pub fn block(&self, rows: usize, cols: usize) -> Vec<Vec<f64>> {
        self.data
            .iter()
            .take(rows)
            .map(|row| row.iter().take(cols).copied().collect())
            .collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row][col]
    }
}
