use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::{Index, IndexMut};

/// Dense row-major matrix. Layers use one row per output neuron and one
/// column per input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Square pass-through matrix: 1 on the diagonal, 0 elsewhere.
    pub fn identity(size: usize) -> Matrix {
        let mut res = Matrix::zeros(size, size);

        for i in 0..size {
            res.data[i][i] = 1.0;
        }

        res
    }

    /// Samples every entry uniformly from `[low, high)`.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, low: f64, high: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = low + rng.gen::<f64>() * (high - low);
            }
        }

        res
    }

    /// Dot product of row `i` with `v`.
    pub fn row_dot(&self, i: usize, v: &[f64]) -> f64 {
        self.data[i].iter().zip(v.iter()).map(|(w, x)| w * x).sum()
    }

    pub fn to_vec(&self) -> Vec<Vec<f64>> {
        self.data.clone()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i][j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i][j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn identity_has_unit_diagonal() {
        let m = Matrix::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn uniform_stays_in_range_and_is_reproducible() {
        let a = Matrix::uniform(4, 5, -0.5, 0.5, &mut StdRng::seed_from_u64(7));
        let b = Matrix::uniform(4, 5, -0.5, 0.5, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!((a.rows, a.cols), (4, 5));
        for i in 0..a.rows {
            for j in 0..a.cols {
                assert!((-0.5..0.5).contains(&a[(i, j)]));
            }
        }
    }

    #[test]
    fn row_dot_and_index_mut() {
        let mut m = Matrix::zeros(2, 2);
        m[(0, 0)] = 1.0;
        m[(0, 1)] = 2.0;
        m[(1, 0)] = 3.0;
        m[(1, 1)] = 4.0;
        assert_eq!(m.row_dot(1, &[1.0, -1.0]), -1.0);
        m[(0, 1)] = 10.0;
        assert_eq!(m.row_dot(0, &[1.0, 1.0]), 11.0);
    }
}
