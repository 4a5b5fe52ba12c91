use rand::Rng;
use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Dense row-major matrix. Vectors are stored as single-column matrices
/// (`n × 1`) so that `W · a + b` reads the same way it is written.
#[derive(Debug, Clone, PartialEq)]
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

    /// Builds an `n × 1` column vector.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Flattens a single-column matrix back into a plain vector.
    pub fn to_column_vec(&self) -> Vec<f64> {
        debug_assert_eq!(self.cols, 1, "to_column_vec on a {}x{} matrix", self.rows, self.cols);
        self.data.iter().map(|row| row[0]).collect()
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        assert!(
            data.iter().all(|row| row.len() == cols),
            "Matrix rows must all have the same length"
        );
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// He initialization: samples from N(0, sqrt(2 / cols)).
    ///
    /// Shape: (rows, cols). `cols` is the fan-in (number of input connections).
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / cols as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for value in row.iter_mut() {
                *value = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!(
                "Matrices are of incorrect sizes: {}x{} · {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for (i, lhs_row) in self.data.iter().enumerate() {
            for (k, &a) in lhs_row.iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                for (out, &b) in res.data[i].iter_mut().zip(rhs.data[k].iter()) {
                    *out += a * b;
                }
            }
        }

        res
    }

    /// `selfᵀ · rhs` without building the transpose.
    pub fn transpose_dot(&self, rhs: &Matrix) -> Matrix {
        if self.rows != rhs.rows {
            panic!(
                "Matrices are of incorrect sizes: ({}x{})ᵀ · {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        let mut res = Matrix::zeros(self.cols, rhs.cols);

        for (lhs_row, rhs_row) in self.data.iter().zip(rhs.data.iter()) {
            for (j, &a) in lhs_row.iter().enumerate() {
                for (out, &b) in res.data[j].iter_mut().zip(rhs_row.iter()) {
                    *out += a * b;
                }
            }
        }

        res
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.shape(), rhs.shape(), "Hadamard product of mismatched shapes");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect())
                .collect(),
        }
    }

    /// Outer product of two column vectors: `self · rhsᵀ`.
    pub fn outer(&self, rhs: &Matrix) -> Matrix {
        debug_assert_eq!(self.cols, 1);
        debug_assert_eq!(rhs.cols, 1);
        Matrix {
            rows: self.rows,
            cols: rhs.rows,
            data: self
                .data
                .iter()
                .map(|a| rhs.data.iter().map(|b| a[0] * b[0]).collect())
                .collect(),
        }
    }

    /// `self -= scale * rhs`, in place.
    pub fn sub_scaled(&mut self, rhs: &Matrix, scale: f64) {
        assert_eq!(self.shape(), rhs.shape(), "Matrices are of incorrect sizes");
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, g) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= scale * g;
            }
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        assert_eq!(self.shape(), rhs.shape(), "Matrices are of incorrect sizes");
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(mut self, rhs: Self) -> Self::Output {
        self.sub_scaled(&rhs, 1.0);
        self
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        self.dot(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn dot_multiplies_matrix_by_column() {
        let w = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let x = Matrix::column(&[1.0, -1.0]);
        assert_eq!((&w * &x).to_column_vec(), vec![-1.0, -1.0, -1.0]);
    }

    #[test]
    fn outer_product_shape() {
        let a = Matrix::column(&[1.0, 2.0]);
        let b = Matrix::column(&[3.0, 4.0, 5.0]);
        let o = a.outer(&b);
        assert_eq!(o.shape(), (2, 3));
        assert_eq!(o.data[1], vec![6.0, 8.0, 10.0]);
    }

    #[test]
    fn transpose_swaps_dimensions() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 1));
        assert_eq!(t.to_column_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn transpose_dot_matches_explicit_transpose() {
        let w = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let d = Matrix::column(&[0.5, -1.0, 2.0]);
        assert_eq!(w.transpose_dot(&d), w.transpose().dot(&d));
    }

    #[test]
    fn sub_scaled_updates_in_place() {
        let mut m = Matrix::from_data(vec![vec![1.0, 1.0]]);
        m.sub_scaled(&Matrix::from_data(vec![vec![2.0, 4.0]]), 0.5);
        assert_eq!(m.data[0], vec![0.0, -1.0]);
    }

    #[test]
    fn he_init_is_reproducible_for_a_seed() {
        let a = Matrix::he(4, 3, &mut StdRng::seed_from_u64(7));
        let b = Matrix::he(4, 3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.shape(), (4, 3));
    }

    #[test]
    #[should_panic]
    fn dot_rejects_mismatched_shapes() {
        let _ = Matrix::zeros(2, 3).dot(&Matrix::zeros(2, 1));
    }
}
