use std::{
    fmt::Display,
    ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign},
    slice::Chunks,
};

use crate::{domains::float::NumericalFloatLike, utils::l2_norm};

/// An n-dimensional vector.
#[derive(Clone, PartialEq, Debug)]
pub struct Vector<T> {
    pub(crate) data: Vec<T>,
}

impl<T: NumericalFloatLike> Vector<T> {
    /// Create a new vector from a list of scalars.
    pub fn new(data: Vec<T>) -> Vector<T> {
        Vector { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The Euclidean norm of the vector. For complex entries, the modulus of
    /// each entry is used.
    pub fn norm(&self) -> f64 {
        l2_norm(&self.data)
    }

    /// Multiply the scalar `e` to each entry of the vector.
    pub fn mul_scalar(&self, e: &T) -> Vector<T> {
        Vector {
            data: self.data.iter().map(|x| x.clone() * e).collect(),
        }
    }

    /// Divide each entry of the vector by the scalar `e`.
    pub fn div_scalar(&self, e: &T) -> Vector<T> {
        Vector {
            data: self.data.iter().map(|x| x.clone() / e).collect(),
        }
    }

    /// Compute the outer product `self ⊗ rhs`, i.e. the matrix with entries `self[i] * rhs[j]`.
    pub fn outer(&self, rhs: &Self) -> Matrix<T> {
        Matrix {
            data: self
                .data
                .iter()
                .flat_map(|a| rhs.data.iter().map(move |b| a.clone() * b))
                .collect(),
            nrows: self.data.len() as u32,
            ncols: rhs.data.len() as u32,
        }
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Vector { data }
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T: NumericalFloatLike> Display for Vector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, e) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            Display::fmt(e, f)?;
        }
        f.write_str("}")
    }
}

impl<T: NumericalFloatLike> Add<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;

    /// Add two vectors.
    fn add(self, rhs: &Vector<T>) -> Self::Output {
        let mut res = self.clone();
        res += rhs;
        res
    }
}

impl<T: NumericalFloatLike> AddAssign<&Vector<T>> for Vector<T> {
    /// Add two vectors in place.
    fn add_assign(&mut self, rhs: &Vector<T>) {
        if self.data.len() != rhs.data.len() {
            panic!(
                "Cannot add vectors of different length: {} vs {}",
                self.data.len(),
                rhs.data.len()
            );
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += b;
        }
    }
}

impl<T: NumericalFloatLike> Sub<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;

    /// Subtract two vectors.
    fn sub(self, rhs: &Vector<T>) -> Self::Output {
        let mut res = self.clone();
        res -= rhs;
        res
    }
}

impl<T: NumericalFloatLike> SubAssign<&Vector<T>> for Vector<T> {
    /// Subtract two vectors in place.
    fn sub_assign(&mut self, rhs: &Vector<T>) {
        if self.data.len() != rhs.data.len() {
            panic!(
                "Cannot subtract vectors of different length: {} vs {}",
                self.data.len(),
                rhs.data.len()
            );
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a -= b;
        }
    }
}

impl<T: NumericalFloatLike> Neg for Vector<T> {
    type Output = Vector<T>;

    /// Negate each entry of the vector.
    fn neg(mut self) -> Self::Output {
        for e in &mut self.data {
            *e = -e.clone();
        }

        self
    }
}

/// A dense matrix with scalar entries, stored in row-major order.
/// A vector can be represented as a matrix with one row or one column.
#[derive(Clone, PartialEq, Debug)]
pub struct Matrix<T> {
    pub(crate) data: Vec<T>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
}

impl<T: NumericalFloatLike> Matrix<T> {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32) -> Matrix<T> {
        Matrix {
            data: (0..nrows as usize * ncols as usize)
                .map(|_| T::new_zero())
                .collect(),
            nrows,
            ncols,
        }
    }

    /// Create a new column vector from a list of scalars.
    pub fn new_vec(data: Vec<T>) -> Matrix<T> {
        Matrix {
            nrows: data.len() as u32,
            ncols: 1,
            data,
        }
    }

    /// Convert a linear representation of a matrix to a `Matrix`.
    pub fn from_linear(data: Vec<T>, nrows: u32, ncols: u32) -> Result<Matrix<T>, String> {
        if data.len() == nrows as usize * ncols as usize {
            Ok(Matrix { data, nrows, ncols })
        } else {
            Err(format!(
                "Data length does not match matrix dimensions: {} vs ({},{})",
                data.len(),
                nrows,
                ncols
            ))
        }
    }

    /// Create a new matrix from a 2-dimensional vector of scalars.
    pub fn from_nested_vec(matrix: Vec<Vec<T>>) -> Result<Matrix<T>, String> {
        let mut data = vec![];

        let nrows = matrix.len();
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);

        for d in matrix {
            if d.len() != cols {
                return Err("Matrix is not rectangular".to_string());
            }

            data.extend(d);
        }

        Ok(Matrix {
            nrows: nrows as u32,
            ncols: cols as u32,
            data,
        })
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> Chunks<'_, T> {
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Multiply the matrix with the column vector `v`.
    pub fn mul_vec(&self, v: &[T]) -> Result<Vec<T>, MatrixError> {
        if self.ncols as usize != v.len() {
            return Err(MatrixError::ShapeMismatch);
        }

        Ok(self
            .row_iter()
            .take(self.nrows as usize)
            .map(|row| {
                let mut sum = T::new_zero();
                for (a, b) in row.iter().zip(v) {
                    sum = a.mul_add(b, &sum);
                }
                sum
            })
            .collect())
    }

    /// Get the Frobenius norm of the matrix.
    pub fn norm(&self) -> f64 {
        l2_norm(&self.data)
    }

    /// Compute the LU decomposition of a square matrix with partial pivoting.
    pub fn lu(&self) -> Result<LuDecomposition<T>, MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        let n = self.nrows;
        let mut lu = self.clone();
        let mut permutation: Vec<u32> = (0..n).collect();
        let mut swaps = 0;
        let mut singular = false;

        for j in 0..n {
            // select the pivot with the largest magnitude
            let mut p = j;
            let mut max = lu[(j, j)].magnitude();
            for k in j + 1..n {
                let m = lu[(k, j)].magnitude();
                if m > max {
                    max = m;
                    p = k;
                }
            }

            if p != j {
                for l in 0..n {
                    lu.data.swap((n * p + l) as usize, (n * j + l) as usize);
                }
                permutation.swap(p as usize, j as usize);
                swaps += 1;
            }

            if max == 0. || max.is_nan() {
                singular = true;
                continue;
            }

            let inv_x = lu[(j, j)].inv();
            for k in j + 1..n {
                let s = lu[(k, j)].clone() * &inv_x;
                for l in j + 1..n {
                    let e = lu[(j, l)].clone() * &s;
                    lu[(k, l)] -= e;
                }
                lu[(k, j)] = s;
            }
        }

        Ok(LuDecomposition {
            lu,
            permutation,
            odd_permutation: swaps % 2 == 1,
            singular,
        })
    }

    /// Compute the determinant of the matrix.
    pub fn det(&self) -> Result<T, MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        match self.nrows {
            0 => Err(MatrixError::Singular),
            1 => Ok(self.data[0].clone()),
            2 => Ok(self.data[0].clone() * &self.data[3] - self.data[1].clone() * &self.data[2]),
            _ => Ok(self.lu()?.det()),
        }
    }

    /// Solve `A * x = b` for `x`, where `A` is `self`.
    pub fn solve(&self, b: &[T]) -> Result<Vec<T>, MatrixError> {
        self.lu()?.solve(b)
    }
}

impl<T> Index<(u32, u32)> for Matrix<T> {
    type Output = T;

    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<T> IndexMut<(u32, u32)> for Matrix<T> {
    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut T {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<T: NumericalFloatLike> Display for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, row) in self.row_iter().take(self.nrows as usize).enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str("{")?;
            for (j, e) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                Display::fmt(e, f)?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}

impl<T: NumericalFloatLike> Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    /// Add two matrices.
    fn add(self, rhs: &Matrix<T>) -> Self::Output {
        let mut m = self.clone();
        m += rhs;
        m
    }
}

impl<T: NumericalFloatLike> AddAssign<&Matrix<T>> for Matrix<T> {
    /// Add two matrices in place.
    fn add_assign(&mut self, rhs: &Matrix<T>) {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot add matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        for (a, b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a += b;
        }
    }
}

impl<T: NumericalFloatLike> Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    /// Subtract two matrices.
    fn sub(self, rhs: &Matrix<T>) -> Self::Output {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot subtract matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = self.clone();
        for (a, b) in m.data.iter_mut().zip(rhs.data.iter()) {
            *a -= b;
        }
        m
    }
}

impl<T: NumericalFloatLike> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix<T>) -> Self::Output {
        if self.ncols != rhs.nrows {
            panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols);

        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let mut sum = T::new_zero();
                for k in 0..self.ncols {
                    sum = self[(i, k)].mul_add(&rhs[(k, j)], &sum);
                }
                m[(i, j)] = sum;
            }
        }

        m
    }
}

impl<T: NumericalFloatLike> Neg for Matrix<T> {
    type Output = Matrix<T>;

    /// Negate each entry of the matrix.
    fn neg(mut self) -> Self::Output {
        for e in &mut self.data {
            *e = -e.clone();
        }

        self
    }
}

/// Errors that can occur when performing matrix operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    NotSquare,
    Singular,
    ShapeMismatch,
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::NotSquare => write!(f, "The matrix is not square"),
            MatrixError::Singular => write!(f, "The matrix is singular"),
            MatrixError::ShapeMismatch => write!(f, "The shape of the matrix is not compatible"),
        }
    }
}

impl std::error::Error for MatrixError {}

/// The LU decomposition `P * A = L * U` of a square matrix `A`, where `L` is unit lower
/// triangular and `U` is upper triangular. Both are stored in a single matrix.
#[derive(Clone, Debug)]
pub struct LuDecomposition<T> {
    lu: Matrix<T>,
    permutation: Vec<u32>,
    odd_permutation: bool,
    singular: bool,
}

impl<T: NumericalFloatLike> LuDecomposition<T> {
    /// Return true iff a pivot was exactly zero.
    pub fn is_singular(&self) -> bool {
        self.singular
    }

    /// Compute the determinant of the decomposed matrix.
    pub fn det(&self) -> T {
        let n = self.lu.nrows;
        let mut det = T::new_zero().one();
        for i in 0..n {
            det *= &self.lu[(i, i)];
        }

        if self.odd_permutation {
            -det
        } else {
            det
        }
    }

    /// Solve `A * x = b` by forward and back substitution.
    pub fn solve(&self, b: &[T]) -> Result<Vec<T>, MatrixError> {
        let n = self.lu.nrows;
        if b.len() != n as usize {
            return Err(MatrixError::ShapeMismatch);
        }
        if self.singular {
            return Err(MatrixError::Singular);
        }

        let mut x: Vec<T> = self.permutation.iter().map(|&p| b[p as usize].clone()).collect();

        for i in 0..n {
            for j in 0..i {
                let e = self.lu[(i, j)].clone() * &x[j as usize];
                x[i as usize] -= e;
            }
        }

        for i in (0..n).rev() {
            for j in i + 1..n {
                let e = self.lu[(i, j)].clone() * &x[j as usize];
                x[i as usize] -= e;
            }
            x[i as usize] /= &self.lu[(i, i)];
        }

        Ok(x)
    }
}
