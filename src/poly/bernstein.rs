use crate::{
    combinatorics::BinomialTable,
    domains::float::{Complex, Real},
};

use super::polynomial::Polynomial;

impl<T: Real> Polynomial<T> {
    /// Convert a polynomial given by its Bernstein control points `weights` on `[0, 1]`
    /// to the power basis, using the process-wide binomial table.
    ///
    /// ```rust
    /// use rootfind::poly::Polynomial;
    ///
    /// let p = Polynomial::from_bernstein_real(&[0., 1.]);
    /// assert_eq!(p, Polynomial::from_real(&[1., 0.]));
    /// ```
    pub fn from_bernstein(weights: &[Complex<T>]) -> Self {
        Self::from_bernstein_with(BinomialTable::global(), weights)
    }

    /// Convert real Bernstein control points to the power basis.
    pub fn from_bernstein_real(weights: &[T]) -> Self {
        let w: Vec<_> = weights.iter().map(|w| Complex::from_real(*w)).collect();
        Self::from_bernstein(&w)
    }

    /// Convert Bernstein control points to the power basis, reading the binomial
    /// coefficients from `table`.
    ///
    /// The coefficient of `t^k` is `C(n, k)` times the `k`th forward difference
    /// of the control points.
    pub fn from_bernstein_with(table: &BinomialTable, weights: &[Complex<T>]) -> Self {
        let Some(n) = weights.len().checked_sub(1) else {
            return Self::zero();
        };

        let mut diff = weights.to_vec();
        let mut coeffs = vec![Complex::new_zero(); n + 1];

        for k in 0..=n {
            let binom = diff[0].re.from_f64(table.get(n, k) as f64);
            coeffs[n - k] = diff[0] * Complex::from_real(binom);

            for j in 0..diff.len() - 1 {
                diff[j] = diff[j + 1] - diff[j];
            }
            diff.pop();
        }

        Self::new(coeffs)
    }
}
