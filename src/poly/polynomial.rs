use std::{
    fmt::{self, Debug, Display},
    ops::{Add, Div, Mul, Neg, Rem, Sub},
};

use serde::{Deserialize, Serialize};

use crate::{
    domains::float::{Complex, Real, SingleFloat},
    utils::almost_zero,
};

/// A dense univariate polynomial with complex coefficients.
///
/// The coefficients are stored from the highest degree to the constant term,
/// so that `[1, -3, 2]` represents `x^2 - 3x + 2`. There is always at least
/// one coefficient: the zero polynomial is `[0]`.
///
/// Polynomials are immutable values: all operations create a new polynomial.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "PolynomialData<T>",
    bound(deserialize = "T: Real + Deserialize<'de>")
)]
pub struct Polynomial<T = f64> {
    coefficients: Vec<Complex<T>>,
}

/// The serialized form of a [Polynomial], which is validated by [Polynomial::new].
#[derive(Deserialize)]
struct PolynomialData<T> {
    coefficients: Vec<Complex<T>>,
}

impl<T: Real> From<PolynomialData<T>> for Polynomial<T> {
    fn from(data: PolynomialData<T>) -> Self {
        Polynomial::new(data.coefficients)
    }
}

impl<T: Real> Debug for Polynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("coefficients", &self.coefficients)
            .finish()
    }
}

impl<T: Real> Polynomial<T> {
    /// Create a polynomial from its coefficients, starting with the highest degree.
    /// An empty list of coefficients yields the zero polynomial.
    pub fn new(coefficients: Vec<Complex<T>>) -> Self {
        if coefficients.is_empty() {
            return Self::zero();
        }

        Polynomial { coefficients }
    }

    /// Create a polynomial from real coefficients, starting with the highest degree.
    pub fn from_real(coefficients: &[T]) -> Self {
        Self::new(coefficients.iter().map(|c| Complex::from_real(*c)).collect())
    }

    /// Create the zero polynomial `[0]`.
    #[inline]
    pub fn zero() -> Self {
        Polynomial {
            coefficients: vec![Complex::new_zero()],
        }
    }

    /// Create a constant polynomial.
    #[inline]
    pub fn constant(coeff: Complex<T>) -> Self {
        Polynomial {
            coefficients: vec![coeff],
        }
    }

    /// Get the coefficients, starting with the highest degree.
    #[inline]
    pub fn coefficients(&self) -> &[Complex<T>] {
        &self.coefficients
    }

    /// Get the order of the polynomial, i.e. the number of coefficients minus one.
    /// Leading coefficients that are zero are counted.
    #[inline]
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Get the coefficient of the highest-degree term.
    #[inline]
    pub fn lcoeff(&self) -> Complex<T> {
        self.coefficients[0]
    }

    /// Return true iff all coefficients are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|c| c.is_zero())
    }

    /// Count the leading coefficients that are zero within the tolerance `epsilon`.
    pub fn leading_zeros(&self, epsilon: f64) -> usize {
        self.coefficients
            .iter()
            .take_while(|c| almost_zero(*c, epsilon))
            .count()
    }

    /// Get the index and value of the first coefficient that is not zero within
    /// the tolerance `epsilon`.
    pub fn first_non_zero(&self, epsilon: f64) -> Option<(usize, Complex<T>)> {
        let i = self.leading_zeros(epsilon);
        self.coefficients.get(i).map(|c| (i, *c))
    }

    /// Remove the leading coefficients that are zero within the tolerance `epsilon`.
    pub fn trim_leading_zeros(&self, epsilon: f64) -> Self {
        let i = self.leading_zeros(epsilon);
        Self::new(self.coefficients[i..].to_vec())
    }

    /// Evaluate the polynomial at `x` using Horner's scheme.
    pub fn evaluate(&self, x: &Complex<T>) -> Complex<T> {
        let mut res = x.zero();
        for c in &self.coefficients {
            res = res * x + c;
        }
        res
    }

    /// Evaluate the polynomial at the real point `x` and return the real part.
    pub fn evaluate_real(&self, x: T) -> T {
        self.evaluate(&Complex::from_real(x)).re
    }

    /// Compute the derivative. The derivative of a constant is the zero polynomial.
    pub fn derivative(&self) -> Self {
        let order = self.order();
        let one = self.coefficients[0].re.one();

        Self::new(
            self.coefficients[..order]
                .iter()
                .enumerate()
                .map(|(i, c)| *c * Complex::from_real(one.from_usize(order - i)))
                .collect(),
        )
    }

    /// Scale the polynomial so that its leading coefficient is one.
    /// If the leading coefficient is already one, the polynomial is returned unchanged.
    pub fn monic(&self) -> Self {
        let leading = self.lcoeff();
        if leading.is_one() {
            return self.clone();
        }

        self.div_coeff(&leading)
    }

    /// Multiply every coefficient by `coeff`.
    pub fn mul_coeff(&self, coeff: &Complex<T>) -> Self {
        Polynomial {
            coefficients: self.coefficients.iter().map(|c| c * coeff).collect(),
        }
    }

    /// Divide every coefficient by `coeff`.
    pub fn div_coeff(&self, coeff: &Complex<T>) -> Self {
        Polynomial {
            coefficients: self.coefficients.iter().map(|c| c / coeff).collect(),
        }
    }

    /// Divide `self` by `div`, yielding the quotient and the remainder.
    ///
    /// The quotient has order `self.order() - div.order()` and the remainder
    /// has `div.order()` coefficients, so that `self = q * div + r`. If `div` has a higher
    /// order than `self`, the quotient is zero.
    ///
    /// The leading coefficient of `div` must not be zero.
    pub fn quot_rem(&self, div: &Self) -> (Self, Self) {
        let n = self.coefficients.len();
        let m = div.coefficients.len();

        if n < m {
            return (Self::zero(), self.clone());
        }

        let normalizer = div.coefficients[0];
        let mut res = self.coefficients.clone();

        for i in 0..n - (m - 1) {
            res[i] /= &normalizer;
            let coeff = res[i];

            if !coeff.is_zero() {
                for j in 1..m {
                    res[i + j] -= div.coefficients[j] * coeff;
                }
            }
        }

        let r = res.split_off(n - (m - 1));
        (Self::new(res), Self::new(r))
    }

    /// Divide out the linear factor `x - value` using synthetic division,
    /// yielding the quotient, the remainder and the factor.
    ///
    /// The remainder is `self(value)`, so it vanishes when `value` is a root.
    /// Polynomials that are constant after removing leading zeros have a zero quotient.
    pub fn factor_division(
        &self,
        value: Complex<T>,
        epsilon: f64,
    ) -> (Self, Complex<T>, Complex<T>) {
        let significant = self.coefficients.len() - self.leading_zeros(epsilon);

        match significant {
            0 => return (Self::zero(), value.zero(), value),
            1 => return (Self::zero(), self.coefficients[self.order()], value),
            _ => {}
        }

        let mut quotient = Vec::with_capacity(self.order());
        let mut acc = value.zero();
        for c in &self.coefficients {
            acc = acc * value + c;
            quotient.push(acc);
        }

        let remainder = quotient.pop().unwrap_or(acc);
        (Self::new(quotient), remainder, value)
    }
}

impl<T: Real> Display for Polynomial<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let order = self.order();

        let mut first = true;
        for (i, c) in self.coefficients.iter().enumerate() {
            if c.is_zero() {
                continue;
            }

            if first {
                first = false;
            } else {
                write!(f, "+")?;
            }

            match order - i {
                0 => write!(f, "{}", c)?,
                1 => write!(f, "{}*x", c)?,
                e => write!(f, "{}*x^{}", c, e)?,
            }
        }
        Ok(())
    }
}

impl<T: Real> Add for Polynomial<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<'a, 'b, T: Real> Add<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    /// Add two polynomials by aligning their degrees.
    fn add(self, other: &'a Polynomial<T>) -> Self::Output {
        let (longest, shortest) = if self.coefficients.len() >= other.coefficients.len() {
            (self, other)
        } else {
            (other, self)
        };

        let diff = longest.coefficients.len() - shortest.coefficients.len();

        let mut sum = longest.coefficients.clone();
        for (s, c) in sum[diff..].iter_mut().zip(&shortest.coefficients) {
            *s += c;
        }

        Polynomial { coefficients: sum }
    }
}

impl<T: Real> Sub for Polynomial<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<'a, 'b, T: Real> Sub<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    fn sub(self, other: &'a Polynomial<T>) -> Self::Output {
        self + &(-other.clone())
    }
}

impl<T: Real> Neg for Polynomial<T> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = -*c;
        }
        self
    }
}

impl<'a, 'b, T: Real> Mul<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    /// Multiply two polynomials by convolving their coefficients.
    fn mul(self, rhs: &'a Polynomial<T>) -> Self::Output {
        let n = self.coefficients.len();
        let m = rhs.coefficients.len();

        let mut res = vec![Complex::new_zero(); n + m - 1];

        for (e1, c1) in self.coefficients.iter().enumerate() {
            if c1.is_zero() {
                continue;
            }

            for (e2, c2) in rhs.coefficients.iter().enumerate() {
                res[e1 + e2] += c1 * c2;
            }
        }

        Polynomial { coefficients: res }
    }
}

impl<T: Real> Mul for Polynomial<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl<'a, 'b, T: Real> Div<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    /// Compute the quotient of the division. See [Polynomial::quot_rem].
    fn div(self, other: &'a Polynomial<T>) -> Self::Output {
        self.quot_rem(other).0
    }
}

impl<T: Real> Div for Polynomial<T> {
    type Output = Self;

    fn div(self, other: Self) -> Self::Output {
        self.quot_rem(&other).0
    }
}

impl<'a, 'b, T: Real> Rem<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    /// Compute the remainder of the division. See [Polynomial::quot_rem].
    fn rem(self, other: &'a Polynomial<T>) -> Self::Output {
        self.quot_rem(other).1
    }
}

impl<T: Real> Rem for Polynomial<T> {
    type Output = Self;

    fn rem(self, other: Self) -> Self::Output {
        self.quot_rem(&other).1
    }
}
