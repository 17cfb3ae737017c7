//! Floating-point numbers and traits.

use std::{
    fmt::{self, Debug, Display, LowerExp, Write},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// A number, that is potentially floating point.
pub trait NumericalFloatLike:
    PartialEq
    + Clone
    + Debug
    + LowerExp
    + Display
    + std::ops::Neg<Output = Self>
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Div<Self, Output = Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> Div<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + AddAssign<Self>
    + SubAssign<Self>
    + MulAssign<Self>
    + DivAssign<Self>
{
    /// Perform `(self * a) + b`.
    fn mul_add(&self, a: &Self, b: &Self) -> Self;
    fn zero(&self) -> Self;
    /// Create a zero without a reference value.
    fn new_zero() -> Self;
    fn one(&self) -> Self;
    fn pow(&self, e: u64) -> Self;
    fn inv(&self) -> Self;

    fn from_usize(&self, a: usize) -> Self;
    fn from_f64(&self, a: f64) -> Self;

    /// The absolute value, or the modulus for complex numbers.
    fn magnitude(&self) -> f64;
    fn get_epsilon(&self) -> f64;
}

/// A number that behaves like a single number.
pub trait SingleFloat: NumericalFloatLike {
    fn is_zero(&self) -> bool;
    fn is_one(&self) -> bool;
    fn is_finite(&self) -> bool;
    fn is_nan(&self) -> bool;
}

/// A real floating-point number, such as `f32` or `f64`.
pub trait Real: SingleFloat + Copy + PartialOrd {
    fn new_from_f64(a: f64) -> Self;
    fn to_f64(&self) -> f64;

    fn abs(&self) -> Self;
    fn sqrt(&self) -> Self;
    fn powf(&self, e: &Self) -> Self;
    fn atan2(&self, x: &Self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    fn max(&self, other: &Self) -> Self;
}

macro_rules! impl_real_float {
    ($t:ty) => {
        impl NumericalFloatLike for $t {
            #[inline(always)]
            fn mul_add(&self, a: &Self, b: &Self) -> Self {
                <$t>::mul_add(*self, *a, *b)
            }

            #[inline(always)]
            fn zero(&self) -> Self {
                0.
            }

            #[inline(always)]
            fn new_zero() -> Self {
                0.
            }

            #[inline(always)]
            fn one(&self) -> Self {
                1.
            }

            #[inline]
            fn pow(&self, e: u64) -> Self {
                debug_assert!(e <= i32::MAX as u64);
                self.powi(e as i32)
            }

            #[inline(always)]
            fn inv(&self) -> Self {
                1. / self
            }

            #[inline(always)]
            fn from_usize(&self, a: usize) -> Self {
                a as $t
            }

            #[inline(always)]
            fn from_f64(&self, a: f64) -> Self {
                a as $t
            }

            #[inline(always)]
            fn magnitude(&self) -> f64 {
                <$t>::abs(*self) as f64
            }

            #[inline(always)]
            fn get_epsilon(&self) -> f64 {
                <$t>::EPSILON as f64 / 2.
            }
        }

        impl SingleFloat for $t {
            #[inline(always)]
            fn is_zero(&self) -> bool {
                *self == 0.
            }

            #[inline(always)]
            fn is_one(&self) -> bool {
                *self == 1.
            }

            #[inline(always)]
            fn is_finite(&self) -> bool {
                <$t>::is_finite(*self)
            }

            #[inline(always)]
            fn is_nan(&self) -> bool {
                <$t>::is_nan(*self)
            }
        }

        impl Real for $t {
            #[inline(always)]
            fn new_from_f64(a: f64) -> Self {
                a as $t
            }

            #[inline(always)]
            fn to_f64(&self) -> f64 {
                *self as f64
            }

            #[inline(always)]
            fn abs(&self) -> Self {
                <$t>::abs(*self)
            }

            #[inline(always)]
            fn sqrt(&self) -> Self {
                <$t>::sqrt(*self)
            }

            #[inline(always)]
            fn powf(&self, e: &Self) -> Self {
                <$t>::powf(*self, *e)
            }

            #[inline(always)]
            fn atan2(&self, x: &Self) -> Self {
                <$t>::atan2(*self, *x)
            }

            #[inline(always)]
            fn sin(&self) -> Self {
                <$t>::sin(*self)
            }

            #[inline(always)]
            fn cos(&self) -> Self {
                <$t>::cos(*self)
            }

            #[inline(always)]
            fn max(&self, other: &Self) -> Self {
                <$t>::max(*self, *other)
            }
        }
    };
}

impl_real_float!(f32);
impl_real_float!(f64);

/// A complex number, `re + i * im`, where `i` is the imaginary unit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T: Default> Default for Complex<T> {
    fn default() -> Self {
        Complex {
            re: T::default(),
            im: T::default(),
        }
    }
}

impl<T: NumericalFloatLike> Complex<T> {
    #[inline]
    pub fn new(re: T, im: T) -> Complex<T> {
        Complex { re, im }
    }

    #[inline]
    pub fn new_zero() -> Self {
        Complex {
            re: T::new_zero(),
            im: T::new_zero(),
        }
    }

    /// Create a complex number with a vanishing imaginary part.
    #[inline]
    pub fn from_real(re: T) -> Self {
        let im = re.zero();
        Complex { re, im }
    }

    #[inline]
    pub fn one(&self) -> Self {
        Complex {
            re: self.re.one(),
            im: self.im.zero(),
        }
    }

    #[inline]
    pub fn conj(&self) -> Self {
        Complex {
            re: self.re.clone(),
            im: -self.im.clone(),
        }
    }

    #[inline]
    pub fn zero(&self) -> Self {
        Complex {
            re: self.re.zero(),
            im: self.im.zero(),
        }
    }

    #[inline]
    pub fn i(&self) -> Complex<T> {
        Complex {
            re: self.re.zero(),
            im: self.im.one(),
        }
    }

    #[inline]
    pub fn norm_squared(&self) -> T {
        self.re.clone() * &self.re + self.im.clone() * &self.im
    }
}

impl<T: Real> Complex<T> {
    /// The modulus `|z|`.
    #[inline]
    pub fn norm(&self) -> T {
        // hypot-like scaling to avoid overflow of the squares
        let (a, b) = (self.re.abs(), self.im.abs());
        if a.is_nan() || b.is_nan() {
            return a + b;
        }
        let m = a.max(&b);
        if m.is_zero() || !m.is_finite() {
            return m;
        }
        let (x, y) = (a / m, b / m);
        m * (x * x + y * y).sqrt()
    }

    #[inline]
    pub fn arg(&self) -> T {
        self.im.atan2(&self.re)
    }

    #[inline]
    pub fn to_polar_coordinates(self) -> (T, T) {
        (self.norm(), self.arg())
    }

    #[inline]
    pub fn from_polar_coordinates(r: T, phi: T) -> Complex<T> {
        Complex::new(r * phi.cos(), r * phi.sin())
    }
}

impl<'a, 'b, T: NumericalFloatLike> Add<&'a Complex<T>> for &'b Complex<T> {
    type Output = Complex<T>;

    #[inline]
    fn add(self, rhs: &'a Complex<T>) -> Complex<T> {
        Complex::new(self.re.clone() + &rhs.re, self.im.clone() + &rhs.im)
    }
}

impl<'a, 'b, T: NumericalFloatLike> Sub<&'a Complex<T>> for &'b Complex<T> {
    type Output = Complex<T>;

    #[inline]
    fn sub(self, rhs: &'a Complex<T>) -> Complex<T> {
        Complex::new(self.re.clone() - &rhs.re, self.im.clone() - &rhs.im)
    }
}

impl<'a, 'b, T: NumericalFloatLike> Mul<&'a Complex<T>> for &'b Complex<T> {
    type Output = Complex<T>;

    #[inline]
    fn mul(self, rhs: &'a Complex<T>) -> Complex<T> {
        let re = self.re.clone() * &rhs.re - self.im.clone() * &rhs.im;
        let im = self.re.clone() * &rhs.im + self.im.clone() * &rhs.re;
        Complex::new(re, im)
    }
}

impl<'a, 'b, T: NumericalFloatLike> Div<&'a Complex<T>> for &'b Complex<T> {
    type Output = Complex<T>;

    /// Divide by multiplying with the conjugate of `rhs`.
    #[inline]
    fn div(self, rhs: &'a Complex<T>) -> Complex<T> {
        let n = rhs.norm_squared();
        let re = self.re.clone() * &rhs.re + self.im.clone() * &rhs.im;
        let im = self.im.clone() * &rhs.re - self.re.clone() * &rhs.im;
        Complex::new(re / &n, im / &n)
    }
}

/// Derive the owned and assigning variants of a binary operator from the
/// implementation on references.
macro_rules! forward_complex_binop {
    ($op:ident, $f:ident, $op_assign:ident, $f_assign:ident) => {
        impl<T: NumericalFloatLike> $op for Complex<T> {
            type Output = Complex<T>;

            #[inline]
            fn $f(self, rhs: Complex<T>) -> Complex<T> {
                <&Complex<T> as $op<&Complex<T>>>::$f(&self, &rhs)
            }
        }

        impl<'a, T: NumericalFloatLike> $op<&'a Complex<T>> for Complex<T> {
            type Output = Complex<T>;

            #[inline]
            fn $f(self, rhs: &'a Complex<T>) -> Complex<T> {
                <&Complex<T> as $op<&Complex<T>>>::$f(&self, rhs)
            }
        }

        impl<T: NumericalFloatLike> $op_assign for Complex<T> {
            #[inline]
            fn $f_assign(&mut self, rhs: Complex<T>) {
                *self = <&Complex<T> as $op<&Complex<T>>>::$f(self, &rhs);
            }
        }

        impl<'a, T: NumericalFloatLike> $op_assign<&'a Complex<T>> for Complex<T> {
            #[inline]
            fn $f_assign(&mut self, rhs: &'a Complex<T>) {
                *self = <&Complex<T> as $op<&Complex<T>>>::$f(self, rhs);
            }
        }
    };
}

forward_complex_binop!(Add, add, AddAssign, add_assign);
forward_complex_binop!(Sub, sub, SubAssign, sub_assign);
forward_complex_binop!(Mul, mul, MulAssign, mul_assign);
forward_complex_binop!(Div, div, DivAssign, div_assign);

impl<T: NumericalFloatLike> Neg for Complex<T> {
    type Output = Complex<T>;

    #[inline]
    fn neg(self) -> Complex<T> {
        Complex::new(-self.re, -self.im)
    }
}

impl<T: NumericalFloatLike> Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        Display::fmt(&self.re, f)?;
        f.write_char('+')?;
        Display::fmt(&self.im, f)?;
        f.write_str("i)")
    }
}

impl<T: NumericalFloatLike> Debug for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        Debug::fmt(&self.re, f)?;
        f.write_char('+')?;
        Debug::fmt(&self.im, f)?;
        f.write_str("i)")
    }
}

impl<T: NumericalFloatLike> LowerExp for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        LowerExp::fmt(&self.re, f)?;
        f.write_char('+')?;
        LowerExp::fmt(&self.im, f)?;
        f.write_str("i)")
    }
}

impl<T: Real> SingleFloat for Complex<T> {
    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    #[inline(always)]
    fn is_one(&self) -> bool {
        self.re.is_one() && self.im.is_zero()
    }

    #[inline(always)]
    fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    #[inline(always)]
    fn is_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

impl<T: Real> NumericalFloatLike for Complex<T> {
    #[inline]
    fn mul_add(&self, a: &Self, b: &Self) -> Self {
        *self * a + b
    }

    #[inline]
    fn zero(&self) -> Self {
        Complex {
            re: self.re.zero(),
            im: self.im.zero(),
        }
    }

    fn new_zero() -> Self {
        Complex {
            re: T::new_zero(),
            im: T::new_zero(),
        }
    }

    fn one(&self) -> Self {
        Complex {
            re: self.re.one(),
            im: self.im.zero(),
        }
    }

    fn pow(&self, mut e: u64) -> Self {
        let mut base = *self;
        let mut r = self.one();
        while e > 0 {
            if e & 1 == 1 {
                r *= &base;
            }
            base = base * base;
            e >>= 1;
        }
        r
    }

    fn inv(&self) -> Self {
        let n = self.norm_squared();
        Complex::new(self.re / n, -self.im / n)
    }

    fn from_usize(&self, a: usize) -> Self {
        Complex {
            re: self.re.from_usize(a),
            im: self.im.zero(),
        }
    }

    fn from_f64(&self, a: f64) -> Self {
        Complex {
            re: self.re.from_f64(a),
            im: self.im.zero(),
        }
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        self.norm().to_f64()
    }

    #[inline(always)]
    fn get_epsilon(&self) -> f64 {
        self.re.get_epsilon().max(self.im.get_epsilon())
    }
}

impl<T: NumericalFloatLike> From<T> for Complex<T> {
    #[inline]
    fn from(value: T) -> Self {
        Complex::from_real(value)
    }
}

impl<T: NumericalFloatLike> From<(T, T)> for Complex<T> {
    #[inline]
    fn from((re, im): (T, T)) -> Self {
        Complex::new(re, im)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn complex_arithmetic() {
        let a = Complex::new(1., 2.);
        let b = Complex::new(3., -1.);

        assert_eq!(a + b, Complex::new(4., 1.));
        assert_eq!(a - b, Complex::new(-2., 3.));
        assert_eq!(a * b, Complex::new(5., 5.));
        assert_eq!((a * b) / b, a);
        assert_eq!(-a, Complex::new(-1., -2.));
        assert_eq!(a.conj(), Complex::new(1., -2.));
        assert_eq!(a.norm_squared(), 5.);
        assert_eq!(a.inv() * a, Complex::new(1., 0.));
    }

    #[test]
    fn complex_pow() {
        let z = Complex::new(0.4, 0.9);
        let mut r = z.one();
        for _ in 0..5 {
            r *= &z;
        }
        let p = z.pow(5);
        assert!((p - r).norm() < 1e-15);
        assert_eq!(z.pow(0), Complex::new(1., 0.));
    }

    #[test]
    fn magnitude() {
        assert_eq!(Complex::new(3., 4.).norm(), 5.);
        assert_eq!(Complex::new(3f32, -4.).magnitude(), 5.);
        assert_eq!((-2.5f64).magnitude(), 2.5);
        assert_eq!(Complex::new(1e300, 1e300).norm(), 1e300 * 2f64.sqrt());
        assert_eq!(Complex::<f64>::new_zero().norm(), 0.);
    }

    #[test]
    fn nan_magnitude() {
        assert!(Complex::new(f64::NAN, 0.).norm().is_nan());
        assert!(Complex::new(0f32, f32::NAN).magnitude().is_nan());
        assert!(Complex::new(f64::INFINITY, f64::NAN).norm().is_nan());
        assert!(Complex::new(f64::NAN, 1.).is_nan());
        assert_eq!(Complex::new(f64::INFINITY, 1.).norm(), f64::INFINITY);
    }

    #[test]
    fn polar() {
        let z = Complex::from_polar_coordinates(2., std::f64::consts::FRAC_PI_2);
        assert!(z.re.abs() < 1e-15);
        assert!((z.im - 2.).abs() < 1e-15);
        let (r, phi) = z.to_polar_coordinates();
        assert!((r - 2.).abs() < 1e-15);
        assert!((phi - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Complex::new(1.5, -2.)), "(1.5+-2i)");
    }
}
