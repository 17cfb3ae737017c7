//! Tolerances and approximate comparisons of scalars.
//!
//! All comparisons are relative: two numbers are considered equal when their
//! difference is small compared to the largest of the two magnitudes. Numbers
//! close to zero are compared absolutely instead.

use crate::domains::float::NumericalFloatLike;

/// The default relative tolerance for double precision.
pub const DEFAULT_EPSILON: f64 = 1e-8;
/// The default relative tolerance for single precision.
pub const DEFAULT_EPSILON_F32: f32 = 1e-4;
/// The default relative step used to approximate Jacobians with finite differences.
pub const DEFAULT_JACOBIAN_STEP: f64 = 1e-4;

/// Magnitudes below this value are compared absolutely.
const DOUBLE_PRECISION: f64 = 1.1102230246251565e-16; // 2^-53

/// Compare two numbers with magnitudes `a` and `b` whose difference has
/// magnitude `diff`, within the relative tolerance `epsilon`.
pub fn almost_equal_norm_relative(a: f64, b: f64, diff: f64, epsilon: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }

    if a.is_nan() || b.is_nan() {
        return false;
    }

    if a.abs() < DOUBLE_PRECISION || b.abs() < DOUBLE_PRECISION {
        return diff.abs() < epsilon;
    }

    if (a == 0. && b.abs() < epsilon) || (b == 0. && a.abs() < epsilon) {
        return true;
    }

    diff.abs() < epsilon * a.abs().max(b.abs())
}

/// Check if `a` and `b` are equal within the relative tolerance `epsilon`.
///
/// For complex numbers, the moduli and the modulus of the difference are compared.
pub fn almost_equal<T: NumericalFloatLike>(a: &T, b: &T, epsilon: f64) -> bool {
    let diff = a.clone() - b;
    almost_equal_norm_relative(a.magnitude(), b.magnitude(), diff.magnitude(), epsilon)
}

/// Check if `a` is zero within the tolerance `epsilon`.
#[inline]
pub fn almost_zero<T: NumericalFloatLike>(a: &T, epsilon: f64) -> bool {
    let m = a.magnitude();
    almost_equal_norm_relative(m, 0., m, epsilon)
}

/// The Euclidean norm of a list of scalars.
pub fn l2_norm<T: NumericalFloatLike>(v: &[T]) -> f64 {
    let mut scale: f64 = 0.;
    for x in v {
        let m = x.magnitude();
        if m.is_nan() {
            return m;
        }
        scale = scale.max(m);
    }

    if scale == 0. || scale.is_infinite() {
        return scale;
    }

    let sum: f64 = v
        .iter()
        .map(|x| {
            let m = x.magnitude() / scale;
            m * m
        })
        .sum();
    scale * sum.sqrt()
}

/// Check if the Euclidean norm of the step `delta` is zero within the tolerance `epsilon`.
pub fn almost_zero_delta<T: NumericalFloatLike>(delta: &[T], epsilon: f64) -> bool {
    let norm = l2_norm(delta);
    almost_equal_norm_relative(norm, 0., norm, epsilon)
}

/// Check if every entry of `a` is equal to the corresponding entry of `b` within the tolerance `epsilon`.
/// Yields an error if the slices have a different length.
pub fn almost_equal_slices<T: NumericalFloatLike>(
    a: &[T],
    b: &[T],
    epsilon: f64,
) -> Result<bool, String> {
    if a.len() != b.len() {
        return Err(format!(
            "Slices have a different length: {} vs {}",
            a.len(),
            b.len()
        ));
    }

    Ok(a.iter()
        .zip(b)
        .all(|(x, y)| almost_zero(&(x.clone() - y), epsilon)))
}

#[cfg(test)]
mod test {
    use crate::domains::float::Complex;

    use super::*;

    #[test]
    fn relative_comparison() {
        assert!(almost_equal(&1., &(1. + 1e-10), DEFAULT_EPSILON));
        assert!(!almost_equal(&1., &1.001, DEFAULT_EPSILON));
        assert!(almost_equal(&1e20, &(1e20 + 1e11), DEFAULT_EPSILON));
        assert!(!almost_equal(&f64::NAN, &f64::NAN, DEFAULT_EPSILON));
        assert!(almost_equal(&f64::INFINITY, &f64::INFINITY, DEFAULT_EPSILON));
        assert!(!almost_equal(&f64::INFINITY, &1e300, DEFAULT_EPSILON));
        assert!(almost_equal(&1f32, &1.00001, DEFAULT_EPSILON_F32 as f64));
    }

    #[test]
    fn zero_comparison() {
        assert!(almost_zero(&1e-9, DEFAULT_EPSILON));
        assert!(!almost_zero(&1e-7, DEFAULT_EPSILON));
        assert!(almost_zero(&0., DEFAULT_EPSILON));
        assert!(almost_zero(&Complex::new(1e-9, -1e-9), DEFAULT_EPSILON));
        assert!(!almost_zero(&Complex::new(0., 1e-3), DEFAULT_EPSILON));
    }

    #[test]
    fn delta() {
        assert!(almost_zero_delta(&[1e-10, -1e-10, 0.], DEFAULT_EPSILON));
        assert!(!almost_zero_delta(&[1e-10, 1e-6], DEFAULT_EPSILON));
        assert!(almost_zero_delta::<f64>(&[], DEFAULT_EPSILON));
        assert_eq!(l2_norm(&[3., 4.]), 5.);
    }

    #[test]
    fn nan_is_never_small() {
        assert!(l2_norm(&[f64::NAN]).is_nan());
        assert!(l2_norm(&[0., f64::NAN, 0.]).is_nan());
        assert!(l2_norm(&[f64::INFINITY, f64::NAN]).is_nan());
        assert!(l2_norm(&[Complex::new(f64::NAN, 0.)]).is_nan());
        assert_eq!(l2_norm(&[1., f64::INFINITY]), f64::INFINITY);

        assert!(!almost_zero_delta(&[f64::NAN], DEFAULT_EPSILON));
        assert!(!almost_zero_delta(&[0., f64::NAN], DEFAULT_EPSILON));
        assert!(!almost_zero(&f64::NAN, DEFAULT_EPSILON));
        assert!(!almost_equal_norm_relative(f64::NAN, 0., f64::NAN, DEFAULT_EPSILON));
    }

    #[test]
    fn slices() {
        assert_eq!(
            almost_equal_slices(&[1., 2.], &[1., 2. + 1e-12], DEFAULT_EPSILON),
            Ok(true)
        );
        assert_eq!(
            almost_equal_slices(&[1., 2.], &[1., 2.1], DEFAULT_EPSILON),
            Ok(false)
        );
        assert!(almost_equal_slices(&[1., 2.], &[1.], DEFAULT_EPSILON).is_err());
    }
}
