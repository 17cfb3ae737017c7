//! Closed-form solvers for real linear, quadratic and cubic equations.
//!
//! The quadratic solver uses a compensated discriminant and root formulas that
//! avoid catastrophic cancellation. The cubic solver finds one real root with
//! Kahan's damped Newton iteration and deflates the cubic into a quadratic.
//!
//! ```rust
//! use rootfind::poly::analytic::{cubic, quadratic};
//!
//! let r = quadratic(1., -4., 4., 1e-8);
//! assert_eq!(r.as_slice(), &[2.]);
//!
//! let mut r = cubic(1., -6., 11., -6., 1e-8);
//! r.sort_by(|a, b| a.partial_cmp(b).unwrap());
//! assert!((r[0] - 1.).abs() < 1e-8 && (r[1] - 2.).abs() < 1e-8 && (r[2] - 3.).abs() < 1e-8);
//! ```

use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::utils::almost_zero;

/// The real roots of an equation of degree at most three.
pub type AnalyticRoots = SmallVec<[f64; 3]>;

/// Veltkamp's constant `2^27 + 1` that splits a double into two halves.
const SPLITTER: f64 = 134217729.;
/// Kahan's constant for the initial step of the cubic iteration.
const KAHAN_STEP: f64 = 1.324717957244746;
const MAX_CUBIC_ITERATIONS: usize = 100;

/// Solve `a * x + b = 0`. The flag is false when `a` is zero within `epsilon`,
/// in which case the returned root is not meaningful.
pub fn linear(a: f64, b: f64, epsilon: f64) -> (f64, bool) {
    (-b / a, !almost_zero(&a, epsilon))
}

/// Solve `a * x^2 + b * x + c = 0` for its real roots.
///
/// If `a` is zero within `epsilon` the linear equation `b * x + c = 0` is solved, and if
/// `b` is zero as well, there are no roots. A double root is only reported once.
pub fn quadratic(a: f64, b: f64, c: f64, epsilon: f64) -> AnalyticRoots {
    if almost_zero(&a, epsilon) {
        if almost_zero(&b, epsilon) {
            return smallvec![];
        }

        return match linear(b, c, epsilon) {
            (root, true) if root.is_finite() => smallvec![root],
            _ => smallvec![],
        };
    }

    // solve a * x^2 - 2 * b * x + c = 0
    let (mut a, mut b, mut c) = (a, b * -0.5, c);
    let mut d = discriminant(a, b, c);

    if almost_zero(&d, epsilon) {
        let f = normalization_factor(&[a.abs(), b.abs(), c.abs()]);
        if f != 0. {
            a *= f;
            b *= f;
            c *= f;
            d = discriminant(a, b, c);
        }
    }

    // also rejects a NaN discriminant
    if !(d >= 0.) {
        return smallvec![];
    }

    let q = d.sqrt();
    let r = if b < 0. { b - q } else { b + q };

    let (x1, x2) = if r == 0. {
        let x1 = c / a;
        (x1, -x1)
    } else {
        (r / a, c / r)
    };

    let mut roots = AnalyticRoots::new();
    if x1.is_finite() {
        roots.push(x1);
    }
    if x2 != x1 && x2.is_finite() {
        roots.push(x2);
    }
    roots
}

/// Split `v` into a high and a low part that can be multiplied exactly.
#[inline]
fn split(v: f64) -> (f64, f64) {
    let x = v * SPLITTER;
    let y = v - x;
    let hi = y + x;
    (hi, v - hi)
}

/// Compute the discriminant `b^2 - a * c` of `a * x^2 - 2 * b * x + c`.
///
/// When the two products nearly cancel, they are computed with twice the
/// working precision.
pub fn discriminant(a: f64, b: f64, c: f64) -> f64 {
    let d = b * b - a * c;
    let e = b * b + a * c;

    if d.abs() * 3. >= e {
        return d;
    }

    let (ah, al) = split(a);
    let (bh, bl) = split(b);
    let (ch, cl) = split(c);

    let p = b * b;
    let dp = (bh * bh - p + 2. * bh * bl) + bl * bl;
    let q = a * c;
    let dq = (ah * ch - q + ah * cl + al * ch) + al * cl;

    (p - q) + (dp - dq)
}

/// Compute the power of two that scales the largest of `values` close to one,
/// if it is smaller than `1e-8` or larger than `1e8`. Otherwise, or if all values
/// are zero, `0` is returned to signal that no scaling is needed.
///
/// Scaling by a power of two leaves the mantissas untouched.
pub fn normalization_factor(values: &[f64]) -> f64 {
    let norm = values.iter().copied().fold(0., f64::max);

    if norm != 0. && (norm < 1e-8 || norm > 1e8) {
        2f64.powf(-norm.log2().round())
    } else {
        0.
    }
}

/// The deflation of a cubic `a * x^3 + b * x^2 + c * x + d` at a point `x`:
/// the value `q` and derivative `qd` of the cubic, and the coefficients of the quotient
/// `a * x^2 + b1 * x + c2`.
#[derive(Clone, Copy)]
struct Deflation {
    x: f64,
    b1: f64,
    c2: f64,
    qd: f64,
    q: f64,
}

impl Deflation {
    fn at(a: f64, b: f64, c: f64, d: f64, x: f64) -> Deflation {
        let tmp = a * x;
        let b1 = tmp + b;
        let c2 = b1 * x + c;
        Deflation {
            x,
            b1,
            c2,
            qd: (tmp + b1) * x + c2,
            q: c2 * x + d,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.b1.is_finite()
            && self.c2.is_finite()
            && self.qd.is_finite()
            && self.q.is_finite()
    }
}

/// Solve `a * x^3 + b * x^2 + c * x + d = 0` for its real roots.
///
/// If `a` is zero within `epsilon`, the quadratic `b * x^2 + c * x + d` is solved.
/// If `d` is zero, `0` is a root and the remaining roots follow from a quadratic.
/// Otherwise, one real root is found by a Newton iteration that approaches it from
/// one side, and the cubic is deflated to a quadratic.
pub fn cubic(a: f64, b: f64, c: f64, d: f64, epsilon: f64) -> AnalyticRoots {
    let (mut a, mut b, mut c, mut d) = (a, b, c, d);
    let f = normalization_factor(&[a.abs(), b.abs(), c.abs(), d.abs()]);
    if f != 0. {
        a *= f;
        b *= f;
        c *= f;
        d *= f;
    }

    if almost_zero(&a, epsilon) {
        return quadratic(b, c, d, epsilon);
    }

    if almost_zero(&d, epsilon) {
        let mut roots = quadratic(a, b, c, epsilon);
        push_distinct(&mut roots, 0.);
        return roots;
    }

    let mut state = Deflation::at(a, b, c, d, -(b / a) / 3.);
    if !state.is_finite() {
        debug!("Cubic deflation is not finite at the inflection point");
        return smallvec![];
    }

    let t = state.q / a;
    let r = t.abs().cbrt();
    let s = if t < 0. { -1. } else { 1. };
    let td = -state.qd / a;

    let rd = if td > 0. {
        KAHAN_STEP * r.max(td.sqrt())
    } else {
        r
    };
    let mut x0 = state.x - s * rd;

    if x0 != state.x {
        let mut iterations = 0;
        loop {
            let next = Deflation::at(a, b, c, d, x0);
            if !next.is_finite() {
                debug!(
                    "Cubic deflation is not finite at {}; keeping the quadratic at {}",
                    x0, state.x
                );
                return quadratic(a, state.b1, state.c2, epsilon);
            }
            state = next;

            // divide by slightly more than one so that x0 does not cross the root
            x0 = if state.qd == 0. {
                state.x
            } else {
                state.x - state.q / state.qd / (1. + f64::EPSILON)
            };

            iterations += 1;
            if s * x0 <= s * state.x {
                break;
            }

            if iterations >= MAX_CUBIC_ITERATIONS {
                debug!("Cubic iteration stopped after {} steps", iterations);
                break;
            }
        }

        let x = state.x;
        if a.abs() * x * x > (d / x).abs() {
            state.c2 = -d / x;
            state.b1 = (state.c2 - c) / x;
        }
    }

    let mut roots = quadratic(a, state.b1, state.c2, epsilon);
    push_distinct(&mut roots, state.x);
    roots
}

fn push_distinct(roots: &mut AnalyticRoots, x: f64) {
    if x.is_finite() && !roots.contains(&x) {
        roots.push(x);
    }
}
