use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::{
    domains::float::SingleFloat,
    tensors::matrix::Matrix,
    utils::{almost_zero, almost_zero_delta, DEFAULT_EPSILON, DEFAULT_EPSILON_F32},
};

use super::{check_len, SolveError};

/// Settings for the Newton-Raphson solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonSettings {
    /// The relative tolerance on the determinant of the Jacobian and on the step size.
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        NewtonSettings {
            epsilon: DEFAULT_EPSILON,
            max_iterations: 25,
        }
    }
}

impl NewtonSettings {
    /// Settings suited for single-precision scalars.
    pub fn single_precision() -> Self {
        NewtonSettings {
            epsilon: DEFAULT_EPSILON_F32 as f64,
            ..Default::default()
        }
    }
}

/// A multivariate Newton-Raphson solver for `F(x) = 0`.
///
/// Each iteration solves `J(x) * d = F(x)` and updates `x -= d`, where `J` is the
/// Jacobian of `F`. The scalars can be real or complex.
///
/// ```rust
/// use rootfind::{solve::newton::Newton, tensors::matrix::Matrix};
///
/// let newton = Newton::default();
/// let root = newton
///     .find_root(
///         |x: &[f64]| vec![x[0] * x[0] - 2.],
///         |x: &[f64]| Matrix::new_vec(vec![2. * x[0]]),
///         &[1.],
///     )
///     .unwrap();
/// assert!((root[0] - 2f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Newton {
    settings: NewtonSettings,
}

impl Newton {
    pub fn new(settings: NewtonSettings) -> Newton {
        Newton { settings }
    }

    pub fn settings(&self) -> &NewtonSettings {
        &self.settings
    }

    /// Find a root of `f`, starting from `x0`, where `g` computes the Jacobian of `f`.
    ///
    /// The iteration stops with an error as soon as `is_zero` holds for the determinant
    /// of the Jacobian, and converges once `delta_is_zero` holds for the step and the tolerance.
    /// If the step has not become small within the maximal number of iterations,
    /// the last iterate is returned in [SolveError::MaxIterationsExceeded].
    #[instrument(level = "debug", skip_all)]
    pub fn find_root_with<T, F, G, Z, D>(
        &self,
        mut f: F,
        mut g: G,
        x0: &[T],
        mut is_zero: Z,
        mut delta_is_zero: D,
    ) -> Result<Vec<T>, SolveError<T>>
    where
        T: SingleFloat,
        F: FnMut(&[T]) -> Vec<T>,
        G: FnMut(&[T]) -> Matrix<T>,
        Z: FnMut(&T) -> bool,
        D: FnMut(&[T], f64) -> bool,
    {
        let n = x0.len();
        if n == 0 {
            return Err(SolveError::InvalidArgument(
                "The initial guess is empty".to_owned(),
            ));
        }

        let mut x = x0.to_vec();

        for iteration in 0..self.settings.max_iterations {
            let fx = check_len(f(&x), n)?;

            let jacobian = g(&x);
            if jacobian.nrows() != n || jacobian.ncols() != n {
                return Err(SolveError::InvalidArgument(format!(
                    "The Jacobian has shape ({},{}) for {} unknowns",
                    jacobian.nrows(),
                    jacobian.ncols(),
                    n
                )));
            }

            let lu = jacobian
                .lu()
                .map_err(|e| SolveError::from_matrix_error(e, iteration))?;

            if is_zero(&lu.det()) {
                debug!("Singular Jacobian in iteration {}", iteration);
                return Err(SolveError::ZeroDeterminant { iteration });
            }

            let delta = lu
                .solve(&fx)
                .map_err(|e| SolveError::from_matrix_error(e, iteration))?;

            for (xi, di) in x.iter_mut().zip(&delta) {
                *xi -= di;
            }

            if delta_is_zero(&delta, self.settings.epsilon) {
                debug!("Newton converged after {} iterations", iteration + 1);
                return Ok(x);
            }

            trace!("Iteration {}: x = {:?}", iteration, x);
        }

        debug!(
            "Newton did not converge within {} iterations",
            self.settings.max_iterations
        );

        Err(SolveError::MaxIterationsExceeded {
            iterations: self.settings.max_iterations,
            solution: x,
        })
    }

    /// Find a root of `f` starting from `x0`, where `g` computes the Jacobian of `f`.
    /// The determinant and the step are compared to zero with the relative tolerance
    /// of the settings.
    pub fn find_root<T, F, G>(&self, f: F, g: G, x0: &[T]) -> Result<Vec<T>, SolveError<T>>
    where
        T: SingleFloat,
        F: FnMut(&[T]) -> Vec<T>,
        G: FnMut(&[T]) -> Matrix<T>,
    {
        let epsilon = self.settings.epsilon;
        self.find_root_with(
            f,
            g,
            x0,
            |d| almost_zero(d, epsilon),
            |delta, eps| almost_zero_delta(delta, eps),
        )
    }

    /// Find a root of `f` starting from `x0`, yielding `None` if the solver fails for any reason.
    pub fn try_find_root<T, F, G>(&self, f: F, g: G, x0: &[T]) -> Option<Vec<T>>
    where
        T: SingleFloat,
        F: FnMut(&[T]) -> Vec<T>,
        G: FnMut(&[T]) -> Matrix<T>,
    {
        self.find_root(f, g, x0).ok()
    }
}

#[cfg(test)]
mod test {
    use crate::{
        domains::float::Complex,
        solve::{
            newton::{Newton, NewtonSettings},
            SolveError,
        },
        tensors::matrix::Matrix,
    };

    #[test]
    fn sqrt2() {
        let newton = Newton::default();
        let r = newton
            .find_root(
                |x: &[f64]| vec![x[0] * x[0] - 2.],
                |x: &[f64]| Matrix::new_vec(vec![2. * x[0]]),
                &[1.],
            )
            .unwrap();
        assert!((r[0] - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn single_precision() {
        let newton = Newton::new(NewtonSettings::single_precision());
        let r = newton
            .find_root(
                |x: &[f32]| vec![x[0] * x[0] - 2.],
                |x: &[f32]| Matrix::new_vec(vec![2. * x[0]]),
                &[1.],
            )
            .unwrap();
        assert!((r[0] - std::f32::consts::SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn system() {
        // x^2 + y^2 = 4, x = y
        let newton = Newton::default();
        let r = newton
            .find_root(
                |x: &[f64]| vec![x[0] * x[0] + x[1] * x[1] - 4., x[0] - x[1]],
                |x: &[f64]| {
                    Matrix::from_nested_vec(vec![vec![2. * x[0], 2. * x[1]], vec![1., -1.]])
                        .unwrap()
                },
                &[1., 0.5],
            )
            .unwrap();
        assert!((r[0] - std::f64::consts::SQRT_2).abs() < 1e-10);
        assert!((r[1] - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn complex() {
        let newton = Newton::default();
        let r = newton
            .find_root(
                |x: &[Complex<f64>]| vec![x[0] * x[0] + x[0].one()],
                |x: &[Complex<f64>]| {
                    Matrix::new_vec(vec![x[0] * Complex::new(2., 0.)])
                },
                &[Complex::new(0.5, 0.5)],
            )
            .unwrap();
        assert!((r[0] - Complex::new(0., 1.)).norm() < 1e-10);
    }

    #[test]
    fn zero_determinant() {
        let newton = Newton::default();
        let r = newton.find_root(
            |x: &[f64]| vec![x[0] * x[0] + 1.],
            |x: &[f64]| Matrix::new_vec(vec![2. * x[0]]),
            &[0.],
        );
        assert_eq!(r, Err(SolveError::ZeroDeterminant { iteration: 0 }));

        let r = newton.try_find_root(
            |x: &[f64]| vec![x[0] * x[0] + 1.],
            |x: &[f64]| Matrix::new_vec(vec![2. * x[0]]),
            &[0.],
        );
        assert_eq!(r, None);
    }

    #[test]
    fn max_iterations() {
        // x^2 + 1 has no real root, so the iterates wander around
        let newton = Newton::new(NewtonSettings {
            max_iterations: 5,
            ..Default::default()
        });

        let mut evaluations = 0;
        let r = newton.find_root(
            |x: &[f64]| {
                evaluations += 1;
                vec![x[0] * x[0] + 1.]
            },
            |x: &[f64]| Matrix::new_vec(vec![2. * x[0]]),
            &[0.5],
        );

        match r {
            Err(SolveError::MaxIterationsExceeded {
                iterations,
                solution,
            }) => {
                assert_eq!(iterations, 5);
                assert_eq!(solution.len(), 1);
                assert!(solution[0].is_finite());
            }
            r => panic!("Unexpected result {:?}", r),
        }
        assert_eq!(evaluations, 5);
    }

    #[test]
    fn custom_comparers() {
        let newton = Newton::default();
        let r = newton
            .find_root_with(
                |x: &[f64]| vec![x[0] - 3.],
                |_: &[f64]| Matrix::new_vec(vec![1.]),
                &[0.],
                |d| *d == 0.,
                |delta, _| delta.iter().all(|d| d.abs() < 1e-3),
            )
            .unwrap();
        assert_eq!(r, vec![3.]);
    }

    #[test]
    fn nan_residual() {
        // sqrt(x) + 1 has no root, and the first step leaves the domain of sqrt
        let r = Newton::default().find_root(
            |x: &[f64]| vec![x[0].sqrt() + 1.],
            |_: &[f64]| Matrix::new_vec(vec![1.]),
            &[1.],
        );
        assert!(matches!(
            r,
            Err(SolveError::MaxIterationsExceeded { iterations: 25, .. })
        ));

        let r = Newton::default().try_find_root(
            |_: &[f64]| vec![f64::NAN, 0.],
            |_: &[f64]| Matrix::from_linear(vec![1., 0., 0., 1.], 2, 2).unwrap(),
            &[0., 0.],
        );
        assert_eq!(r, None);
    }

    #[test]
    fn invalid_arguments() {
        let newton = Newton::default();
        let r = newton.find_root(
            |x: &[f64]| vec![x[0], x[0]],
            |_: &[f64]| Matrix::new_vec(vec![1.]),
            &[0.5],
        );
        assert!(matches!(r, Err(SolveError::InvalidArgument(_))));

        let r = newton.find_root(
            |x: &[f64]| vec![x[0]],
            |_: &[f64]| Matrix::new_vec(vec![1., 2.]),
            &[0.5],
        );
        assert!(matches!(r, Err(SolveError::InvalidArgument(_))));

        let r = newton.find_root(|_: &[f64]| vec![], |_: &[f64]| Matrix::new(0, 0), &[]);
        assert!(matches!(r, Err(SolveError::InvalidArgument(_))));
    }
}
