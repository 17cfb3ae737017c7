use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::{
    domains::float::Real,
    tensors::matrix::{Matrix, Vector},
    utils::{DEFAULT_EPSILON, DEFAULT_JACOBIAN_STEP},
};

use super::{check_len, SolveError};

/// The damping factor that is used when the regular damping underflows.
const MIN_DAMPING: f64 = 1e-4;

/// Settings for Broyden's method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BroydenSettings {
    /// The solver stops when the Euclidean norm of the residual is below this value.
    pub accuracy: f64,
    pub max_iterations: usize,
    /// The step for the finite differences of the initial Jacobian, relative to `1 + |x_i|`.
    pub jacobian_step: f64,
}

impl Default for BroydenSettings {
    fn default() -> Self {
        BroydenSettings {
            accuracy: DEFAULT_EPSILON,
            max_iterations: 100,
            jacobian_step: DEFAULT_JACOBIAN_STEP,
        }
    }
}

/// Broyden's quasi-Newton method for `F(x) = 0` with real scalars.
///
/// The Jacobian is approximated once with forward differences and then refined with
/// rank-one updates, so that no derivatives are needed.
///
/// ```rust
/// use rootfind::solve::broyden::Broyden;
///
/// let root = Broyden::default()
///     .find_root(|x: &[f64]| vec![x[0] * x[0] - 2.], &[1.])
///     .unwrap();
/// assert!((root[0] - 2f64.sqrt()).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Broyden {
    settings: BroydenSettings,
}

impl Broyden {
    pub fn new(settings: BroydenSettings) -> Broyden {
        Broyden { settings }
    }

    pub fn settings(&self) -> &BroydenSettings {
        &self.settings
    }

    /// Find a root of `f` starting from `x0`.
    ///
    /// A step that increases the norm of the residual is damped once. If the residual
    /// is not below the accuracy after the maximal number of iterations,
    /// [SolveError::NonConvergence] is returned.
    #[instrument(level = "debug", skip_all)]
    pub fn find_root<T: Real, F>(&self, mut f: F, x0: &[T]) -> Result<Vec<T>, SolveError<T>>
    where
        F: FnMut(&[T]) -> Vec<T>,
    {
        let n = x0.len();
        if n == 0 {
            return Err(SolveError::InvalidArgument(
                "The initial guess is empty".to_owned(),
            ));
        }

        let mut x = Vector::new(x0.to_vec());
        let mut fx = Vector::new(check_len(f(x0), n)?);
        let mut norm = fx.norm();

        let mut jacobian = self.approximate_jacobian(&mut f, x0, fx.as_slice())?;

        for iteration in 0..self.settings.max_iterations {
            let lu = jacobian
                .lu()
                .map_err(|e| SolveError::from_matrix_error(e, iteration))?;

            if lu.is_singular() {
                debug!("Singular Jacobian in iteration {}", iteration);
                return Err(SolveError::ZeroDeterminant { iteration });
            }

            let mut step = -Vector::new(
                lu.solve(fx.as_slice())
                    .map_err(|e| SolveError::from_matrix_error(e, iteration))?,
            );

            let mut x_new = &x + &step;
            let mut f_new = Vector::new(check_len(f(x_new.as_slice()), n)?);
            let mut norm_new = f_new.norm();

            if norm_new > norm {
                let n2 = norm * norm;
                let mut damping = n2 / (n2 + norm_new * norm_new);
                if damping == 0. {
                    damping = MIN_DAMPING;
                }

                trace!("Damping the step by {} in iteration {}", damping, iteration);

                step = step.mul_scalar(&T::new_from_f64(damping));
                x_new = &x + &step;
                f_new = Vector::new(check_len(f(x_new.as_slice()), n)?);
                norm_new = f_new.norm();
            }

            if norm_new < self.settings.accuracy {
                debug!("Broyden converged after {} iterations", iteration + 1);
                return Ok(x_new.into_vec());
            }

            // J += (dF - J * s) (x) s / |s|^2
            let step_norm = step.norm();
            if step_norm > 0. {
                let predicted = Vector::new(
                    jacobian
                        .mul_vec(step.as_slice())
                        .map_err(|e| SolveError::from_matrix_error(e, iteration))?,
                );
                let residual = &(&f_new - &fx) - &predicted;
                let s = T::new_from_f64(step_norm);
                let scaled = step.div_scalar(&s).div_scalar(&s);
                jacobian += &residual.outer(&scaled);
            }

            x = x_new;
            fx = f_new;
            norm = norm_new;
        }

        debug!(
            "Broyden did not converge within {} iterations, residual norm {}",
            self.settings.max_iterations, norm
        );

        Err(SolveError::NonConvergence {
            iterations: self.settings.max_iterations,
        })
    }

    /// Find a root of `f` starting from `x0`, yielding `None` if the solver fails for any reason.
    pub fn try_find_root<T: Real, F>(&self, f: F, x0: &[T]) -> Option<Vec<T>>
    where
        F: FnMut(&[T]) -> Vec<T>,
    {
        self.find_root(f, x0).ok()
    }

    /// Approximate the Jacobian of `f` at `x0` with forward differences, where `y0 = f(x0)`.
    fn approximate_jacobian<T: Real, F>(
        &self,
        f: &mut F,
        x0: &[T],
        y0: &[T],
    ) -> Result<Matrix<T>, SolveError<T>>
    where
        F: FnMut(&[T]) -> Vec<T>,
    {
        let n = x0.len();
        let rel_step = T::new_from_f64(self.settings.jacobian_step);

        let mut jacobian = Matrix::new(n as u32, n as u32);
        let mut x = x0.to_vec();

        for col in 0..n {
            let xi = x0[col];
            let h = (xi.abs() + xi.one()) * rel_step;
            x[col] = xi + h;
            // the step that is representable
            let h = x[col] - xi;

            let y = check_len(f(&x), n)?;
            x[col] = xi;

            for (row, (a, b)) in y.iter().zip(y0).enumerate() {
                jacobian[(row as u32, col as u32)] = (*a - *b) / h;
            }
        }

        Ok(jacobian)
    }
}
