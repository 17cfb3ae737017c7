//! Iterative solvers for systems of nonlinear equations `F(x) = 0`.
//!
//! [newton::Newton] requires the Jacobian of the system and works for real and complex
//! scalars. [broyden::Broyden] approximates the Jacobian with finite differences and
//! keeps it up to date with rank-one updates.

use std::fmt::Display;

use crate::tensors::matrix::MatrixError;

pub mod broyden;
pub mod newton;

/// Errors that can occur while solving a nonlinear system.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError<T> {
    /// The Jacobian was singular in the zero-based iteration `iteration`.
    ZeroDeterminant { iteration: usize },
    /// The solver did not converge within `iterations` iterations.
    /// The last iterate is kept in `solution`.
    MaxIterationsExceeded { iterations: usize, solution: Vec<T> },
    /// The solver did not reach the requested accuracy within `iterations` iterations.
    NonConvergence { iterations: usize },
    InvalidArgument(String),
}

impl<T> SolveError<T> {
    /// Get the best solution found before the solver gave up, if any.
    pub fn partial_solution(&self) -> Option<&[T]> {
        match self {
            SolveError::MaxIterationsExceeded { solution, .. } => Some(solution),
            _ => None,
        }
    }

    /// Map a failure of a linear solve in iteration `iteration`.
    pub(crate) fn from_matrix_error(e: MatrixError, iteration: usize) -> Self {
        match e {
            MatrixError::Singular => SolveError::ZeroDeterminant { iteration },
            e => SolveError::InvalidArgument(e.to_string()),
        }
    }
}

impl<T> Display for SolveError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::ZeroDeterminant { iteration } => {
                write!(f, "The Jacobian is singular in iteration {}", iteration)
            }
            SolveError::MaxIterationsExceeded { iterations, .. } => {
                write!(f, "No convergence after the maximum of {} iterations", iterations)
            }
            SolveError::NonConvergence { iterations } => {
                write!(f, "The root was not found within {} iterations", iterations)
            }
            SolveError::InvalidArgument(s) => write!(f, "Invalid argument: {}", s),
        }
    }
}

impl<T: std::fmt::Debug> std::error::Error for SolveError<T> {}

/// Check that a function evaluation has `expected` entries.
pub(crate) fn check_len<T>(values: Vec<T>, expected: usize) -> Result<Vec<T>, SolveError<T>> {
    if values.len() != expected {
        return Err(SolveError::InvalidArgument(format!(
            "The function returned {} values for {} unknowns",
            values.len(),
            expected
        )));
    }

    Ok(values)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let e = SolveError::MaxIterationsExceeded {
            iterations: 25,
            solution: vec![1.5],
        };
        assert_eq!(e.to_string(), "No convergence after the maximum of 25 iterations");
        assert_eq!(e.partial_solution(), Some(&[1.5][..]));

        let e = SolveError::<f64>::from_matrix_error(MatrixError::Singular, 3);
        assert_eq!(e, SolveError::ZeroDeterminant { iteration: 3 });
        assert_eq!(e.partial_solution(), None);

        let e = SolveError::<f64>::from_matrix_error(MatrixError::ShapeMismatch, 0);
        assert!(matches!(e, SolveError::InvalidArgument(_)));
    }

    #[test]
    fn length_check() {
        assert_eq!(check_len(vec![1., 2.], 2), Ok(vec![1., 2.]));
        assert!(check_len(vec![1.], 2).is_err());
    }
}
