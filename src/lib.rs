//! Rootfind is a numerical toolkit for finding roots.
//!
//! It can find all complex roots of univariate polynomials with complex coefficients,
//! solve linear, quadratic and cubic equations in closed form, and
//! solve systems of nonlinear equations with Newton's or Broyden's method.
//!
//! For example:
//!
//! ```
//! use rootfind::{poly::Polynomial, solve::broyden::Broyden};
//!
//! let p = Polynomial::from_real(&[1., 0., -2.]);
//! println!("The roots of {} are {:?}", p, p.roots());
//!
//! let root = Broyden::default()
//!     .find_root(|x: &[f64]| vec![x[0] * x[0] - 2.], &[1.])
//!     .unwrap();
//! assert!((root[0] - 2f64.sqrt()).abs() < 1e-8);
//! ```

pub mod combinatorics;
pub mod domains;
pub mod poly;
pub mod solve;
pub mod tensors;
pub mod utils;
