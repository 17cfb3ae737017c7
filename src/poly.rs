//! Univariate polynomials with complex coefficients and their roots.
//!
//! [Polynomial] supports the usual algebra, conversion from the Bernstein basis
//! and finds all roots simultaneously. Equations up to degree three can be solved
//! in closed form with the functions in [analytic].

pub mod analytic;
mod bernstein;
pub mod polynomial;
mod roots;

pub use polynomial::Polynomial;
pub use roots::RootSettings;
