//! Defines the scalar types the solvers operate on.
//!
//! Every numerical routine in this crate is generic over the traits in [float]:
//! - [NumericalFloatLike](float::NumericalFloatLike) provides field arithmetic and a magnitude,
//!   which is all that the linear algebra and the Newton solver need.
//! - [SingleFloat](float::SingleFloat) adds exact tests for zero and one.
//! - [Real](float::Real) is implemented for `f32` and `f64` and adds ordering and
//!   elementary functions.
//!
//! Complex numbers are represented by [Complex](float::Complex), which is generic over its real type.
pub mod float;
