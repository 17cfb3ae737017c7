//! Dense linear algebra over the scalars in [domains](crate::domains).

pub mod matrix;
