use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    domains::float::{Complex, Real},
    utils::{almost_zero, almost_zero_delta, DEFAULT_EPSILON, DEFAULT_EPSILON_F32},
};

use super::polynomial::Polynomial;

/// Settings for the simultaneous root finder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootSettings {
    /// The relative tolerance on the update of the guesses.
    pub epsilon: f64,
    /// The maximal number of simultaneous updates.
    pub max_iterations: usize,
}

impl Default for RootSettings {
    fn default() -> Self {
        RootSettings {
            epsilon: DEFAULT_EPSILON,
            max_iterations: 25,
        }
    }
}

impl RootSettings {
    /// Settings suited for single-precision polynomials.
    pub fn single_precision() -> Self {
        RootSettings {
            epsilon: DEFAULT_EPSILON_F32 as f64,
            ..Default::default()
        }
    }
}

impl<T: Real> Polynomial<T> {
    /// Find all complex roots with the default settings. See [Polynomial::roots_with].
    pub fn roots(&self) -> Vec<Complex<T>> {
        self.roots_with(&RootSettings::default())
    }

    /// Find all complex roots simultaneously using the Durand-Kerner method.
    ///
    /// Leading coefficients that are almost zero are ignored, so that the number of
    /// roots is the effective degree. The initial guesses are the powers of `0.4 + 0.9i`.
    /// If the guesses have not settled after `max_iterations` updates, the last guesses
    /// are returned.
    ///
    /// ```rust
    /// use rootfind::poly::Polynomial;
    ///
    /// let p = Polynomial::from_real(&[1f64, -3., 2.]);
    /// let mut r = p.real_roots();
    /// r.sort_by(|a, b| a.partial_cmp(b).unwrap());
    /// assert!((r[0] - 1.).abs() < 1e-8 && (r[1] - 2.).abs() < 1e-8);
    /// ```
    #[instrument(level = "debug", skip_all)]
    pub fn roots_with(&self, settings: &RootSettings) -> Vec<Complex<T>> {
        let p = self.trim_leading_zeros(settings.epsilon);
        let n = p.order();
        if n == 0 {
            return vec![];
        }

        let monic = p.monic();

        let one = monic.lcoeff().one();
        let seed = Complex::new(one.re.from_f64(0.4), one.re.from_f64(0.9));

        let mut guesses = Vec::with_capacity(n);
        guesses.push(one);
        for i in 1..n {
            guesses.push(guesses[i - 1] * seed);
        }

        let mut next = guesses.clone();
        let mut delta = vec![one.zero(); n];

        let mut iterations = 0;
        loop {
            for i in 0..n {
                let mut denom = one;
                for j in 0..n {
                    if i != j {
                        denom = (guesses[i] - guesses[j]) * denom;
                    }
                }

                next[i] = guesses[i] - monic.evaluate(&guesses[i]) / denom;
                delta[i] = guesses[i] - next[i];
            }

            iterations += 1;

            if almost_zero_delta(&delta, settings.epsilon) {
                debug!("Roots converged after {} iterations", iterations);
                break;
            }

            if iterations >= settings.max_iterations {
                debug!(
                    "Roots did not converge within {} iterations; returning the last guesses",
                    iterations
                );
                break;
            }

            std::mem::swap(&mut guesses, &mut next);
        }

        next
    }

    /// Find the real roots with the default settings. See [Polynomial::real_roots_with].
    pub fn real_roots(&self) -> Vec<T> {
        self.real_roots_with(&RootSettings::default())
    }

    /// Find the roots whose imaginary part is zero within the tolerance of `settings`,
    /// and return their real parts.
    pub fn real_roots_with(&self, settings: &RootSettings) -> Vec<T> {
        self.roots_with(settings)
            .into_iter()
            .filter(|r| almost_zero(&r.im, settings.epsilon))
            .map(|r| r.re)
            .collect()
    }
}
