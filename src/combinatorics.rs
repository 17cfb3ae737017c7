//! Binomial coefficients and Bernstein basis polynomials.
//!
//! Binomial coefficients are read from a memoized Pascal's triangle that only
//! grows. The table is a cache: dropping it and starting over yields identical
//! values.
//!
//! ```rust
//! use rootfind::combinatorics::BinomialTable;
//!
//! let table = BinomialTable::new();
//! assert_eq!(table.get(5, 2), 10);
//! assert_eq!(table.row(4), vec![1, 4, 6, 4, 1]);
//! assert_eq!(table.len(), 6);
//! ```
use std::sync::Mutex;

use append_only_vec::AppendOnlyVec;
use tracing::trace;

use crate::domains::float::Real;

/// The process-wide table used when no table is passed explicitly.
static BINOMIALS: BinomialTable = BinomialTable::new();

/// An append-only, memoized Pascal's triangle.
///
/// Rows that are published are never modified, so they can be read without locking.
/// Extending the table is serialized, so that rows are appended exactly once and in order.
///
/// Entries saturate at [u128::MAX], which first happens in row 132.
pub struct BinomialTable {
    rows: AppendOnlyVec<Box<[u128]>>,
    grow: Mutex<()>,
}

impl Default for BinomialTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BinomialTable {
    /// Create an empty table.
    pub const fn new() -> BinomialTable {
        BinomialTable {
            rows: AppendOnlyVec::new(),
            grow: Mutex::new(()),
        }
    }

    /// Get the table that is shared by the whole process.
    pub fn global() -> &'static BinomialTable {
        &BINOMIALS
    }

    /// The number of rows that have been computed so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.len() == 0
    }

    /// Compute `n` choose `k`. Yields 0 if `k > n`.
    pub fn get(&self, n: usize, k: usize) -> u128 {
        if k > n {
            return 0;
        }

        self.extend_to(n);
        self.rows[n][k]
    }

    /// Get row `n` of Pascal's triangle.
    pub fn row(&self, n: usize) -> Vec<u128> {
        self.extend_to(n);
        self.rows[n].to_vec()
    }

    fn extend_to(&self, n: usize) {
        if n < self.rows.len() {
            return;
        }

        // a poisoned lock cannot leave a partial row behind, as rows are pushed whole
        let _guard = self.grow.lock().unwrap_or_else(|e| e.into_inner());

        while self.rows.len() <= n {
            let s = self.rows.len();
            let mut next_row = vec![1u128; s + 1];

            if s > 1 {
                let prev = &self.rows[s - 1];
                for i in 1..s {
                    next_row[i] = prev[i - 1].saturating_add(prev[i]);
                }
            }

            self.rows.push(next_row.into_boxed_slice());
        }

        trace!("Binomial table extended to {} rows", self.rows.len());
    }
}

/// Evaluate the `k`th Bernstein basis polynomial of degree `n` at `t`, without
/// the binomial prefactor: `(1-t)^(n-k) * t^k`.
pub fn bernstein_basis<T: Real>(n: usize, k: usize, t: T) -> T {
    let one = t.one();
    let mut r = one;
    for _ in k..n {
        r *= one - t;
    }
    for _ in 0..k {
        r *= t;
    }
    r
}

/// Evaluate the Bernstein polynomial with control points `weights` at `t`,
/// using the binomials in `table`.
pub fn bernstein_evaluate<T: Real>(table: &BinomialTable, weights: &[T], t: T) -> T {
    let Some(n) = weights.len().checked_sub(1) else {
        return t.zero();
    };

    let mut res = t.zero();
    for (k, w) in weights.iter().enumerate() {
        let c = t.from_f64(table.get(n, k) as f64);
        res += c * bernstein_basis(n, k, t) * w;
    }
    res
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pascal() {
        let table = BinomialTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get(0, 0), 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1, 1), 1);
        assert_eq!(table.get(6, 3), 20);
        assert_eq!(table.get(3, 4), 0);
        assert_eq!(table.len(), 7);

        // the table does not shrink or recompute
        assert_eq!(table.get(2, 1), 2);
        assert_eq!(table.len(), 7);

        for n in 0..40 {
            let row = table.row(n);
            assert_eq!(row.len(), n + 1);
            for k in 0..=n {
                assert_eq!(row[k], row[n - k]);
            }
            assert_eq!(row.iter().sum::<u128>(), 1u128 << n);
        }
    }

    #[test]
    fn large_rows() {
        let table = BinomialTable::new();
        assert_eq!(table.get(100, 1), 100);
        assert_eq!(table.get(60, 30), 118264581564861424);
        assert_eq!(table.get(200, 100), u128::MAX);
    }

    #[test]
    fn shared_between_threads() {
        let rows: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| s.spawn(move || BinomialTable::global().row(20 + i)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, r) in rows.iter().enumerate() {
            assert_eq!(r.len(), 21 + i);
            assert_eq!(r[1], 20 + i as u128);
        }
        assert!(BinomialTable::global().len() >= 24);
    }

    #[test]
    fn bernstein() {
        let table = BinomialTable::new();
        assert_eq!(bernstein_basis(3, 1, 0.5), 0.125);
        assert_eq!(bernstein_basis(2, 0, 0.), 1.);

        // partition of unity
        let w = [1., 1., 1., 1.];
        for t in [0., 0.2, 0.5, 0.9] {
            assert!((bernstein_evaluate(&table, &w, t) - 1.).abs() < 1e-15);
        }

        assert_eq!(bernstein_evaluate(&table, &[0., 1.], 0.25), 0.25);
        assert_eq!(bernstein_evaluate::<f64>(&table, &[], 0.25), 0.);
    }
}
