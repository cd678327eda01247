//! Missing-value imputation for low-abundance measurements.
//!
//! A zero in a quality-filtered table means "below the detection limit", not "absent".
//! Zeros are replaced with draws from a uniform distribution spanning one standard
//! deviation either side of the mean of the observed low-abundance values.

use log::debug;
use ndarray::{Array1, ArrayView2};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::data::ComparisonTable;

/// Mean and population standard deviation of the observed low-abundance values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowAbundance {
    pub mean: f64,
    pub std: f64,
}

impl LowAbundance {
    /// Estimate from every value of a table.
    ///
    /// Values strictly below `cutoff` are the low-abundance pool. When that pool sums to
    /// zero (only zeros, or nothing at all) the estimate degenerates to `mean = std = 0`.
    /// Otherwise the strictly positive part of the pool gives the mean and standard
    /// deviation.
    pub fn estimate(values: ArrayView2<'_, f64>, cutoff: f64) -> Self {
        let pool: Vec<f64> = values.iter().copied().filter(|&v| v < cutoff).collect();

        if pool.iter().sum::<f64>() == 0.0 {
            return LowAbundance::degenerate();
        }

        let positive: Array1<f64> = pool.into_iter().filter(|&v| v > 0.0).collect();
        match positive.mean() {
            Some(mean) => LowAbundance {
                mean,
                std: positive.std(0.0),
            },
            // Only negative values below the cutoff
            None => LowAbundance::degenerate(),
        }
    }

    pub fn degenerate() -> Self {
        LowAbundance {
            mean: 0.0,
            std: 0.0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.mean == 0.0 && self.std == 0.0
    }

    /// Uniform distribution over `[mean - std, mean + std]`.
    pub fn sampler(&self) -> Uniform<f64> {
        Uniform::new_inclusive(self.mean - self.std, self.mean + self.std)
    }
}

/// Replace every zero in `table` with an independent draw from `dist` and mark the
/// affected features as imputed. Returns the number of cells replaced.
pub fn impute<R: Rng + ?Sized>(
    table: &mut ComparisonTable,
    dist: &LowAbundance,
    rng: &mut R,
) -> usize {
    let sampler = dist.sampler();
    let mut replaced = 0;

    for ((row, _), value) in table.values.indexed_iter_mut() {
        if *value == 0.0 {
            *value = sampler.sample(rng);
            table.features[row].imputed = true;
            replaced += 1;
        }
    }

    debug!(
        "{} vs {}: imputed {replaced} cells from U({:.4} ± {:.4})",
        table.denominator, table.numerator, dist.mean, dist.std
    );
    replaced
}
