use anyhow::Result;
use log::debug;
use ndarray::Array2;

use super::model::{ComparisonTable, Dataset};
use crate::config::AnalysisConfig;

/// Values a row needs above the detection threshold in quantitative mode.
pub const MIN_DETECTED: usize = 3;

// ---------------------------------------------------------------------------
// Outlier rejection – extension point
// ---------------------------------------------------------------------------

/// Hook for rejecting outlier rows after the quality checks.
///
/// `values` is the row's denominator replicates followed by its numerator replicates.
pub trait OutlierPolicy {
    fn is_outlier(&self, values: &[f64]) -> bool;
}

/// Rejects nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl OutlierPolicy for KeepAll {
    fn is_outlier(&self, _values: &[f64]) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Quality filter
// ---------------------------------------------------------------------------

/// Row-level quality check.
///
/// A row fails when its values sum to zero or, in quantitative mode, when fewer than
/// [`MIN_DETECTED`] values are strictly above `threshold`.
pub fn passes_quality(values: &[f64], quantitative: bool, threshold: f64) -> bool {
    if values.iter().sum::<f64>() == 0.0 {
        return false;
    }
    if quantitative {
        let detected = values.iter().filter(|&&v| v > threshold).count();
        if detected < MIN_DETECTED {
            return false;
        }
    }
    true
}

/// Gather the denominator and numerator columns of every row that passes the quality
/// check into a [`ComparisonTable`]. Rows that fail are left out entirely.
pub fn quality_filter<P: OutlierPolicy>(
    dataset: &Dataset,
    denominator: (&str, &[usize]),
    numerator: (&str, &[usize]),
    config: &AnalysisConfig,
    policy: &P,
) -> Result<ComparisonTable> {
    let (den_name, den_cols) = denominator;
    let (num_name, num_cols) = numerator;
    let width = den_cols.len() + num_cols.len();

    let mut features = Vec::new();
    let mut flat = Vec::with_capacity(dataset.n_features() * width);
    let mut row_values = Vec::with_capacity(width);

    for row in &dataset.rows {
        row_values.clear();
        row_values.extend(den_cols.iter().chain(num_cols).map(|&c| row.value_at(c)));

        if !passes_quality(&row_values, config.quantitative, config.quantitative_threshold) {
            continue;
        }
        if policy.is_outlier(&row_values) {
            continue;
        }

        features.push(row.feature.clone());
        flat.extend_from_slice(&row_values);
    }

    debug!(
        "{den_name} vs {num_name}: kept {} of {} rows",
        features.len(),
        dataset.n_features()
    );

    let mut headers = vec![
        dataset.header(0).to_string(),
        dataset.header(1).to_string(),
    ];
    headers.extend(
        den_cols
            .iter()
            .chain(num_cols)
            .map(|&c| dataset.header(c).to_string()),
    );

    let values = Array2::from_shape_vec((features.len(), width), flat)?;

    Ok(ComparisonTable {
        denominator: den_name.to_string(),
        numerator: num_name.to_string(),
        headers,
        features,
        values,
    })
}
