//! Per-feature fold change, significance, and regulation calls for one comparison.

use std::fmt;

use anyhow::Result;
use log::debug;

use crate::data::ComparisonTable;
use crate::testing::effect::log2_fold_change;
use crate::testing::inference::parametric::t_test;
use crate::testing::{SIGNIFICANCE_THRESHOLD, TTestType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regulation {
    Up,
    Down,
    Unchanged,
}

impl Regulation {
    /// Tag written to the results workbook. Unchanged features get an empty cell.
    pub fn tag(&self) -> &'static str {
        match self {
            Regulation::Up => "UP",
            Regulation::Down => "DOWN",
            Regulation::Unchanged => "",
        }
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Call a feature up- or down-regulated.
///
/// Both the fold change and `-log10(p)` must clear their thresholds strictly; the
/// significance threshold is fixed at `-log10(0.05)`.
pub fn classify(l2fc: f64, neg_log10_p: f64, fold_change_threshold: f64) -> Regulation {
    let significant = neg_log10_p > SIGNIFICANCE_THRESHOLD;
    if significant && l2fc > fold_change_threshold {
        Regulation::Up
    } else if significant && l2fc < -fold_change_threshold {
        Regulation::Down
    } else {
        Regulation::Unchanged
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureMetrics {
    pub l2fc: f64,
    pub p_value: f64,
    pub neg_log10_p: f64,
    pub regulation: Regulation,
}

/// A quality-filtered, imputed table together with its per-row metrics.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub table: ComparisonTable,
    pub metrics: Vec<FeatureMetrics>,
}

impl Comparison {
    pub fn title(&self) -> String {
        format!("{} vs {}", self.table.denominator, self.table.numerator)
    }

    pub fn count(&self, regulation: Regulation) -> usize {
        self.metrics
            .iter()
            .filter(|m| m.regulation == regulation)
            .count()
    }

    /// `(l2fc, -log10 p)` points of one regulation group, in row order.
    pub fn points(&self, regulation: Regulation) -> Vec<(f64, f64)> {
        self.metrics
            .iter()
            .filter(|m| m.regulation == regulation)
            .map(|m| (m.l2fc, m.neg_log10_p))
            .collect()
    }
}

/// Compute fold change and Welch t-test significance for every row of `table`.
///
/// The fold change is numerator over denominator; the t-test compares the numerator
/// replicates against the denominator replicates with unequal variances.
pub fn compute_metrics(table: ComparisonTable, fold_change_threshold: f64) -> Result<Comparison> {
    let mut metrics = Vec::with_capacity(table.n_features());

    for row in 0..table.n_features() {
        let num = table.numerator_values(row).to_vec();
        let den = table.denominator_values(row).to_vec();

        let l2fc = log2_fold_change(&num, &den)?;
        let test = t_test(&num, &den, TTestType::Welch);
        let neg_log10_p = test.neg_log10_p();

        metrics.push(FeatureMetrics {
            l2fc,
            p_value: test.p_value,
            neg_log10_p,
            regulation: classify(l2fc, neg_log10_p, fold_change_threshold),
        });
    }

    let comparison = Comparison { table, metrics };
    debug!(
        "{}: {} up, {} down, {} unchanged",
        comparison.title(),
        comparison.count(Regulation::Up),
        comparison.count(Regulation::Down),
        comparison.count(Regulation::Unchanged)
    );
    Ok(comparison)
}
