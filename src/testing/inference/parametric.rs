//! Parametric two-sample tests for replicate measurements.
//!
//! Replicate groups in a proteomics run are tiny (three or so values per condition), so the
//! tests here work on plain slices and compute everything from sums and sums of squares.

use crate::testing::{TTestType, TestResult};
use num_traits::Float;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Perform a t-test comparing two samples.
///
/// This function performs either Student's t-test (assuming equal variances) or
/// Welch's t-test (allowing unequal variances) on two samples. The statistic is
/// oriented as `mean(x) - mean(y)`.
///
/// # Arguments
///
/// * `x` - First sample (the numerator condition in a fold-change comparison)
/// * `y` - Second sample (the denominator condition)
/// * `test_type` - Type of t-test to perform
///
/// # Returns
///
/// `TestResult` containing the t-statistic and two-sided p-value. Samples with fewer
/// than two values cannot be tested and yield `t = 0, p = 1`.
pub fn t_test<T>(x: &[T], y: &[T], test_type: TTestType) -> TestResult<f64>
where
    T: Float,
{
    if x.len() < 2 || y.len() < 2 {
        return TestResult::new(0.0, 1.0);
    }

    let (sum_x, sum_sq_x) = sums(x);
    let (sum_y, sum_sq_y) = sums(y);

    t_test_from_sums(
        sum_x,
        sum_sq_x,
        x.len() as f64,
        sum_y,
        sum_sq_y,
        y.len() as f64,
        test_type,
    )
}

#[inline]
fn sums<T: Float>(values: &[T]) -> (f64, f64) {
    values.iter().fold((0.0, 0.0), |(sum, sum_sq), &v| {
        let v = v.to_f64().unwrap_or(f64::NAN);
        (sum + v, sum_sq + v * v)
    })
}

/// Perform a t-test using precomputed summary statistics.
///
/// # Arguments
///
/// * `sum1`, `sum_sq1`, `n1` - Sum, sum of squares, and count for group 1
/// * `sum2`, `sum_sq2`, `n2` - Sum, sum of squares, and count for group 2
/// * `test_type` - Type of t-test to perform (Student's or Welch's)
pub fn t_test_from_sums(
    sum1: f64,
    sum_sq1: f64,
    n1: f64,
    sum2: f64,
    sum_sq2: f64,
    n2: f64,
    test_type: TTestType,
) -> TestResult<f64> {
    if n1 < 2.0 || n2 < 2.0 {
        return TestResult::new(0.0, 1.0);
    }

    let mean1 = sum1 / n1;
    let mean2 = sum2 / n2;

    // Rounding in the computational formula can dip just below zero.
    let var1 = ((sum_sq1 - sum1 * sum1 / n1) / (n1 - 1.0)).max(0.0);
    let var2 = ((sum_sq2 - sum2 * sum2 / n2) / (n2 - 1.0)).max(0.0);

    let mean_diff = mean1 - mean2;

    let (t_stat, df, std_err) = match test_type {
        TTestType::Student => {
            let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
            let std_err = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
            (mean_diff / std_err, n1 + n2 - 2.0, std_err)
        }
        TTestType::Welch => {
            let term1 = var1 / n1;
            let term2 = var2 / n2;
            let combined_var = term1 + term2;
            let std_err = combined_var.sqrt();

            // Welch-Satterthwaite
            let df = combined_var * combined_var
                / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
            (mean_diff / std_err, df, std_err)
        }
    };

    let p_value = two_sided_p_value(t_stat, df);
    TestResult::new(t_stat, p_value)
        .with_degrees_of_freedom(df)
        .with_standard_error(std_err)
}

/// Two-sided tail probability of Student's t distribution.
///
/// Zero variance in both groups gives `t = ±inf` when the means differ (p = 0) and
/// `t = NaN` when they are identical (p = 1).
#[inline]
fn two_sided_p_value(t_stat: f64, df: f64) -> f64 {
    if t_stat.is_nan() {
        return 1.0;
    }
    if t_stat.is_infinite() {
        return 0.0;
    }
    if df <= 0.0 || !df.is_finite() {
        return 1.0;
    }

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * t_dist.sf(t_stat.abs())).min(1.0),
        Err(_) => 1.0,
    }
}
