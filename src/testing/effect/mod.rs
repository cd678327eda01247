use num_traits::Float;

/// Calculate log2 fold change between two groups
///
/// `log2(mean(numerator) / mean(denominator))`. No pseudo count is added, so a zero
/// denominator mean gives `+inf` and a zero numerator mean gives `-inf`.
pub fn log2_fold_change<T>(
    numerator: &[T],   // Group of interest
    denominator: &[T], // Reference group
) -> anyhow::Result<f64>
where
    T: Float,
{
    if numerator.is_empty() || denominator.is_empty() {
        return Err(anyhow::anyhow!("Group values cannot be empty"));
    }

    let mean1 = mean(numerator);
    let mean2 = mean(denominator);

    Ok((mean1 / mean2).log2())
}

fn mean<T: Float>(values: &[T]) -> f64 {
    let sum: f64 = values.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).sum();
    sum / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_log2_fold_change() {
        // ~8 vs ~2
        let fc0 = log2_fold_change(&[8.0, 7.5, 8.5], &[2.0, 2.2, 1.8]).unwrap();
        assert_abs_diff_eq!(fc0, 2.0, epsilon = 1e-9);

        // No difference
        let fc1 = log2_fold_change(&[5.0, 5.1, 4.9], &[5.0, 5.1, 4.9]).unwrap();
        assert_abs_diff_eq!(fc1, 0.0, epsilon = 1e-12);

        // Moderate difference, ~5 vs ~3
        let fc2 = log2_fold_change(&[5.0, 4.7, 5.3], &[3.0, 3.3, 2.7]).unwrap();
        assert_abs_diff_eq!(fc2, 0.737, epsilon = 0.01);

        // Down regulation is negative
        let fc3 = log2_fold_change(&[2.0, 2.0, 2.0], &[8.0, 8.0, 8.0]).unwrap();
        assert_abs_diff_eq!(fc3, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_means() {
        let fc = log2_fold_change(&[10.0, 12.0, 11.0], &[0.0, 0.0, 0.0]).unwrap();
        assert!(fc.is_infinite() && fc > 0.0);

        let fc = log2_fold_change(&[0.0, 0.0, 0.0], &[10.0, 12.0, 11.0]).unwrap();
        assert!(fc.is_infinite() && fc < 0.0);
    }

    #[test]
    fn test_empty_groups() {
        assert!(log2_fold_change::<f64>(&[], &[3.0, 4.0, 5.0]).is_err());
        assert!(log2_fold_change(&[0.0, 1.0, 2.0], &[]).is_err());
    }

    #[test]
    fn test_f32_input() {
        let fc = log2_fold_change(&[4.0f32, 4.0, 4.0], &[1.0f32, 1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(fc, 2.0, epsilon = 1e-6);
    }
}
