//! Run configuration, built once at program entry and passed down explicitly.

use std::path::{Path, PathBuf};

/// Knobs for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Replicate columns each condition must match
    pub trial_number: usize,
    /// Require [`MIN_DETECTED`](crate::data::filter::MIN_DETECTED) values above the threshold
    pub quantitative: bool,
    /// Detection threshold; also the upper bound of the imputation sample in quantitative mode
    pub quantitative_threshold: f64,
    /// Minimum |L2FC| for an UP/DOWN call
    pub fold_change_threshold: f64,
    /// Seed for imputation draws; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            trial_number: 3,
            quantitative: true,
            quantitative_threshold: 5.0,
            fold_change_threshold: 0.5,
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Values below this feed the low-abundance distribution used for imputation.
    pub fn imputation_cutoff(&self) -> f64 {
        if self.quantitative {
            self.quantitative_threshold
        } else {
            1.0
        }
    }
}

/// Where sheets are read from and where results land.
#[derive(Debug, Clone, PartialEq)]
pub struct IoPaths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl IoPaths {
    pub fn new(input_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        IoPaths {
            input_dir: expand_tilde(input_dir.as_ref()),
            output_dir: expand_tilde(output_dir.as_ref()),
        }
    }

    pub fn figures_dir(&self) -> PathBuf {
        self.output_dir.join("figures")
    }
}

/// Expand a leading `~` to `$HOME`. Paths without one, or without a usable `$HOME`,
/// come back unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// `QUANTITATIVE` semantics: only the literal `false` (any case) switches it off.
pub fn parse_quantitative(value: &str) -> Result<bool, String> {
    Ok(!value.trim().eq_ignore_ascii_case("false"))
}
