//! Sheet-level orchestration: select → filter → impute → test → report.
//!
//! Each (sheet, denominator, numerator) triple runs as a straight line with no retries.
//! A replicate-count mismatch skips the affected unit and is recorded in the report;
//! an unreadable sheet is logged and the run moves on to the next one.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::{Comparison, compute_metrics};
use crate::config::{AnalysisConfig, IoPaths};
use crate::data::Dataset;
use crate::data::filter::{KeepAll, OutlierPolicy, quality_filter};
use crate::data::loader::load_workbook;
use crate::data::select::select_columns;
use crate::error::AnalysisError;
use crate::imputation::{LowAbundance, impute};
use crate::report::{
    FigureSink, VolcanoFigure, figure_file_name, is_valid_tab_name, tab_names_clash,
    workbook_file_name, write_workbook,
};

/// Comparisons that ran for one dataset, plus the ones that were skipped and why.
#[derive(Debug, Default)]
pub struct SheetAnalysis {
    pub comparisons: Vec<Comparison>,
    pub skipped: Vec<AnalysisError>,
}

/// What a sheet produced on disk.
#[derive(Debug, Default)]
pub struct SheetReport {
    pub sheet: String,
    pub workbook: Option<PathBuf>,
    pub figures: Vec<PathBuf>,
    pub skipped: Vec<AnalysisError>,
}

/// Run one comparison: quality filter, impute zeros, compute metrics.
pub fn compare<R, P>(
    dataset: &Dataset,
    denominator: (&str, &[usize]),
    numerator: (&str, &[usize]),
    config: &AnalysisConfig,
    policy: &P,
    rng: &mut R,
) -> Result<Comparison>
where
    R: Rng + ?Sized,
    P: OutlierPolicy,
{
    let mut table = quality_filter(dataset, denominator, numerator, config, policy)?;
    let dist = LowAbundance::estimate(table.values.view(), config.imputation_cutoff());
    impute(&mut table, &dist, rng);
    compute_metrics(table, config.fold_change_threshold)
}

/// Analyse every numerator of a dataset against the denominator.
///
/// If the denominator does not match the configured replicate count nothing runs. A
/// numerator that does not match is skipped on its own, as is one whose tab name is
/// unusable or clashes with an earlier tab. Repeated numerators run once.
pub fn analyze_dataset<R: Rng + ?Sized>(
    dataset: &Dataset,
    denominator: &str,
    numerators: &[String],
    config: &AnalysisConfig,
    rng: &mut R,
) -> Result<SheetAnalysis> {
    let mut analysis = SheetAnalysis::default();

    let den_cols = match select_columns(&dataset.headers, denominator, config.trial_number) {
        Ok(cols) => cols,
        Err(e) => {
            warn!("{e}");
            analysis.skipped.push(e);
            return Ok(analysis);
        }
    };

    let mut requested: Vec<&str> = Vec::with_capacity(numerators.len());
    for numerator in numerators {
        if requested.contains(&numerator.as_str()) {
            debug!("{numerator} requested more than once, analysing it once");
            continue;
        }
        requested.push(numerator);

        if !is_valid_tab_name(numerator) {
            let e = AnalysisError::InvalidTabName(numerator.clone());
            warn!("{e}");
            analysis.skipped.push(e);
            continue;
        }
        let clash = analysis
            .comparisons
            .iter()
            .map(|c| c.table.numerator.as_str())
            .find(|existing| tab_names_clash(existing, numerator));
        if let Some(existing) = clash {
            let e = AnalysisError::DuplicateTab {
                numerator: numerator.clone(),
                existing: existing.to_string(),
            };
            warn!("{e}");
            analysis.skipped.push(e);
            continue;
        }

        let num_cols = match select_columns(&dataset.headers, numerator, config.trial_number) {
            Ok(cols) => cols,
            Err(e) => {
                warn!("{e}");
                analysis.skipped.push(e);
                continue;
            }
        };

        let comparison = compare(
            dataset,
            (denominator, den_cols.as_slice()),
            (numerator, num_cols.as_slice()),
            config,
            &KeepAll,
            rng,
        )?;
        analysis.comparisons.push(comparison);
    }

    Ok(analysis)
}

/// Load one input sheet, analyse it, and write its figures and workbook.
pub fn run_sheet<F, R>(
    sheet: &str,
    denominator: &str,
    numerators: &[String],
    config: &AnalysisConfig,
    paths: &IoPaths,
    figures: &mut F,
    rng: &mut R,
) -> Result<SheetReport>
where
    F: FigureSink + ?Sized,
    R: Rng + ?Sized,
{
    let dataset = load_workbook(&paths.input_dir.join(sheet))?;
    let analysis = analyze_dataset(&dataset, denominator, numerators, config, rng)?;

    let mut report = SheetReport {
        sheet: sheet.to_string(),
        skipped: analysis.skipped,
        ..SheetReport::default()
    };

    if analysis.comparisons.is_empty() {
        return Ok(report);
    }

    let figures_dir = paths.figures_dir();
    fs::create_dir_all(&figures_dir)
        .with_context(|| format!("failed to create {}", figures_dir.display()))?;

    for comparison in &analysis.comparisons {
        let path = figures_dir.join(figure_file_name(
            sheet,
            &comparison.table.denominator,
            &comparison.table.numerator,
        ));
        figures.render(&path, &VolcanoFigure::from_comparison(comparison))?;
        info!("Wrote {}", path.display());
        report.figures.push(path);
    }

    // Named after the first requested numerator even when that one was skipped
    let first = numerators.first().map(String::as_str).unwrap_or_default();
    fs::create_dir_all(&paths.output_dir)
        .with_context(|| format!("failed to create {}", paths.output_dir.display()))?;
    let path = paths.output_dir.join(workbook_file_name(sheet, first));
    write_workbook(&path, &analysis.comparisons)?;
    info!("Wrote {}", path.display());
    report.workbook = Some(path);

    Ok(report)
}

/// Process every sheet in turn. Sheets that fail are logged and left out of the result.
pub fn run<F>(
    sheets: &[String],
    denominator: &str,
    numerators: &[String],
    config: &AnalysisConfig,
    paths: &IoPaths,
    figures: &mut F,
) -> Vec<SheetReport>
where
    F: FigureSink + ?Sized,
{
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut reports = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        match run_sheet(sheet, denominator, numerators, config, paths, figures, &mut rng) {
            Ok(report) => reports.push(report),
            Err(e) => error!("{sheet}: {e:#}"),
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FeatureRow;

    fn dataset() -> Dataset {
        let headers = [
            "id", "name", "Ctrl_1", "Ctrl_2", "Ctrl_3", "Treat_1", "Treat_2", "Treat_3", "Odd_1",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Dataset::new(
            headers,
            vec![
                FeatureRow::new("P1", "a", vec![10.0, 11.0, 12.0, 40.0, 42.0, 41.0, 1.0]),
                FeatureRow::new("P2", "b", vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
                FeatureRow::new("P3", "c", vec![0.0, 2.0, 3.0, 10.0, 12.0, 11.0, 1.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_denominator_mismatch_skips_everything() {
        let mut rng = StdRng::seed_from_u64(0);
        let analysis = analyze_dataset(
            &dataset(),
            "Odd",
            &["Treat".to_string()],
            &AnalysisConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert!(analysis.comparisons.is_empty());
        assert_eq!(analysis.skipped.len(), 1);
    }

    #[test]
    fn test_numerator_mismatch_skips_only_that_numerator() {
        let mut rng = StdRng::seed_from_u64(0);
        let analysis = analyze_dataset(
            &dataset(),
            "Ctrl",
            &["Odd".to_string(), "Treat".to_string()],
            &AnalysisConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(analysis.comparisons.len(), 1);
        assert_eq!(analysis.comparisons[0].table.numerator, "Treat");
        assert!(matches!(
            &analysis.skipped[0],
            AnalysisError::ReplicateCountMismatch { condition, found: 1, .. } if condition == "Odd"
        ));
    }

    #[test]
    fn test_compare_filters_and_imputes() {
        let mut rng = StdRng::seed_from_u64(5);
        let analysis = analyze_dataset(
            &dataset(),
            "Ctrl",
            &["Treat".to_string()],
            &AnalysisConfig::default(),
            &mut rng,
        )
        .unwrap();
        let cmp = &analysis.comparisons[0];
        let ids: Vec<_> = cmp.table.features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P3"]);
        assert_eq!(cmp.table.count_zeros(), 0);
        assert!(!cmp.table.features[0].imputed);
        assert!(cmp.table.features[1].imputed);
        assert_eq!(cmp.metrics.len(), 2);
    }

    #[test]
    fn test_repeated_numerator_runs_once() {
        let mut rng = StdRng::seed_from_u64(0);
        let analysis = analyze_dataset(
            &dataset(),
            "Ctrl",
            &["Treat".to_string(), "Treat".to_string()],
            &AnalysisConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(analysis.comparisons.len(), 1);
        assert!(analysis.skipped.is_empty());
    }

    #[test]
    fn test_case_clash_and_bad_tab_names_are_skipped() {
        let headers = [
            "id", "name", "Ctrl_1", "Ctrl_2", "Ctrl_3", "Treat_1", "Treat_2", "Treat_3", "treat_1",
            "treat_2", "treat_3", "a/b_1", "a/b_2", "a/b_3",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let values = vec![10.0, 11.0, 12.0, 40.0, 42.0, 41.0, 40.0, 42.0, 41.0, 40.0, 42.0, 41.0];
        let dataset = Dataset::new(headers, vec![FeatureRow::new("P1", "a", values)]).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let analysis = analyze_dataset(
            &dataset,
            "Ctrl",
            &["Treat".to_string(), "treat".to_string(), "a/b".to_string()],
            &AnalysisConfig::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(analysis.comparisons.len(), 1);
        assert_eq!(analysis.comparisons[0].table.numerator, "Treat");
        assert_eq!(
            analysis.skipped,
            vec![
                AnalysisError::DuplicateTab {
                    numerator: "treat".into(),
                    existing: "Treat".into()
                },
                AnalysisError::InvalidTabName("a/b".into()),
            ]
        );
    }
}
