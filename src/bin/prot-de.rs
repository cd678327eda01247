//! prot-de - differential expression CLI
//!
//! `prot-de <sheets> <denominator> <numerators>` with comma-separated sheet and numerator
//! lists. Tuning knobs come from the environment, a `.env` file in the working directory,
//! or the matching long flags.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use log::{info, warn};
use prot_de::config::{AnalysisConfig, IoPaths, parse_quantitative};
use prot_de::pipeline;
use prot_de::report::PngRenderer;

/// Differential expression of replicate proteomics spreadsheets
#[derive(Parser, Debug)]
#[command(name = "prot-de")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workbook file names inside START_PATH, comma separated
    sheets: String,

    /// Denominator (baseline) condition
    denominator: String,

    /// Numerator conditions, comma separated; one result tab each
    numerators: String,

    /// Directory the workbooks are read from
    #[arg(long, env = "START_PATH", default_value = ".")]
    start_path: PathBuf,

    /// Directory results and figures/ are written to
    #[arg(long, env = "END_PATH", default_value = ".")]
    end_path: PathBuf,

    /// Require three measurements above the threshold ("false" disables)
    #[arg(
        long,
        env = "QUANTITATIVE",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_quantitative
    )]
    quantitative: bool,

    /// Detection threshold for quantitative mode
    #[arg(long, env = "QUANTITATIVE_THRESHOLD", default_value_t = 5.0)]
    quantitative_threshold: f64,

    /// Replicate columns expected per condition
    #[arg(long, env = "TRIAL_NUMBER", default_value_t = 3)]
    trial_number: usize,

    /// Minimum |log2 fold change| for an UP/DOWN call
    #[arg(long, env = "FOLD_CHANGE_THRESHOLD", default_value_t = 0.5)]
    fold_change_threshold: f64,

    /// Seed for imputation; unseeded runs differ in imputed values
    #[arg(long, env = "IMPUTATION_SEED")]
    seed: Option<u64>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Cli {
    fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            trial_number: self.trial_number,
            quantitative: self.quantitative,
            quantitative_threshold: self.quantitative_threshold,
            fold_change_threshold: self.fold_change_threshold,
            seed: self.seed,
        }
    }
}

/// Load `KEY=value` settings from `path`, or from a `.env` found from the working directory
/// upwards. Variables already set in the environment win.
fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv(None);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let cli = Cli::parse();
    let config = cli.analysis_config();
    let paths = IoPaths::new(&cli.start_path, &cli.end_path);
    let sheets = split_list(&cli.sheets);
    let numerators = split_list(&cli.numerators);

    if numerators.is_empty() {
        anyhow::bail!("no numerator conditions given");
    }

    if let Some(path) = &dotenv {
        info!("Loaded settings from {}", path.display());
    }
    info!(
        "{} sheet(s), {} vs {:?}, {:?}",
        sheets.len(),
        cli.denominator,
        numerators,
        config
    );

    let mut renderer = PngRenderer::default();
    let reports = pipeline::run(
        &sheets,
        &cli.denominator,
        &numerators,
        &config,
        &paths,
        &mut renderer,
    );

    for report in &reports {
        for reason in &report.skipped {
            warn!("{}: skipped, {reason}", report.sheet);
        }
        if report.workbook.is_none() {
            warn!("{}: nothing written", report.sheet);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a.xlsx,b.xlsx"), vec!["a.xlsx", "b.xlsx"]);
        assert_eq!(split_list("Treat, ,KO"), vec!["Treat", "KO"]);
    }

    #[test]
    fn test_quantitative_flag_parses_false() {
        let cli = Cli::try_parse_from([
            "prot-de",
            "run.xlsx",
            "Ctrl",
            "Treat",
            "--quantitative",
            "false",
            "--trial-number",
            "4",
        ])
        .unwrap();
        let config = cli.analysis_config();
        assert!(!config.quantitative);
        assert_eq!(config.trial_number, 4);
    }

    #[test]
    fn test_dotenv_fills_unset_variables() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join(".env");
        std::fs::write(&file, "PROT_DE_DOTENV_CHECK=17\n").unwrap();

        assert_eq!(load_dotenv(Some(&file)), Some(file.clone()));
        assert_eq!(std::env::var("PROT_DE_DOTENV_CHECK").unwrap(), "17");
        assert_eq!(load_dotenv(Some(&dir.path().join("missing.env"))), None);
    }
}
