//! # prot-de
//!
//! Differential expression analysis for replicate proteomics spreadsheets.
//!
//! For a denominator condition and one or more numerator conditions this crate matches
//! replicate columns by header prefix, drops rows without usable signal, imputes
//! below-detection values, and computes per-feature log2 fold change and Welch t-test
//! significance. Features are called up- or down-regulated, drawn on a volcano plot, and
//! written to an annotated results workbook.
//!
//! ## Module Organization
//!
//! - **[`data`]**: Sheet loading, condition column selection, quality filtering
//! - **[`imputation`]**: Low-abundance distribution and zero replacement
//! - **[`testing`]**: Welch/Student t-tests and fold change
//! - **[`analysis`]**: Per-feature metrics and regulation calls
//! - **[`report`]**: Volcano figures and results workbook
//! - **[`pipeline`]**: Sheet-level orchestration
//! - **[`config`]**: Run configuration

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod imputation;
pub mod pipeline;
pub mod report;
pub mod testing;
