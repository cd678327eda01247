use std::path::Path;

use anyhow::{Context, Result};
use calamine::{DataType, Range, Reader, open_workbook_auto};
use log::debug;

use super::model::{Dataset, FeatureRow, MEASUREMENT_OFFSET};
use crate::error::AnalysisError;

/// Sheet the instrument export is curated into before analysis.
pub const EDITED_SHEET: &str = "edited";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the `edited` sheet of a workbook (`.xlsx`, `.xls`, `.ods`, ...).
pub fn load_workbook(path: &Path) -> Result<Dataset> {
    load_sheet(path, EDITED_SHEET)
}

pub fn load_sheet(path: &Path, sheet: &str) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;

    let range = workbook
        .worksheet_range(sheet)
        .ok_or_else(|| AnalysisError::MissingSheet(sheet.to_string()))?
        .with_context(|| format!("failed to read sheet '{sheet}' of {}", path.display()))?;

    let dataset = dataset_from_range(&range, sheet)?;
    debug!(
        "Loaded {} features × {} columns from {}",
        dataset.n_features(),
        dataset.headers.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell conversion
// ---------------------------------------------------------------------------

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Empty => String::new(),
        DataType::Bool(b) => b.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Error(e) => format!("ERR({e:?})"),
        other => other.to_string(),
    }
}

/// Measurement cells: numbers as-is, blanks as missing (0), numeric text parsed.
fn cell_to_measurement(cell: &DataType, row: usize, column: usize) -> Result<f64, AnalysisError> {
    let invalid = || AnalysisError::InvalidMeasurement {
        value: cell_to_string(cell),
        row,
        column,
    };

    let value = match cell {
        DataType::Float(f) => *f,
        DataType::Int(i) => *i as f64,
        DataType::Empty => 0.0,
        DataType::String(s) if s.trim().is_empty() => 0.0,
        DataType::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Turn a sheet range into a [`Dataset`]. Row 0 is the header; fully blank rows are skipped.
pub fn dataset_from_range(range: &Range<DataType>, sheet: &str) -> Result<Dataset, AnalysisError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| AnalysisError::EmptySheet(sheet.to_string()))?
        .iter()
        .map(cell_to_string)
        .collect();

    let n_measurements = headers.len().saturating_sub(MEASUREMENT_OFFSET);
    let mut features = Vec::new();

    // Sheet rows are 1-based for the user and the header is row 1
    for (offset, cells) in rows.enumerate() {
        if cells.iter().all(|c| matches!(c, DataType::Empty)) {
            continue;
        }
        let sheet_row = offset + 2;

        let text = |i: usize| cells.get(i).map(cell_to_string).unwrap_or_default();
        let measurements = (0..n_measurements)
            .map(|i| {
                let column = MEASUREMENT_OFFSET + i;
                match cells.get(column) {
                    Some(cell) => cell_to_measurement(cell, sheet_row, column + 1),
                    None => Ok(0.0),
                }
            })
            .collect::<Result<Vec<f64>, _>>()?;

        features.push(FeatureRow::new(text(0), text(1), measurements));
    }

    Dataset::new(headers, features)
}
