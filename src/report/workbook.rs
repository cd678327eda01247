//! Results workbook: one worksheet per numerator condition.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use crate::analysis::Comparison;

pub const L2FC_HEADER: &str = "L2FC";
pub const P_VALUE_HEADER: &str = "-log10(p-value)";

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCell {
    Text(String),
    Number(f64),
    Blank,
}

impl OutputCell {
    /// Excel cannot hold NaN or infinities, so those are spelled out as text.
    fn number(value: f64) -> Self {
        if value.is_finite() {
            OutputCell::Number(value)
        } else if value.is_nan() {
            OutputCell::Text("NaN".to_string())
        } else if value > 0.0 {
            OutputCell::Text("inf".to_string())
        } else {
            OutputCell::Text("-inf".to_string())
        }
    }

    fn text(value: &str) -> Self {
        if value.is_empty() {
            OutputCell::Blank
        } else {
            OutputCell::Text(value.to_string())
        }
    }
}

/// Cell grid of one comparison as it is written to its worksheet.
///
/// There is no separate header: row 0 carries the column headers as ordinary data,
/// followed by one row per retained feature.
pub fn comparison_grid(comparison: &Comparison) -> Vec<Vec<OutputCell>> {
    let table = &comparison.table;
    let mut grid = Vec::with_capacity(table.n_features() + 1);

    let mut header: Vec<OutputCell> = table.headers.iter().map(|h| OutputCell::text(h)).collect();
    header.push(OutputCell::text(L2FC_HEADER));
    header.push(OutputCell::text(P_VALUE_HEADER));
    header.push(OutputCell::Blank);
    grid.push(header);

    for (i, (feature, metrics)) in table.features.iter().zip(&comparison.metrics).enumerate() {
        let mut row = Vec::with_capacity(table.values.ncols() + 5);
        row.push(OutputCell::text(&feature.id));
        row.push(OutputCell::text(&feature.display_label()));
        row.extend(table.values.row(i).iter().map(|&v| OutputCell::number(v)));
        row.push(OutputCell::number(metrics.l2fc));
        row.push(OutputCell::number(metrics.neg_log10_p));
        row.push(OutputCell::text(metrics.regulation.tag()));
        grid.push(row);
    }

    grid
}

const MAX_TAB_NAME: usize = 31;
const FORBIDDEN_TAB_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Whether a worksheet can be named `name`.
pub fn is_valid_tab_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_TAB_NAME
        && !name.contains(FORBIDDEN_TAB_CHARS)
        && !name.starts_with('\'')
        && !name.ends_with('\'')
}

/// Worksheet names are compared without regard to case.
pub fn tab_names_clash(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Write all comparisons of a sheet into a single workbook, one tab per numerator.
pub fn write_workbook(path: &Path, comparisons: &[Comparison]) -> Result<()> {
    let mut workbook = Workbook::new();

    for comparison in comparisons {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&comparison.table.numerator)
            .with_context(|| format!("invalid tab name '{}'", comparison.table.numerator))?;

        for (r, cells) in comparison_grid(comparison).iter().enumerate() {
            let row = u32::try_from(r)?;
            for (c, cell) in cells.iter().enumerate() {
                let col = u16::try_from(c)?;
                match cell {
                    OutputCell::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    OutputCell::Number(value) => {
                        worksheet.write_number(row, col, *value)?;
                    }
                    OutputCell::Blank => {}
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_metrics;
    use crate::data::{ComparisonTable, Feature};
    use ndarray::array;

    fn comparison() -> Comparison {
        let mut imputed = Feature::new("P2", "Tubulin");
        imputed.imputed = true;
        let table = ComparisonTable {
            denominator: "Ctrl".into(),
            numerator: "Treat".into(),
            headers: ["id", "name", "Ctrl_1", "Ctrl_2", "Ctrl_3", "Treat_1", "Treat_2", "Treat_3"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            features: vec![Feature::new("P1", "Actin"), imputed],
            values: array![
                [1.0, 2.0, 3.0, 7.0, 8.0, 9.0],
                [5.0, 5.0, 5.0, 5.0, 5.0, 5.0]
            ],
        };
        compute_metrics(table, 0.5).unwrap()
    }

    #[test]
    fn test_grid_layout() {
        let grid = comparison_grid(&comparison());
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0].len(), 11);
        assert_eq!(grid[0][0], OutputCell::Text("id".into()));
        assert_eq!(grid[0][8], OutputCell::Text(L2FC_HEADER.into()));
        assert_eq!(grid[0][9], OutputCell::Text(P_VALUE_HEADER.into()));
        assert_eq!(grid[0][10], OutputCell::Blank);

        assert_eq!(grid[1][1], OutputCell::Text("Actin".into()));
        assert_eq!(grid[1][8], OutputCell::Number(2.0));
        assert_eq!(grid[1][10], OutputCell::Text("UP".into()));

        assert_eq!(grid[2][1], OutputCell::Text("Tubulin*".into()));
        assert_eq!(grid[2][10], OutputCell::Blank);
    }

    #[test]
    fn test_tab_name_rules() {
        assert!(is_valid_tab_name("Treat"));
        assert!(!is_valid_tab_name(""));
        assert!(!is_valid_tab_name("a/b"));
        assert!(!is_valid_tab_name("'quoted'"));
        assert!(!is_valid_tab_name(&"x".repeat(32)));
        assert!(tab_names_clash("Treat", "treat"));
        assert!(!tab_names_clash("Treat", "Treated"));
    }

    #[test]
    fn test_non_finite_numbers_as_text() {
        assert_eq!(OutputCell::number(f64::INFINITY), OutputCell::Text("inf".into()));
        assert_eq!(OutputCell::number(f64::NEG_INFINITY), OutputCell::Text("-inf".into()));
        assert_eq!(OutputCell::number(f64::NAN), OutputCell::Text("NaN".into()));
        assert_eq!(OutputCell::number(1.5), OutputCell::Number(1.5));
    }
}
