use ndarray::{Array2, ArrayView1, s};

use crate::error::AnalysisError;

/// Columns before this index hold the identifier and label; measurements follow.
pub const MEASUREMENT_OFFSET: usize = 2;

// ---------------------------------------------------------------------------
// Feature – identifier and annotation of one measured protein
// ---------------------------------------------------------------------------

/// Identity of a feature row, kept apart from its numbers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Column 0 of the sheet
    pub id: String,
    /// Column 1 of the sheet (description, gene name, ...)
    pub label: String,
    /// Set once any of the row's measurements has been imputed
    pub imputed: bool,
}

impl Feature {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Feature {
            id: id.into(),
            label: label.into(),
            imputed: false,
        }
    }

    /// Label as written to the results workbook: suffixed with `*` when imputed.
    pub fn display_label(&self) -> String {
        if self.imputed {
            format!("{}*", self.label)
        } else {
            self.label.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the whole "edited" sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub feature: Feature,
    /// One value per measurement column, i.e. sheet column `MEASUREMENT_OFFSET + i`
    pub measurements: Vec<f64>,
}

impl FeatureRow {
    pub fn new(id: impl Into<String>, label: impl Into<String>, measurements: Vec<f64>) -> Self {
        FeatureRow {
            feature: Feature::new(id, label),
            measurements,
        }
    }

    /// Value at a sheet column index. Columns past the end of the row read as missing (0).
    pub fn value_at(&self, column: usize) -> f64 {
        column
            .checked_sub(MEASUREMENT_OFFSET)
            .and_then(|i| self.measurements.get(i))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Header row plus feature rows of one input sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

impl Dataset {
    /// Build a dataset, checking every row carries one value per measurement header.
    pub fn new(headers: Vec<String>, rows: Vec<FeatureRow>) -> Result<Self, AnalysisError> {
        let expected = headers.len().saturating_sub(MEASUREMENT_OFFSET);
        if let Some(row) = rows.iter().find(|r| r.measurements.len() != expected) {
            return Err(AnalysisError::DimensionMismatch {
                expected,
                actual: row.measurements.len(),
            });
        }
        Ok(Dataset { headers, rows })
    }

    pub fn n_features(&self) -> usize {
        self.rows.len()
    }

    pub fn header(&self, column: usize) -> &str {
        self.headers.get(column).map(String::as_str).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// ComparisonTable – retained rows of one denominator/numerator pair
// ---------------------------------------------------------------------------

/// Rows that survived quality filtering for one comparison.
///
/// `values` is `features × 2·replicates`: denominator replicates first, then numerator.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub denominator: String,
    pub numerator: String,
    /// Identifier header, label header, denominator headers, numerator headers
    pub headers: Vec<String>,
    pub features: Vec<Feature>,
    pub values: Array2<f64>,
}

impl ComparisonTable {
    pub fn replicates(&self) -> usize {
        self.values.ncols() / 2
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn denominator_values(&self, row: usize) -> ArrayView1<'_, f64> {
        let r = self.replicates();
        self.values.slice(s![row, ..r])
    }

    pub fn numerator_values(&self, row: usize) -> ArrayView1<'_, f64> {
        let r = self.replicates();
        self.values.slice(s![row, r..])
    }

    pub fn count_zeros(&self) -> usize {
        self.values.iter().filter(|&&v| v == 0.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dataset_rejects_ragged_rows() {
        let headers = vec!["id".into(), "name".into(), "A_1".into(), "A_2".into()];
        let rows = vec![FeatureRow::new("P1", "one", vec![1.0])];
        let err = Dataset::new(headers, rows).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_value_at_uses_sheet_columns() {
        let row = FeatureRow::new("P1", "one", vec![1.5, 2.5]);
        assert_eq!(row.value_at(2), 1.5);
        assert_eq!(row.value_at(3), 2.5);
        assert_eq!(row.value_at(4), 0.0);
        assert_eq!(row.value_at(0), 0.0);
    }

    #[test]
    fn test_display_label_marks_imputed() {
        let mut feature = Feature::new("P1", "Actin");
        assert_eq!(feature.display_label(), "Actin");
        feature.imputed = true;
        assert_eq!(feature.display_label(), "Actin*");
    }

    #[test]
    fn test_comparison_table_slices() {
        let table = ComparisonTable {
            denominator: "Ctrl".into(),
            numerator: "Treat".into(),
            headers: vec![],
            features: vec![Feature::new("P1", "one")],
            values: array![[1.0, 2.0, 3.0, 10.0, 11.0, 12.0]],
        };
        assert_eq!(table.replicates(), 3);
        assert_eq!(table.denominator_values(0).to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(table.numerator_values(0).to_vec(), vec![10.0, 11.0, 12.0]);
        assert_eq!(table.count_zeros(), 0);
    }
}
