use crate::data::model::MEASUREMENT_OFFSET;
use crate::error::AnalysisError;

/// Condition tag of a column header: the text before the first `_`, or before the first
/// `-` when there is no underscore. Headers with neither separator carry no tag.
///
/// ```
/// use prot_de::data::select::condition_prefix;
/// assert_eq!(condition_prefix("Ctrl_1"), Some("Ctrl"));
/// assert_eq!(condition_prefix("Ctrl-2"), Some("Ctrl"));
/// assert_eq!(condition_prefix("Treat-A_1"), Some("Treat-A"));
/// assert_eq!(condition_prefix("Description"), None);
/// ```
pub fn condition_prefix(header: &str) -> Option<&str> {
    header
        .split_once('_')
        .or_else(|| header.split_once('-'))
        .map(|(prefix, _)| prefix)
}

/// Sheet column indices whose header belongs to `condition`, in left-to-right order.
///
/// Only measurement columns are considered. Fails when the number of matches differs
/// from the configured replicate count.
pub fn select_columns(
    headers: &[String],
    condition: &str,
    expected: usize,
) -> Result<Vec<usize>, AnalysisError> {
    let columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .skip(MEASUREMENT_OFFSET)
        .filter_map(|(i, h)| (condition_prefix(h.trim()) == Some(condition)).then_some(i))
        .collect();

    if columns.len() != expected {
        return Err(AnalysisError::ReplicateCountMismatch {
            condition: condition.to_string(),
            expected,
            found: columns.len(),
        });
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mixed_separators_match() {
        let h = headers(&["id", "name", "A_1", "A_2", "A-3", "B_1"]);
        assert_eq!(select_columns(&h, "A", 3).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_underscore_takes_precedence() {
        // "A-B_1" belongs to "A-B", not "A"
        let h = headers(&["id", "name", "A-B_1", "A-B_2", "A_1"]);
        assert_eq!(select_columns(&h, "A-B", 2).unwrap(), vec![2, 3]);
        assert_eq!(select_columns(&h, "A", 1).unwrap(), vec![4]);
    }

    #[test]
    fn test_identifier_columns_ignored() {
        // Leading columns never count towards a condition even if tagged
        let h = headers(&["A_id", "A_name", "A_1", "A_2", "A_3"]);
        assert_eq!(select_columns(&h, "A", 3).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_count_mismatch_reports() {
        let h = headers(&["id", "name", "A_1", "A_2", "B_1", "B_2", "B_3"]);
        let err = select_columns(&h, "A", 3).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ReplicateCountMismatch {
                condition: "A".into(),
                expected: 3,
                found: 2
            }
        );
        assert!(select_columns(&h, "C", 3).is_err());
    }

    #[test]
    fn test_prefix_is_exact() {
        let h = headers(&["id", "name", "Ctrl_1", "Ctrl2_1", "Ctrl_2", "Ctrl_3"]);
        assert_eq!(select_columns(&h, "Ctrl", 3).unwrap(), vec![2, 4, 5]);
    }
}
