//! Output artefacts: volcano figures and the annotated results workbook.

pub mod plot;
pub mod workbook;

pub use plot::{FigureSink, PngRenderer, VolcanoFigure};
pub use workbook::{is_valid_tab_name, tab_names_clash, write_workbook};

/// File name up to the first `.`, used to name everything derived from an input sheet.
pub fn sheet_stem(file_name: &str) -> &str {
    file_name
        .split_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}

/// `<stem>_<denominator>_VS_<numerator>.png`
pub fn figure_file_name(sheet: &str, denominator: &str, numerator: &str) -> String {
    format!("{}_{denominator}_VS_{numerator}.png", sheet_stem(sheet))
}

/// `<stem>_<first numerator>.xlsx`
pub fn workbook_file_name(sheet: &str, first_numerator: &str) -> String {
    format!("{}_{first_numerator}.xlsx", sheet_stem(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        assert_eq!(sheet_stem("run1.xlsx"), "run1");
        assert_eq!(sheet_stem("noext"), "noext");
        assert_eq!(figure_file_name("run1.xlsx", "Ctrl", "Treat"), "run1_Ctrl_VS_Treat.png");
        assert_eq!(workbook_file_name("run1.xlsx", "Treat"), "run1_Treat.xlsx");
    }
}
