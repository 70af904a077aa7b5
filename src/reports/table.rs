use tabled::{Table, Tabled, settings::Style};

use crate::reports::{Diagnostic, LintReport};

#[derive(Debug, Tabled)]
struct DiagnosticRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&Diagnostic> for DiagnosticRow {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            file: diagnostic.file_path.display().to_string(),
            location: diagnostic.range.to_string(),
            severity: format!("{:?}", diagnostic.severity),
            message: diagnostic.message.clone(),
        }
    }
}

/// Render the diagnostics of several reports as one table.
pub fn diagnostics_table<'a, I>(reports: I) -> String
where
    I: IntoIterator<Item = &'a LintReport>,
{
    let rows: Vec<DiagnosticRow> = reports
        .into_iter()
        .flat_map(|report| report.diagnostics.iter().map(DiagnosticRow::from))
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::linter::range::Range;

    #[test]
    fn test_table_has_a_row_per_diagnostic() {
        let report = LintReport::new(
            vec![
                Diagnostic::error("missing info", Path::new("api.yaml"), Range::on_line(0, 0, 7)),
                Diagnostic::error("bad path", Path::new("api.yaml"), Range::on_line(2, 2, 7)),
            ],
            String::new(),
            "api.yaml".to_string(),
        );

        let table = diagnostics_table([&report]);
        assert!(table.contains("Location"));
        assert!(table.contains("missing info"));
        assert!(table.contains("3:3-3:8"));
        assert_eq!(table.matches("api.yaml").count(), 2);
    }
}
