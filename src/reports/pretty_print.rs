use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::reports::{Diagnostic, LintReport, Severity};

fn report_style(severity: Severity) -> (ReportKind<'static>, Color) {
    match severity {
        Severity::Error => (ReportKind::Error, Color::Red),
    }
}

/// Pretty prints a diagnostic using
/// [ariadne](https://github.com/zesterer/ariadne) for nice formatting.
///
/// Returns a String containing the formatted report, or an error message if
/// formatting fails.
pub fn pretty_print_diagnostic(
    diagnostic: &Diagnostic,
    source_content: &str,
    filename: &str,
) -> Result<String, String> {
    let (report_kind, color) = report_style(diagnostic.severity);
    let span = diagnostic.range.to_char_span(source_content);

    // A headline message can span several lines; label only the first.
    let label = diagnostic
        .message
        .lines()
        .next()
        .unwrap_or_default()
        .to_string();

    let mut buffer = Vec::new();
    Report::build(report_kind, (filename, span.clone()))
        .with_message(diagnostic.message.clone())
        .with_label(
            Label::new((filename, span))
                .with_message(label)
                .with_color(color),
        )
        .finish()
        .write((filename, Source::from(source_content)), &mut buffer)
        .map_err(|e| e.to_string())?;

    Ok(String::from_utf8_lossy(&buffer).to_string())
}

/// Every diagnostic of a report, one ariadne block after another.
pub fn pretty_print_report(report: &LintReport) -> Result<String, String> {
    let mut output = String::new();
    for diagnostic in &report.diagnostics {
        output.push_str(&pretty_print_diagnostic(
            diagnostic,
            &report.source_content,
            &report.filename,
        )?);
    }
    Ok(output)
}
