pub mod error_tree;
pub mod pretty_print;
pub mod table;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::linter::{
    range::Range,
    resolver::resolve_range,
    tokens::LineTokenSource,
    validator::{ErrorDetail, ValidatorError},
};

/// Every schema or parse failure is reported as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
}

/// A positioned message for the linting host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub file_path: PathBuf,
    pub range: Range,
}

impl Diagnostic {
    pub fn error<M: Into<String>>(message: M, file_path: &Path, range: Range) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            file_path: file_path.to_path_buf(),
            range,
        }
    }
}

/// Turn a validator error into diagnostics positioned in `text`.
///
/// Errors without a detail list produce a single diagnostic spanning the whole
/// document. Otherwise every detail produces diagnostics: a `oneOf` failure
/// expands to one diagnostic per rejected alternative, anything else to one
/// diagnostic at its own path. Paths that cannot be located in `source` fall
/// back to the whole-document range.
pub fn to_messages<S: LineTokenSource + ?Sized>(
    error: &ValidatorError,
    file_path: &Path,
    text: &str,
    source: &S,
) -> Vec<Diagnostic> {
    let whole_document = Range::whole_document(text);

    let Some(details) = error.details() else {
        return vec![Diagnostic::error(error.to_string(), file_path, whole_document)];
    };

    let locate = |detail: &ErrorDetail| {
        let range = resolve_range(detail.path(), source).unwrap_or(whole_document);
        Diagnostic::error(detail.message(), file_path, range)
    };

    let messages: Vec<Diagnostic> = details
        .iter()
        .flat_map(|detail| match detail {
            ErrorDetail::OneOf { inner, .. } if !inner.is_empty() => {
                inner.iter().map(locate).collect::<Vec<_>>()
            }
            _ => vec![locate(detail)],
        })
        .collect();

    debug!(
        details = details.len(),
        diagnostics = messages.len(),
        "mapped validator details"
    );
    messages
}

/// Diagnostics produced for one document, with the text they point into.
#[derive(Debug, Clone)]
pub struct LintReport {
    pub diagnostics: Vec<Diagnostic>,
    pub source_content: String,
    pub filename: String,
}

impl LintReport {
    pub fn new(diagnostics: Vec<Diagnostic>, source_content: String, filename: String) -> Self {
        Self {
            diagnostics,
            source_content,
            filename,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::{
        resolver::PathSegment,
        tokenizer::{Grammar, TokenizedDocument},
    };

    const PETS: &str = "swagger: \"2.0\"\npaths:\n  /pets:\n    get:\n      responses: {}";

    fn path(keys: &[&str]) -> Vec<PathSegment> {
        keys.iter().map(|k| PathSegment::from(*k)).collect()
    }

    fn tokens() -> TokenizedDocument {
        TokenizedDocument::new(PETS, Grammar::Yaml).expect("tokenize")
    }

    #[test]
    fn test_error_without_details_spans_document() {
        let error = ValidatorError::Syntax {
            path: "api.yaml".to_string(),
            message: "bad indentation".to_string(),
        };
        let messages = to_messages(&error, Path::new("api.yaml"), PETS, &tokens());

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Error);
        assert_eq!(messages[0].message, "Error parsing api.yaml: bad indentation");
        assert_eq!(messages[0].range, Range::whole_document(PETS));
    }

    #[test]
    fn test_every_detail_becomes_a_diagnostic() {
        let error = ValidatorError::Invalid {
            message: "Swagger schema validation failed.".to_string(),
            details: vec![
                ErrorDetail::single("A", "first", path(&["paths", "/pets"])),
                ErrorDetail::single("B", "second", path(&["paths", "/pets", "get"])),
            ],
        };
        let messages = to_messages(&error, Path::new("api.yaml"), PETS, &tokens());

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].range, Range::on_line(2, 2, 7));
        assert_eq!(messages[1].range, Range::on_line(3, 4, 7));
        assert_eq!(messages[1].message, "second");
    }

    #[test]
    fn test_one_of_expands_to_each_alternative() {
        let error = ValidatorError::Invalid {
            message: "Swagger schema validation failed.".to_string(),
            details: vec![ErrorDetail::one_of(
                "Data does not match any schemas from 'oneOf'",
                path(&["paths"]),
                vec![
                    ErrorDetail::single("A", "alt 1", path(&["paths", "/pets", "get"])),
                    ErrorDetail::single("B", "alt 2", path(&["paths", "/pets", "get", "responses"])),
                    ErrorDetail::single("C", "alt 3", path(&["nowhere"])),
                ],
            )],
        };
        let messages = to_messages(&error, Path::new("api.yaml"), PETS, &tokens());

        let ranges: Vec<Range> = messages.iter().map(|m| m.range).collect();
        assert_eq!(
            ranges,
            vec![
                Range::on_line(3, 4, 7),
                Range::on_line(4, 6, 15),
                Range::whole_document(PETS),
            ]
        );
    }

    #[test]
    fn test_one_of_without_alternatives_is_a_single_diagnostic() {
        let error = ValidatorError::Invalid {
            message: "failed".to_string(),
            details: vec![ErrorDetail::one_of("no match", path(&["paths"]), vec![])],
        };
        let messages = to_messages(&error, Path::new("api.yaml"), PETS, &tokens());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].range, Range::on_line(1, 0, 5));
    }

    #[test]
    fn test_report_counts_errors() {
        let report = LintReport::new(
            vec![Diagnostic::error("x", Path::new("a.yaml"), Range::default())],
            String::new(),
            "a.yaml".to_string(),
        );
        assert!(report.has_errors());
        assert!(!report.is_valid());
        assert_eq!(report.error_count(), 1);
    }
}
