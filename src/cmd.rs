use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use colored::Colorize;
use swagger_lint::{
    DocumentBuffer, EditorBuffer, LintOutcome, SchemaValidator, ValidateOptions,
    ValidateOptionsBuilder, ValidatorError, lint,
    linter::validator::ValidateOptionsBuilderError,
    reports::{LintReport, pretty_print::pretty_print_report, table::diagnostics_table},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::path_or_stdio::PathOrStdio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Annotated source snippets
    Pretty,
    /// Diagnostics as a JSON array
    Json,
    /// One table row per diagnostic
    Table,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validator(#[from] ValidatorError),
    #[error("Invalid validation options: {0}")]
    Options(#[from] ValidateOptionsBuilderError),
    #[error("Failed to open '{path}': {source}")]
    Open { path: String, source: io::Error },
    #[error("Failed to write {target}: {source}")]
    Output { target: String, source: io::Error },
    #[error("Error generating report: {0}")]
    Render(String),
    #[error("Failed to serialize diagnostics: {0}")]
    Json(#[from] serde_json::Error),
}

/// The schema file to load, with the command line winning over the
/// environment. `None` means the bundled Swagger 2.0 schema.
pub fn schema_path(flag: Option<PathBuf>, env: Option<PathBuf>) -> Option<PathBuf> {
    flag.or(env)
}

pub fn load_validator(schema: Option<&Path>) -> Result<SchemaValidator, CliError> {
    let validator = match schema {
        Some(path) => {
            info!(schema = %path.display(), "loading schema");
            SchemaValidator::from_schema_file(path)?
        }
        None => SchemaValidator::swagger2()?,
    };
    Ok(validator)
}

pub fn validate_options(structural_only: bool) -> Result<ValidateOptions, CliError> {
    Ok(ValidateOptionsBuilder::default()
        .spec(!structural_only)
        .build()?)
}

/// Lint every file in turn.
pub fn lint_files(
    files: &[PathBuf],
    validator: &SchemaValidator,
    options: &ValidateOptions,
    debug: bool,
) -> Result<Vec<LintReport>, CliError> {
    files
        .iter()
        .map(|path| lint_file(path, validator, options, debug))
        .collect()
}

fn lint_file(
    path: &Path,
    validator: &SchemaValidator,
    options: &ValidateOptions,
    debug: bool,
) -> Result<LintReport, CliError> {
    let buffer = DocumentBuffer::open(path).map_err(|source| CliError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let diagnostics = match pollster::block_on(lint(&buffer, validator, options)) {
        LintOutcome::Messages(diagnostics) => diagnostics,
        LintOutcome::NoUpdate => {
            // Nothing edits a buffer opened from the command line.
            warn!(path = %path.display(), "lint result discarded as stale");
            Vec::new()
        }
    };
    info!(path = %path.display(), diagnostics = diagnostics.len(), "linted");

    if debug {
        for diagnostic in &diagnostics {
            eprintln!("{:#?}", diagnostic);
        }
    }

    Ok(LintReport::new(
        diagnostics,
        buffer.text(),
        path.display().to_string(),
    ))
}

/// Write the reports in the requested format.
///
/// Pretty and table output go to stdout; JSON goes to `output`, which
/// defaults to stdout as well.
pub fn render(
    reports: &[LintReport],
    format: OutputFormat,
    output: Option<&PathOrStdio>,
    quiet: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Pretty => {
            for report in reports {
                if report.diagnostics.is_empty() {
                    if !quiet {
                        println!("{} {}", "✓".green(), report.filename);
                    }
                    continue;
                }
                print!(
                    "{}",
                    pretty_print_report(report).map_err(CliError::Render)?
                );
            }
        }
        OutputFormat::Table => {
            if reports.iter().any(|r| !r.diagnostics.is_empty()) {
                println!("{}", diagnostics_table(reports));
            }
        }
        OutputFormat::Json => {
            let diagnostics: Vec<_> = reports.iter().flat_map(|r| &r.diagnostics).collect();
            let target = output.cloned().unwrap_or(PathOrStdio::Stdio);
            let write_error = |source: io::Error| CliError::Output {
                target: target.filepath(),
                source,
            };

            let mut writer = target.writer().map_err(write_error)?;
            serde_json::to_writer_pretty(&mut writer, &diagnostics)?;
            writeln!(writer).map_err(write_error)?;
            writer.flush().map_err(write_error)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn schema() -> SchemaValidator {
        SchemaValidator::from_schema_value(&json!({
            "type": "object",
            "required": ["swagger", "info"],
            "properties": { "info": { "type": "object", "required": ["title"] } }
        }))
        .expect("schema")
    }

    #[test]
    fn test_schema_flag_wins_over_environment() {
        let picked = schema_path(Some("flag.json".into()), Some("env.json".into()));
        assert_eq!(picked, Some(PathBuf::from("flag.json")));
        assert_eq!(
            schema_path(None, Some("env.json".into())),
            Some(PathBuf::from("env.json"))
        );
        assert_eq!(schema_path(None, None), None);
    }

    #[test]
    fn test_options_follow_structural_flag() {
        assert_eq!(validate_options(false).expect("options"), ValidateOptions::default());
        assert_eq!(validate_options(true).expect("options"), ValidateOptions::structural());
    }

    #[test]
    fn test_bundled_schema_without_arguments() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let api = dir.path().join("api.yaml");
        std::fs::write(
            &api,
            "swagger: \"2.0\"\ninfo:\n  title: Pets\n  version: \"1\"\npaths:\n  /pets:\n    get:\n      summary: list\n",
        )
        .expect("write");

        let validator = load_validator(schema_path(None, None).as_deref()).expect("schema");
        let reports = lint_files(&[api], &validator, &validate_options(false).expect("options"), false)
            .expect("lint");

        let diagnostics = &reports[0].diagnostics;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Missing required property: responses");
        assert_eq!(diagnostics[0].range, swagger_lint::Range::on_line(6, 4, 7));
    }

    #[test]
    fn test_unreadable_schema_file() {
        let result = load_validator(Some(Path::new("/definitely/not/schema.json")));
        assert!(matches!(result, Err(CliError::Validator(ValidatorError::Schema(_)))));
    }

    #[test]
    fn test_lint_files_and_write_json() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let good = dir.path().join("good.yaml");
        let bad = dir.path().join("bad.yaml");
        std::fs::write(&good, "swagger: \"2.0\"\ninfo:\n  title: Pets\n").expect("write");
        std::fs::write(&bad, "swagger: \"2.0\"\ninfo:\n  version: 1\n").expect("write");

        let reports = lint_files(
            &[good, bad],
            &schema(),
            &ValidateOptions::default(),
            false,
        )
        .expect("lint");
        assert!(reports[0].is_valid());
        assert_eq!(reports[1].error_count(), 1);

        let out = dir.path().join("out.json");
        render(
            &reports,
            OutputFormat::Json,
            Some(&PathOrStdio::Path(out.clone())),
            true,
        )
        .expect("render");

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(out).expect("read")).expect("json");
        assert_eq!(written.as_array().map(Vec::len), Some(1));
        assert_eq!(written[0]["severity"], "Error");
        assert_eq!(written[0]["range"]["start"]["line"], 1);
    }

    #[test]
    fn test_missing_input_file() {
        let result = lint_files(
            &[PathBuf::from("/definitely/not/here.yaml")],
            &schema(),
            &ValidateOptions::default(),
            false,
        );
        assert!(matches!(result, Err(CliError::Open { .. })));
    }
}
