use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

pub mod cmd;
pub mod env;
mod path_or_stdio;

use crate::cmd::{
    CliError, OutputFormat, lint_files, load_validator, render, schema_path, validate_options,
};
use crate::env::EnvConfig;
use crate::path_or_stdio::PathOrStdio;
use colored::Colorize;
use swagger_lint::reports::LintReport;

#[derive(Parser, Debug)]
#[command(version, about = "Lint Swagger 2.0 documents against a JSON schema")]
struct Args {
    /// Swagger documents (YAML or JSON) to lint
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// JSON schema file to use instead of the bundled Swagger 2.0 schema,
    /// overriding SWAGGER_LINT_SCHEMA
    #[arg(short, long)]
    schema: Option<PathBuf>,
    /// How to print diagnostics
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
    /// JSON output file or "-" for stdout
    #[arg(short, long)]
    output: Option<String>,
    /// Only check document structure, not the specification rules
    #[arg(long)]
    structural_only: bool,
    /// Whether to suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn run(args: Args, env_config: &EnvConfig) -> Result<Vec<LintReport>, CliError> {
    let schema = schema_path(args.schema, env_config.schema.clone());
    let validator = load_validator(schema.as_deref())?;
    let options = validate_options(args.structural_only)?;

    let reports = lint_files(&args.files, &validator, &options, env_config.is_debug_mode())?;
    let output = args.output.map(PathOrStdio::from);
    render(&reports, args.format, output.as_ref(), args.quiet)?;

    Ok(reports)
}

fn main() {
    // Load environment configuration
    let env_config = EnvConfig::load();

    let default_filter = if env_config.is_debug_mode() {
        "warn,swagger_lint=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let quiet = args.quiet;

    match run(args, &env_config) {
        Err(err) => {
            eprintln!("{}", format!("Error! {}", err).red());
            exit(2)
        }
        Ok(reports) => {
            let errors: usize = reports.iter().map(LintReport::error_count).sum();
            if errors > 0 {
                eprintln!(
                    "{}",
                    format!("{} problem(s) in {} file(s)", errors, reports.len()).red()
                );
                exit(1)
            }
            if !quiet {
                eprintln!("{}", format!("{} file(s) valid", reports.len()).green());
            }
        }
    }
}
