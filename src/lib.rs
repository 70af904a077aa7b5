pub mod linter;
pub mod reports;

pub use linter::{
    buffer::{DocumentBuffer, EditorBuffer},
    eligibility::can_validate,
    lint::{LintOutcome, lint},
    range::{Position, Range},
    resolver::{PathSegment, resolve_range},
    schema_validator::SchemaValidator,
    tokens::{LineTokenSource, Token, TokenizedLine},
    validator::{
        ErrorDetail, SpecValidator, ValidateOptions, ValidateOptionsBuilder, ValidatorError,
    },
};
pub use reports::{Diagnostic, Severity, to_messages};
