use std::future::Future;
use std::path::Path;

use derive_builder::Builder;
use serde::Serialize;
use thiserror::Error;

use crate::linter::resolver::PathSegment;

/// Code carried by a detail whose value matched none of several alternatives.
pub const ONE_OF_MISSING: &str = "ONE_OF_MISSING";

/// What the validator should check.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct ValidateOptions {
    /// Validate the document against the Swagger 2.0 JSON schema.
    pub schema: bool,
    /// Also check the Swagger 2.0 specification rules that a JSON schema
    /// cannot express, as opposed to structure only.
    pub spec: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            schema: true,
            spec: true,
        }
    }
}

impl ValidateOptions {
    /// Structure only: schema validation without the specification rules.
    pub fn structural() -> Self {
        Self {
            schema: true,
            spec: false,
        }
    }
}

/// One entry of a validator's structured error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorDetail {
    Single {
        code: String,
        message: String,
        path: Vec<PathSegment>,
    },
    /// The value matched none of several alternatives. `inner` holds the
    /// errors each rejected alternative produced.
    OneOf {
        code: String,
        message: String,
        path: Vec<PathSegment>,
        inner: Vec<ErrorDetail>,
    },
}

impl ErrorDetail {
    pub fn single<C: Into<String>, M: Into<String>>(
        code: C,
        message: M,
        path: Vec<PathSegment>,
    ) -> Self {
        ErrorDetail::Single {
            code: code.into(),
            message: message.into(),
            path,
        }
    }

    pub fn one_of<M: Into<String>>(message: M, path: Vec<PathSegment>, inner: Vec<ErrorDetail>) -> Self {
        ErrorDetail::OneOf {
            code: ONE_OF_MISSING.to_string(),
            message: message.into(),
            path,
            inner,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ErrorDetail::Single { code, .. } | ErrorDetail::OneOf { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ErrorDetail::Single { message, .. } | ErrorDetail::OneOf { message, .. } => message,
        }
    }

    pub fn path(&self) -> &[PathSegment] {
        match self {
            ErrorDetail::Single { path, .. } | ErrorDetail::OneOf { path, .. } => path,
        }
    }

    /// Nested alternatives, empty for a single error.
    pub fn inner(&self) -> &[ErrorDetail] {
        match self {
            ErrorDetail::Single { .. } => &[],
            ErrorDetail::OneOf { inner, .. } => inner,
        }
    }
}

/// Why a document failed validation.
///
/// Only [`ValidatorError::Invalid`] carries a structured detail list; the other
/// variants describe failures that have no position inside the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("Error opening file \"{path}\": {message}")]
    Unreadable { path: String, message: String },
    #[error("Error parsing {path}: {message}")]
    Syntax { path: String, message: String },
    #[error("Invalid Swagger schema: {0}")]
    Schema(String),
    #[error("{message}")]
    Invalid {
        message: String,
        details: Vec<ErrorDetail>,
    },
}

impl ValidatorError {
    /// The structured detail list, if the error has one.
    pub fn details(&self) -> Option<&[ErrorDetail]> {
        match self {
            ValidatorError::Invalid { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// The external validator collaborator.
///
/// Validators work from the file on disk, which may lag behind an editor
/// buffer; callers must compare the buffer text before and after the call.
pub trait SpecValidator {
    fn validate(
        &self,
        path: &Path,
        options: &ValidateOptions,
    ) -> impl Future<Output = Result<(), ValidatorError>>;
}

impl<V: SpecValidator + ?Sized> SpecValidator for &V {
    fn validate(
        &self,
        path: &Path,
        options: &ValidateOptions,
    ) -> impl Future<Output = Result<(), ValidatorError>> {
        (**self).validate(path, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_request_spec_validation() {
        let options = ValidateOptions::default();
        assert!(options.schema);
        assert!(options.spec);
        assert!(!ValidateOptions::structural().spec);
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let options = ValidateOptionsBuilder::default()
            .spec(false)
            .build()
            .expect("options");
        assert_eq!(options, ValidateOptions::structural());
    }

    #[test]
    fn test_only_invalid_carries_details() {
        let invalid = ValidatorError::Invalid {
            message: "Swagger schema validation failed.".to_string(),
            details: vec![ErrorDetail::single("INVALID_TYPE", "bad", vec![])],
        };
        assert_eq!(invalid.details().map(<[ErrorDetail]>::len), Some(1));

        let syntax = ValidatorError::Syntax {
            path: "api.yaml".to_string(),
            message: "unexpected end".to_string(),
        };
        assert!(syntax.details().is_none());
        assert_eq!(syntax.to_string(), "Error parsing api.yaml: unexpected end");
    }

    #[test]
    fn test_one_of_accessors() {
        let detail = ErrorDetail::one_of(
            "Data does not match any schemas from 'oneOf'",
            vec![PathSegment::from("paths")],
            vec![ErrorDetail::single("OBJECT_MISSING_REQUIRED_PROPERTY", "missing", vec![])],
        );
        assert_eq!(detail.code(), ONE_OF_MISSING);
        assert_eq!(detail.inner().len(), 1);
        assert_eq!(detail.path(), &[PathSegment::from("paths")]);
    }
}
