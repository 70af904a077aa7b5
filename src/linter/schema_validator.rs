use std::path::Path;

use jsonschema::{
    BasicOutput, ValidationError,
    error::ValidationErrorKind,
    output::{ErrorDescription, OutputUnit},
};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::linter::{
    resolver::PathSegment,
    tokenizer::Grammar,
    validator::{ErrorDetail, ONE_OF_MISSING, SpecValidator, ValidateOptions, ValidatorError},
};

/// Code for schema errors that have no more specific classification.
pub const SCHEMA_VALIDATION_FAILED: &str = "SCHEMA_VALIDATION_FAILED";

/// The official Swagger 2.0 JSON schema (draft-04).
const SWAGGER_2_SCHEMA: &str = include_str!("schemas/swagger-2.0.json");

/// A [`SpecValidator`] that checks documents against a Swagger 2.0 JSON schema
/// with [jsonschema](https://docs.rs/jsonschema).
///
/// The document is read from disk on every call, so the result describes the
/// saved file rather than any unsaved editor contents.
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    pub fn from_schema_value(schema: &Value) -> Result<Self, ValidatorError> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| ValidatorError::Schema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Validator for the bundled Swagger 2.0 schema.
    pub fn swagger2() -> Result<Self, ValidatorError> {
        let schema: Value = serde_json::from_str(SWAGGER_2_SCHEMA)
            .map_err(|e| ValidatorError::Schema(format!("bundled Swagger 2.0 schema: {}", e)))?;
        Self::from_schema_value(&schema)
    }

    pub fn from_schema_file(path: &Path) -> Result<Self, ValidatorError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ValidatorError::Schema(format!("cannot read {}: {}", path.display(), e))
        })?;
        let schema: Value = serde_json::from_str(&text).map_err(|e| {
            ValidatorError::Schema(format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        Self::from_schema_value(&schema)
    }

    /// Validate document text that claims to come from `path`.
    #[instrument(level = "debug", skip(self, text), fields(path = %path.display()))]
    pub fn validate_text(
        &self,
        path: &Path,
        text: &str,
        options: &ValidateOptions,
    ) -> Result<(), ValidatorError> {
        let instance = parse_document(path, text)?;

        if !options.schema {
            debug!("schema validation disabled, document parsed");
            return Ok(());
        }
        if options.spec {
            debug!("specification rules are not checked beyond the schema");
        }

        let errors: Vec<ValidationError<'_>> = self.validator.iter_errors(&instance).collect();
        if errors.is_empty() {
            return Ok(());
        }

        let units: Vec<OutputUnit<ErrorDescription>> = match self.validator.apply(&instance).basic() {
            BasicOutput::Invalid(units) => units.into_iter().collect(),
            BasicOutput::Valid(_) => Vec::new(),
        };

        let details: Vec<ErrorDetail> = errors.iter().map(|e| to_detail(e, &units)).collect();
        debug!(errors = details.len(), "schema validation failed");

        let mut message = String::from("Swagger schema validation failed.");
        for detail in &details {
            message.push_str("\n  ");
            message.push_str(detail.message());
        }

        Err(ValidatorError::Invalid { message, details })
    }
}

impl SpecValidator for SchemaValidator {
    async fn validate(&self, path: &Path, options: &ValidateOptions) -> Result<(), ValidatorError> {
        let text = std::fs::read_to_string(path).map_err(|e| ValidatorError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.validate_text(path, &text, options)
    }
}

/// Parse YAML or JSON into a JSON value, the shape the schema is written for.
pub fn parse_document(path: &Path, text: &str) -> Result<Value, ValidatorError> {
    let syntax_error = |message: String| ValidatorError::Syntax {
        path: path.display().to_string(),
        message,
    };

    match Grammar::detect(Some(path), text) {
        Grammar::Json => serde_json::from_str(text).map_err(|e| syntax_error(e.to_string())),
        Grammar::Yaml => serde_yaml::from_str::<serde_yaml::Value>(text)
            .map(yaml_to_json)
            .map_err(|e| syntax_error(e.to_string())),
    }
}

/// Convert a YAML value to JSON. Mapping keys that are not strings (such as
/// the status codes under `responses`) become their string spelling.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (yaml_key(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => match serde_yaml::to_string(&other) {
            Ok(s) => s.trim_end().to_string(),
            Err(e) => {
                warn!("cannot render complex mapping key: {}", e);
                String::new()
            }
        },
    }
}

fn to_detail(error: &ValidationError<'_>, units: &[OutputUnit<ErrorDescription>]) -> ErrorDetail {
    let instance_path = error.instance_path.as_str();
    let path = PathSegment::from_pointer(instance_path);

    if let ValidationErrorKind::OneOfNotValid = error.kind {
        let inner = one_of_alternatives(error.schema_path.as_str(), instance_path, units);
        let message = "Data does not match any schemas from 'oneOf'";
        if inner.is_empty() {
            return ErrorDetail::single(ONE_OF_MISSING, message, path);
        }
        return ErrorDetail::one_of(message, path, inner);
    }

    ErrorDetail::single(code_for(&error.kind), message_for(error), path)
}

/// Errors produced inside the alternatives of the `oneOf` keyword at
/// `keyword_location` while checking the value at `instance_path`, in the
/// order the schema evaluated them.
///
/// A `oneOf` under `items` or `additionalProperties` is applied to many
/// values, so the keyword location alone does not tell which value an error
/// belongs to.
fn one_of_alternatives(
    keyword_location: &str,
    instance_path: &str,
    units: &[OutputUnit<ErrorDescription>],
) -> Vec<ErrorDetail> {
    let keyword_prefix = format!("{}/", keyword_location);
    let instance_prefix = format!("{}/", instance_path);
    units
        .iter()
        .filter(|unit| unit.keyword_location().as_str().starts_with(&keyword_prefix))
        .filter(|unit| {
            let location = unit.instance_location().as_str();
            location == instance_path || location.starts_with(&instance_prefix)
        })
        .map(|unit| {
            ErrorDetail::single(
                SCHEMA_VALIDATION_FAILED,
                unit.error_description().to_string(),
                PathSegment::from_pointer(unit.instance_location().as_str()),
            )
        })
        .collect()
}

fn code_for(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Required { .. } => "OBJECT_MISSING_REQUIRED_PROPERTY",
        ValidationErrorKind::AdditionalProperties { .. } => "OBJECT_ADDITIONAL_PROPERTIES",
        ValidationErrorKind::Type { .. } => "INVALID_TYPE",
        ValidationErrorKind::Enum { .. } => "ENUM_MISMATCH",
        ValidationErrorKind::Pattern { .. } => "PATTERN",
        ValidationErrorKind::Format { .. } => "INVALID_FORMAT",
        ValidationErrorKind::OneOfNotValid => ONE_OF_MISSING,
        ValidationErrorKind::OneOfMultipleValid => "ONE_OF_MULTIPLE",
        ValidationErrorKind::AnyOf => "ANY_OF_MISSING",
        ValidationErrorKind::MinItems { .. } => "ARRAY_LENGTH_SHORT",
        ValidationErrorKind::MaxItems { .. } => "ARRAY_LENGTH_LONG",
        ValidationErrorKind::UniqueItems => "ARRAY_UNIQUE",
        ValidationErrorKind::MinLength { .. } => "MIN_LENGTH",
        ValidationErrorKind::MaxLength { .. } => "MAX_LENGTH",
        ValidationErrorKind::Minimum { .. } => "MINIMUM",
        ValidationErrorKind::Maximum { .. } => "MAXIMUM",
        _ => SCHEMA_VALIDATION_FAILED,
    }
}

fn message_for(error: &ValidationError<'_>) -> String {
    match &error.kind {
        ValidationErrorKind::Required { property } => match property.as_str() {
            Some(name) => format!("Missing required property: {}", name),
            None => format!("Missing required property: {}", property),
        },
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Additional properties not allowed: {}", unexpected.join(","))
        }
        _ => error.masked().to_string(),
    }
}
