use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Texts this short cannot hold a meaningful Swagger document.
const MIN_LENGTH: usize = 8;

/// A `swagger` key, optionally quoted, whose value is a quoted `major.minor`
/// version such as `swagger: "2.0"` or `"swagger": "2.0"`.
static SWAGGER_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""?swagger"?\s*:\s*['"]\d+\.\d+['"]"#).unwrap());

/// Cheaply decide whether a document looks like a Swagger 2.0 definition.
///
/// This only gates the expensive validator call. False negatives and false
/// positives are both acceptable; the validator has the final word.
pub fn can_validate(text: &str) -> bool {
    let long_enough = text.chars().count() > MIN_LENGTH;
    let eligible = long_enough && SWAGGER_VERSION_REGEX.is_match(text);
    trace!(long_enough, eligible, "eligibility check");
    eligible
}
