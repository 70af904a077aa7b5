//! Environment variable configuration for swagger-lint.
//!
//! Variables are read with the `envy` crate using serde deserialization. All
//! of them share the `SWAGGER_LINT_` prefix.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

pub const ENV_PREFIX: &str = "SWAGGER_LINT_";

/// Environment configuration for the application.
///
/// All fields are optional. Command line flags take precedence.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Swagger 2.0 JSON schema used when `--schema` is not given.
    ///
    /// Set via: `SWAGGER_LINT_SCHEMA=/path/to/schema.json`
    #[serde(default)]
    pub schema: Option<PathBuf>,

    /// Enable debug mode.
    ///
    /// When enabled, the validator error tree and the raw diagnostics are
    /// printed alongside the normal output.
    ///
    /// Set via: `SWAGGER_LINT_DEBUG=1` or `SWAGGER_LINT_DEBUG=true`
    #[serde(default, deserialize_with = "flag")]
    pub debug: bool,
}

/// Accept `1`/`0` as well as `true`/`false`.
fn flag<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(serde::de::Error::custom(format!("not a boolean: {}", other))),
    }
}

impl EnvConfig {
    /// Load configuration from environment variables.
    ///
    /// If parsing fails or variables are not set, the default config is
    /// returned.
    pub fn load() -> Self {
        Self::from_vars(std::env::vars())
    }

    fn from_vars<I: IntoIterator<Item = (String, String)>>(vars: I) -> Self {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, EnvConfig>(vars)
            .unwrap_or_else(|e| {
                warn!("ignoring {}* environment: {}", ENV_PREFIX, e);
                EnvConfig::default()
            })
    }

    /// Check if debug mode is enabled.
    pub fn is_debug_mode(&self) -> bool {
        self.debug
    }
}
