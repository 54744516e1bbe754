//! Engine configuration.
//!
//! Configuration is read from a TOML file (conventionally `promptsmith.toml`).
//! Every field has a default, so a missing file or a partial file is valid.

use crate::error::{PromptError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default variable name under which a chain step's output is passed on.
pub const DEFAULT_OUTPUT_KEY: &str = "output";

/// Default directory searched for template files.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding template definition files.
    pub template_dir: PathBuf,

    /// Rendering settings.
    pub render: RenderConfig,

    /// Chaining settings.
    pub chain: ChainConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            render: RenderConfig::default(),
            chain: ChainConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Io`] if the file exists but cannot be read,
    /// [`PromptError::ConfigParseError`] if it is not valid TOML for this
    /// schema, and [`PromptError::InvalidConfig`] if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| PromptError::ConfigParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidConfig`] if the string is not valid TOML
    /// for this schema or a value is out of range.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| PromptError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chain.output_key.trim().is_empty() {
            return Err(PromptError::InvalidConfig(
                "chain.output_key must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the template language treats references to undefined variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedPolicy {
    /// Undefined values print as empty and are falsy.
    Lenient,
    /// Like lenient, and attribute access on undefined values is allowed.
    Chainable,
    /// Undefined values are falsy in `if` tests; printing or iterating one
    /// fails the render.
    #[default]
    SemiStrict,
    /// Any use of an undefined value other than `is defined` fails the render.
    Strict,
}

impl From<UndefinedPolicy> for minijinja::UndefinedBehavior {
    fn from(policy: UndefinedPolicy) -> Self {
        match policy {
            UndefinedPolicy::Lenient => minijinja::UndefinedBehavior::Lenient,
            UndefinedPolicy::Chainable => minijinja::UndefinedBehavior::Chainable,
            UndefinedPolicy::SemiStrict => minijinja::UndefinedBehavior::SemiStrict,
            UndefinedPolicy::Strict => minijinja::UndefinedBehavior::Strict,
        }
    }
}

/// Whether variables beyond the declared `input_variables` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariablePolicy {
    /// Declared variables are a minimum; extras pass through to the body.
    #[default]
    Permissive,
    /// Declared variables are exact; extras fail validation.
    Strict,
}

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Undefined variable handling inside template bodies.
    pub undefined: UndefinedPolicy,

    /// Extra variable handling during validation.
    pub variables: VariablePolicy,

    /// Remove the first newline after a block tag.
    pub trim_blocks: bool,

    /// Strip leading whitespace before a block tag.
    pub lstrip_blocks: bool,

    /// Keep a trailing newline at the end of the body.
    pub keep_trailing_newline: bool,

    /// Treat a declared variable bound to `null` as missing.
    pub null_is_missing: bool,
}

/// Chaining settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Variable name each step's output is stored under.
    pub output_key: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            output_key: DEFAULT_OUTPUT_KEY.to_string(),
        }
    }
}
