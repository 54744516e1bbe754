//! Error types for template validation, rendering and chaining.
//!
//! Every failure the core can produce is a [`PromptError`]. Variants fall into
//! two classes that callers usually want to tell apart: validation failures
//! (the inputs broke a contract before anything was rendered) and render
//! failures (the template language itself rejected the body). Use
//! [`PromptError::kind`] to classify an error without matching every variant.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, rendering or chaining templates.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PromptError {
    // Validation errors
    /// One or more declared input variables were not supplied.
    ///
    /// `missing` preserves the order of the template's `input_variables`,
    /// so the message is stable for the same input.
    #[error("missing required variables for template '{template}': {}", .missing.join(", "))]
    MissingVariables {
        /// Name of the template being rendered.
        template: String,
        /// Missing variable names, in declaration order.
        missing: Vec<String>,
    },

    /// Variables were supplied that the template does not declare.
    ///
    /// Only produced under [`VariablePolicy::Strict`](crate::config::VariablePolicy::Strict).
    #[error("undeclared variables for template '{template}': {}", .undeclared.join(", "))]
    UndeclaredVariables {
        /// Name of the template being rendered.
        template: String,
        /// Undeclared variable names, sorted.
        undeclared: Vec<String>,
    },

    /// A template definition field failed validation at construction time.
    #[error("invalid template definition '{name}': {field} {reason}")]
    InvalidDefinition {
        /// Name of the offending definition (may be empty if the name itself is invalid).
        name: String,
        /// Field that failed validation.
        field: &'static str,
        /// Why the field was rejected.
        reason: String,
    },

    /// A chain was requested with no templates.
    #[error("empty chain: at least one template is required")]
    EmptyChain,

    // Render errors
    /// The template language failed while evaluating the body.
    #[error("failed to render template '{template}'")]
    Render {
        /// Name of the template being rendered.
        template: String,
        /// Underlying template engine error.
        #[source]
        source: minijinja::Error,
    },

    // Chain errors
    /// A step of a prompt chain failed; the chain was aborted at that step.
    #[error("prompt chain failed at step {step} (template '{template}')")]
    Chain {
        /// Zero-based index of the failing step.
        step: usize,
        /// Name of the template at the failing step.
        template: String,
        /// The error raised by the failing step.
        #[source]
        source: Box<PromptError>,
    },

    // Config errors
    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Error parsing a configuration file.
    #[error("config parse error in {path}: {reason}")]
    ConfigParseError {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classification of a [`PromptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Inputs violated a contract before rendering started.
    Validation,
    /// The template language failed during substitution.
    Render,
    /// Configuration could not be loaded.
    Config,
}

impl PromptError {
    /// Returns the classification of this error.
    ///
    /// Chain errors report the classification of the step that failed.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromptError::MissingVariables { .. }
            | PromptError::UndeclaredVariables { .. }
            | PromptError::InvalidDefinition { .. }
            | PromptError::EmptyChain => ErrorKind::Validation,
            PromptError::Render { .. } => ErrorKind::Render,
            PromptError::Chain { source, .. } => source.kind(),
            PromptError::InvalidConfig(_)
            | PromptError::ConfigParseError { .. }
            | PromptError::Io(_) => ErrorKind::Config,
        }
    }

    /// Returns `true` for validation failures.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Returns `true` for template language failures.
    pub fn is_render(&self) -> bool {
        self.kind() == ErrorKind::Render
    }

    /// Returns the innermost error, unwrapping chain annotations.
    pub fn root(&self) -> &PromptError {
        match self {
            PromptError::Chain { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for promptsmith operations.
pub type Result<T> = std::result::Result<T, PromptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_message_lists_names_in_order() {
        let err = PromptError::MissingVariables {
            template: "qa".to_string(),
            missing: vec!["question".to_string(), "context".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required variables for template 'qa': question, context"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_chain_error_reports_cause_kind() {
        let err = PromptError::Chain {
            step: 1,
            template: "summarize".to_string(),
            source: Box::new(PromptError::MissingVariables {
                template: "summarize".to_string(),
                missing: vec!["output".to_string()],
            }),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err.root(), PromptError::MissingVariables { .. }));
        assert_eq!(
            err.to_string(),
            "prompt chain failed at step 1 (template 'summarize')"
        );
    }

    #[test]
    fn test_empty_chain_is_validation() {
        assert_eq!(PromptError::EmptyChain.kind(), ErrorKind::Validation);
        assert!(!PromptError::EmptyChain.is_render());
    }
}
