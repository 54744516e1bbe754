//! Promptsmith Core - rendering, validation and chaining of prompt templates.
//!
//! This crate turns [`TemplateDefinition`]s and variable mappings into
//! prompt text. Bodies use Jinja syntax evaluated by minijinja; every render
//! first checks that all declared input variables are present, and every
//! successful render is recorded in the engine's history.
//!
//! # Architecture
//!
//! - [`template`]: the immutable template definition and its validation
//! - [`variables`]: the variable mapping passed to a render
//! - [`engine`]: the [`PromptRenderer`] trait and the [`PromptEngine`]
//! - [`chain`]: sequential chains feeding one step's output into the next
//! - [`history`]: the append-only render log
//! - [`config`]: TOML configuration for the engine
//! - [`error`]: error types and result alias
//!
//! # Example
//!
//! ```
//! use promptsmith_core::{PromptEngine, TemplateDefinition, variables};
//!
//! let engine = PromptEngine::new();
//! let extract = TemplateDefinition::new(
//!     "extract_key_points",
//!     "Extract key points from text",
//!     "Extract 3 key points from: {{ text }}",
//!     ["text"],
//! )?;
//! let summarize = TemplateDefinition::new(
//!     "summarize_points",
//!     "Summarize the key points",
//!     "Summarize these points into one sentence: {{ output }}",
//!     ["output"],
//! )?;
//!
//! let prompt = engine.chain(&[extract, summarize], &variables([("text", "Rust is fast.")]))?;
//! assert_eq!(
//!     prompt,
//!     "Summarize these points into one sentence: Extract 3 key points from: Rust is fast."
//! );
//! assert_eq!(engine.render_history().len(), 2);
//! # Ok::<(), promptsmith_core::PromptError>(())
//! ```

pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod template;
pub mod variables;

// Re-export core types for convenience
pub use chain::{ChainExecutor, chain_prompts};
pub use config::{
    ChainConfig, DEFAULT_OUTPUT_KEY, EngineConfig, RenderConfig, UndefinedPolicy, VariablePolicy,
};
pub use engine::{PromptEngine, PromptRenderer};
pub use error::{ErrorKind, PromptError, Result};
pub use history::{HistoryStore, RenderRecord};
pub use template::{Example, Metadata, TemplateDefinition};
pub use variables::{Variables, variables};
