//! Template loader crate for promptsmith.
//!
//! This crate reads [`TemplateDefinition`](promptsmith_core::TemplateDefinition)s
//! from YAML (`.yaml`, `.yml`) and JSON (`.json`) files and caches them by
//! name. Both serializations share one schema: `name`, `description`,
//! `template`, `input_variables`, and optional `examples` and `metadata`.
//!
//! # Examples
//!
//! ```no_run
//! use promptsmith_core::{PromptEngine, PromptRenderer, variables};
//! use promptsmith_loader::TemplateLoader;
//!
//! let mut loader = TemplateLoader::with_dir("./templates");
//! loader.load_directory(None)?;
//!
//! let engine = PromptEngine::new();
//! let qa = loader.require("zero_shot_qa")?;
//! let prompt = engine.render(qa, &variables([("question", "What is Rust?")]))?;
//! println!("{prompt}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod loader;

// Re-export public types for convenience
pub use error::{LoadError, Result};
pub use loader::{TemplateFormat, TemplateLoader, discover, read_template};
