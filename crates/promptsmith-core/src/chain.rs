//! Sequential prompt chains.
//!
//! A chain renders templates one after another. Each step's output is stored
//! in the working variables under the output key before the next step runs,
//! so later templates can reference earlier results.

use crate::config::DEFAULT_OUTPUT_KEY;
use crate::engine::PromptRenderer;
use crate::error::{PromptError, Result};
use crate::template::TemplateDefinition;
use crate::variables::Variables;
use serde_json::Value;
use std::borrow::Borrow;

/// Runs a sequence of templates through a [`PromptRenderer`].
///
/// The first failing step aborts the chain. Steps that already succeeded
/// stay in the renderer's history.
///
/// # Examples
///
/// ```
/// use promptsmith_core::{ChainExecutor, PromptEngine, TemplateDefinition, variables};
///
/// let engine = PromptEngine::new();
/// let first = TemplateDefinition::new("k1", "first", "K1: {{ x }}", ["x"])?;
/// let second = TemplateDefinition::new("k2", "second", "K2: {{ output }}", ["output"])?;
///
/// let result = ChainExecutor::new(&engine).run(&[first, second], &variables([("x", "v")]))?;
/// assert_eq!(result, "K2: K1: v");
/// # Ok::<(), promptsmith_core::PromptError>(())
/// ```
#[derive(Debug)]
pub struct ChainExecutor<'r, R: ?Sized> {
    renderer: &'r R,
    output_key: String,
}

impl<'r, R: PromptRenderer + ?Sized> ChainExecutor<'r, R> {
    /// Creates an executor that stores step output under `"output"`.
    pub fn new(renderer: &'r R) -> Self {
        Self {
            renderer,
            output_key: DEFAULT_OUTPUT_KEY.to_string(),
        }
    }

    /// Sets the variable name step output is stored under.
    #[must_use]
    pub fn with_output_key(mut self, output_key: impl Into<String>) -> Self {
        self.output_key = output_key.into();
        self
    }

    /// The variable name step output is stored under.
    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    /// Renders `templates` in order and returns the last step's output.
    ///
    /// The working variables start as a copy of `initial_variables`; the
    /// caller's mapping is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::EmptyChain`] if `templates` is empty. A failing
    /// step's error is returned wrapped in [`PromptError::Chain`] with the
    /// step index and template name.
    pub fn run<T: Borrow<TemplateDefinition>>(
        &self,
        templates: &[T],
        initial_variables: &Variables,
    ) -> Result<String> {
        if templates.is_empty() {
            return Err(PromptError::EmptyChain);
        }

        let mut working = initial_variables.clone();
        let mut output = String::new();

        for (step, template) in templates.iter().enumerate() {
            let template = template.borrow();
            tracing::debug!(step, template = template.name(), "rendering chain step");

            output = self
                .renderer
                .render(template, &working)
                .map_err(|source| PromptError::Chain {
                    step,
                    template: template.name().to_string(),
                    source: Box::new(source),
                })?;

            working.insert(self.output_key.clone(), Value::String(output.clone()));
        }

        Ok(output)
    }
}

/// Renders `templates` through `renderer`, threading each result into the
/// next step under `output_key`.
///
/// # Errors
///
/// See [`ChainExecutor::run`].
pub fn chain_prompts<R, T>(
    renderer: &R,
    templates: &[T],
    initial_variables: &Variables,
    output_key: &str,
) -> Result<String>
where
    R: PromptRenderer + ?Sized,
    T: Borrow<TemplateDefinition>,
{
    ChainExecutor::new(renderer)
        .with_output_key(output_key)
        .run(templates, initial_variables)
}
