//! Template rendering with variable validation.

use crate::chain::ChainExecutor;
use crate::config::{DEFAULT_OUTPUT_KEY, EngineConfig, RenderConfig, VariablePolicy};
use crate::error::{PromptError, Result};
use crate::history::{HistoryStore, RenderRecord};
use crate::template::TemplateDefinition;
use crate::variables::{Variables, missing_from, undeclared_in};
use std::borrow::Borrow;

/// Trait for rendering a template definition against a variable mapping.
///
/// [`PromptEngine`] is the standard implementation. The trait is the seam
/// [`ChainExecutor`] is written against, so chains can run over any renderer.
pub trait PromptRenderer {
    /// Validates `variables` against the template's declared inputs and
    /// renders the template body.
    ///
    /// # Errors
    ///
    /// Returns a validation-class [`PromptError`] if required variables are
    /// missing (or, under a strict variable policy, undeclared variables are
    /// present), and [`PromptError::Render`] if the template language fails.
    fn render(&self, template: &TemplateDefinition, variables: &Variables) -> Result<String>;
}

/// Renders prompt templates and records every successful render.
///
/// Each engine owns its own minijinja environment and its own
/// [`HistoryStore`]; two engines never share history.
///
/// # Examples
///
/// ```
/// use promptsmith_core::{PromptEngine, PromptRenderer, TemplateDefinition, Variables, variables};
///
/// let engine = PromptEngine::new();
/// let qa = TemplateDefinition::new("qa", "Q&A", "Answer: {{ question }}", ["question"])?;
///
/// let prompt = engine.render(&qa, &variables([("question", "2+2?")]))?;
/// assert_eq!(prompt, "Answer: 2+2?");
/// assert_eq!(engine.render_history().len(), 1);
///
/// let err = engine.render(&qa, &Variables::new()).unwrap_err();
/// assert_eq!(err.to_string(), "missing required variables for template 'qa': question");
/// # Ok::<(), promptsmith_core::PromptError>(())
/// ```
#[derive(Debug)]
pub struct PromptEngine {
    /// Minijinja environment used to evaluate template bodies.
    env: minijinja::Environment<'static>,
    /// How undeclared variables are treated.
    variable_policy: VariablePolicy,
    /// Whether a declared variable bound to `null` counts as missing.
    null_is_missing: bool,
    /// Default chain output key.
    output_key: String,
    history: HistoryStore,
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptEngine {
    /// Creates an engine with default settings: semi-strict undefined handling,
    /// permissive variable policy, chain output key `"output"`.
    pub fn new() -> Self {
        Self::from_parts(&RenderConfig::default(), DEFAULT_OUTPUT_KEY)
    }

    /// Creates an engine from loaded configuration.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self::from_parts(&config.render, &config.chain.output_key)
    }

    fn from_parts(render: &RenderConfig, output_key: &str) -> Self {
        let mut env = minijinja::Environment::new();
        env.set_undefined_behavior(render.undefined.into());
        env.set_trim_blocks(render.trim_blocks);
        env.set_lstrip_blocks(render.lstrip_blocks);
        env.set_keep_trailing_newline(render.keep_trailing_newline);
        // Prompts are plain text regardless of what the template is named.
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);

        Self {
            env,
            variable_policy: render.variables,
            null_is_missing: render.null_is_missing,
            output_key: output_key.to_string(),
            history: HistoryStore::new(),
        }
    }

    /// Checks `variables` against the template's declared inputs without
    /// rendering.
    ///
    /// A declared variable is present when its key is bound, whatever the
    /// value. With `[render] null_is_missing`, a `null` binding counts as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::MissingVariables`] listing missing names in
    /// declaration order, or [`PromptError::UndeclaredVariables`] under the
    /// strict variable policy.
    pub fn validate_variables(
        &self,
        template: &TemplateDefinition,
        variables: &Variables,
    ) -> Result<()> {
        let missing = missing_from(template.input_variables(), variables, self.null_is_missing);
        if !missing.is_empty() {
            return Err(PromptError::MissingVariables {
                template: template.name().to_string(),
                missing: missing.into_iter().map(str::to_string).collect(),
            });
        }

        if self.variable_policy == VariablePolicy::Strict {
            let undeclared = undeclared_in(template.input_variables(), variables);
            if !undeclared.is_empty() {
                return Err(PromptError::UndeclaredVariables {
                    template: template.name().to_string(),
                    undeclared: undeclared.into_iter().map(str::to_string).collect(),
                });
            }
        }

        Ok(())
    }

    /// Runs `templates` in order, feeding each result to the next step under
    /// the configured output key. See [`ChainExecutor`].
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::EmptyChain`] for an empty slice, otherwise the
    /// first failing step's error wrapped in [`PromptError::Chain`].
    pub fn chain<T: Borrow<TemplateDefinition>>(
        &self,
        templates: &[T],
        initial_variables: &Variables,
    ) -> Result<String> {
        self.chain_prompts(templates, initial_variables, &self.output_key)
    }

    /// Runs `templates` in order, feeding each result to the next step under
    /// `output_key`.
    ///
    /// # Errors
    ///
    /// Same as [`PromptEngine::chain`].
    pub fn chain_prompts<T: Borrow<TemplateDefinition>>(
        &self,
        templates: &[T],
        initial_variables: &Variables,
        output_key: &str,
    ) -> Result<String> {
        ChainExecutor::new(self)
            .with_output_key(output_key)
            .run(templates, initial_variables)
    }

    /// The chain output key used by [`PromptEngine::chain`].
    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    /// The engine's render history.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Snapshot of all recorded renders, oldest first.
    pub fn render_history(&self) -> Vec<RenderRecord> {
        self.history.all()
    }

    /// Discards the render history.
    pub fn clear_history(&self) {
        self.history.clear();
    }
}

impl PromptRenderer for PromptEngine {
    fn render(&self, template: &TemplateDefinition, variables: &Variables) -> Result<String> {
        self.validate_variables(template, variables)?;

        let rendered = self
            .env
            .render_named_str(template.name(), template.template(), variables)
            .map_err(|source| PromptError::Render {
                template: template.name().to_string(),
                source,
            })?;

        tracing::debug!(template = template.name(), "rendered template");
        self.history.append(RenderRecord::new(
            template.name(),
            variables.clone(),
            rendered.clone(),
        ));
        Ok(rendered)
    }
}
