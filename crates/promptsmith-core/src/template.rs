//! Template definitions.
//!
//! A [`TemplateDefinition`] is the immutable description of one prompt
//! template: its name, a human description, the Jinja-compatible body and the
//! list of variables a caller must supply to render it.

use crate::error::{PromptError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum length of a template name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a template description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// A few-shot example attached to a template. Stored verbatim.
pub type Example = BTreeMap<String, Value>;

/// Open-ended metadata attached to a template. Never read by the renderer.
pub type Metadata = BTreeMap<String, Value>;

/// Immutable description of a prompt template.
///
/// All fields are validated on construction, whether the definition is built
/// in code or deserialized from a file, so a value of this type always has a
/// non-blank name, description and body, and a duplicate-free list of input
/// variables.
///
/// # Examples
///
/// ```
/// use promptsmith_core::TemplateDefinition;
///
/// let qa = TemplateDefinition::new(
///     "qa",
///     "Answer a question directly",
///     "Answer: {{ question }}",
///     ["question"],
/// )?;
/// assert_eq!(qa.name(), "qa");
/// assert_eq!(qa.input_variables(), ["question"]);
/// # Ok::<(), promptsmith_core::PromptError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTemplateDefinition")]
pub struct TemplateDefinition {
    name: String,
    description: String,
    template: String,
    input_variables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    examples: Option<Vec<Example>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

/// Unvalidated shape of a template file.
#[derive(Deserialize)]
struct RawTemplateDefinition {
    name: String,
    description: String,
    template: String,
    #[serde(default)]
    input_variables: Vec<String>,
    #[serde(default)]
    examples: Option<Vec<Example>>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

impl TryFrom<RawTemplateDefinition> for TemplateDefinition {
    type Error = PromptError;

    fn try_from(raw: RawTemplateDefinition) -> Result<Self> {
        Ok(TemplateDefinition::new(
            raw.name,
            raw.description,
            raw.template,
            raw.input_variables,
        )?
        .with_examples_opt(raw.examples)
        .with_metadata_opt(raw.metadata))
    }
}

impl TemplateDefinition {
    /// Creates a validated template definition without examples or metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidDefinition`] if the name, description or
    /// body is blank or too long, if an input variable name is blank, or if
    /// an input variable is declared twice.
    pub fn new<I, S>(
        name: impl Into<String>,
        description: impl Into<String>,
        template: impl Into<String>,
        input_variables: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let definition = Self {
            name: name.into(),
            description: description.into(),
            template: template.into(),
            input_variables: input_variables.into_iter().map(Into::into).collect(),
            examples: None,
            metadata: None,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Attaches few-shot examples.
    #[must_use]
    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = Some(examples);
        self
    }

    /// Attaches opaque metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn with_examples_opt(mut self, examples: Option<Vec<Example>>) -> Self {
        self.examples = examples;
        self
    }

    fn with_metadata_opt(mut self, metadata: Option<Metadata>) -> Self {
        self.metadata = metadata;
        self
    }

    fn validate(&self) -> Result<()> {
        self.check_text("name", &self.name, Some(MAX_NAME_LEN))?;
        self.check_text("description", &self.description, Some(MAX_DESCRIPTION_LEN))?;
        self.check_text("template", &self.template, None)?;

        let mut seen = BTreeSet::new();
        for var in &self.input_variables {
            if var.trim().is_empty() {
                return Err(self.invalid("input_variables", "contains a blank variable name"));
            }
            if !seen.insert(var.as_str()) {
                return Err(self.invalid(
                    "input_variables",
                    format!("declares '{var}' more than once"),
                ));
            }
        }
        Ok(())
    }

    fn check_text(&self, field: &'static str, value: &str, max_len: Option<usize>) -> Result<()> {
        if value.trim().is_empty() {
            return Err(self.invalid(field, "must not be blank"));
        }
        if let Some(max) = max_len
            && value.chars().count() > max
        {
            return Err(self.invalid(field, format!("must be at most {max} characters")));
        }
        Ok(())
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> PromptError {
        PromptError::InvalidDefinition {
            name: self.name.clone(),
            field,
            reason: reason.into(),
        }
    }

    /// Unique name of the template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Informational description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Template body in Jinja syntax.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Names of the variables a caller must supply, in declaration order.
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Few-shot examples, if any.
    pub fn examples(&self) -> Option<&[Example]> {
        self.examples.as_deref()
    }

    /// Opaque metadata, if any.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Serializes the definition as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidDefinition`] if a metadata or example
    /// value cannot be represented as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| self.invalid("metadata", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn qa() -> TemplateDefinition {
        TemplateDefinition::new("qa", "Answer questions", "Answer: {{ question }}", ["question"])
            .expect("valid definition")
    }

    #[test]
    fn test_new_accepts_valid_definition() {
        let t = qa();
        assert_eq!(t.name(), "qa");
        assert_eq!(t.description(), "Answer questions");
        assert_eq!(t.template(), "Answer: {{ question }}");
        assert_eq!(t.input_variables(), ["question"]);
        assert!(t.examples().is_none());
        assert!(t.metadata().is_none());
    }

    #[test]
    fn test_new_accepts_empty_input_variables() {
        let t = TemplateDefinition::new("static", "No inputs", "Hello", Vec::<String>::new());
        assert!(t.is_ok());
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        let err = TemplateDefinition::new("  ", "desc", "body", ["x"]).unwrap_err();
        assert!(matches!(err, PromptError::InvalidDefinition { field: "name", .. }));

        let err = TemplateDefinition::new("t", "", "body", ["x"]).unwrap_err();
        assert!(matches!(err, PromptError::InvalidDefinition { field: "description", .. }));

        let err = TemplateDefinition::new("t", "desc", "\n\t", ["x"]).unwrap_err();
        assert!(matches!(err, PromptError::InvalidDefinition { field: "template", .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_new_rejects_overlong_name() {
        let name = "n".repeat(MAX_NAME_LEN + 1);
        let err = TemplateDefinition::new(name, "desc", "body", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, PromptError::InvalidDefinition { field: "name", .. }));
    }

    #[test]
    fn test_new_rejects_duplicate_input_variables() {
        let err = TemplateDefinition::new("dup", "desc", "{{ a }}", ["a", "b", "a"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid template definition 'dup': input_variables declares 'a' more than once"
        );
    }

    #[test]
    fn test_builders_attach_examples_and_metadata() {
        let example: Example = [("text".to_string(), json!("I loved it"))].into_iter().collect();
        let metadata: Metadata = [("version".to_string(), json!(2))].into_iter().collect();

        let t = qa()
            .with_examples(vec![example.clone()])
            .with_metadata(metadata.clone());

        assert_eq!(t.examples(), Some(&[example][..]));
        assert_eq!(t.metadata(), Some(&metadata));
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let ok: TemplateDefinition = serde_json::from_value(json!({
            "name": "qa",
            "description": "Answer questions",
            "template": "Answer: {{ question }}",
            "input_variables": ["question"]
        }))
        .expect("valid json");
        assert_eq!(ok, qa());

        let bad = serde_json::from_value::<TemplateDefinition>(json!({
            "name": "",
            "description": "d",
            "template": "t"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_deserialize_defaults_input_variables_to_empty() {
        let t: TemplateDefinition = serde_json::from_value(json!({
            "name": "static",
            "description": "d",
            "template": "Hello"
        }))
        .expect("valid json");
        assert!(t.input_variables().is_empty());
    }

    #[test]
    fn test_to_json_omits_absent_optional_fields() {
        let json: Value = serde_json::from_str(&qa().to_json().unwrap()).unwrap();
        assert_eq!(json["name"], "qa");
        assert!(json.get("examples").is_none());
        assert!(json.get("metadata").is_none());
    }
}
