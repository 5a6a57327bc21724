//! Form specifications - the structured questions rendered to the user

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::FormAnswers;

/// The input control a field is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Single-line free text
    #[serde(rename = "text")]
    Text,
    /// Multi-line free text
    #[serde(rename = "textarea")]
    TextArea,
    /// Pick one option from a list
    #[serde(rename = "select")]
    Select,
    /// Pick any number of options, order of selection preserved
    #[serde(rename = "multiselect")]
    MultiSelect,
    /// Pick one option, all options shown at once
    #[serde(rename = "radio")]
    Radio,
    /// Yes/no toggle
    #[serde(rename = "checkbox")]
    Checkbox,
}

impl FieldKind {
    /// Whether this kind needs a list of options to be meaningful
    pub fn needs_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::MultiSelect | FieldKind::Radio)
    }
}

/// A single question within a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Unique within the form; the key the answer is collected under
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(
        default,
        rename = "description",
        alias = "helperText",
        skip_serializing_if = "Option::is_none"
    )]
    pub helper_text: Option<String>,
}

impl FieldSpec {
    /// Create a field with no options, placeholder or helper text
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            placeholder: None,
            required: false,
            helper_text: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A set of questions collected as one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
    #[serde(default, rename = "submitLabel", skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
}

/// Structural problems with a form handed to us by the interviewer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("form has no fields")]
    NoFields,

    #[error("field with empty id (label '{0}')")]
    EmptyId(String),

    #[error("duplicate field id '{0}'")]
    DuplicateId(String),

    #[error("field '{0}' needs options for its kind")]
    MissingOptions(String),
}

impl FormSpec {
    /// Look up a field by id
    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Label shown on the submit action
    pub fn submit_label(&self) -> &str {
        self.submit_label.as_deref().unwrap_or("Continue")
    }

    /// Check the structural rules a presented form must satisfy
    pub fn validate(&self) -> Result<(), FormError> {
        debug!(field_count = self.fields.len(), "FormSpec::validate: called");
        if self.fields.is_empty() {
            return Err(FormError::NoFields);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.id.trim().is_empty() {
                return Err(FormError::EmptyId(field.label.clone()));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(FormError::DuplicateId(field.id.clone()));
            }
            if field.kind.needs_options() && field.options.is_empty() {
                return Err(FormError::MissingOptions(field.id.clone()));
            }
        }
        Ok(())
    }

    /// Labels of required fields that have no usable answer
    pub fn missing_required(&self, answers: &FormAnswers) -> Vec<String> {
        debug!("FormSpec::missing_required: called");
        self.fields
            .iter()
            .filter(|f| f.required)
            .filter(|f| answers.get(&f.id).is_none_or(|v| v.is_blank()))
            .map(|f| f.label.clone())
            .collect()
    }
}
