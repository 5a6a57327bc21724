//! Form answers - the payload of one form submission

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

/// Separator used when a multi-valued answer is rendered as text
pub const MULTI_VALUE_DELIMITER: &str = ", ";

/// Field id used when free text is submitted in place of a form
pub const FREE_TEXT_FIELD: &str = "message";

/// The value given for one field
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Everything except multi-select yields a single text token
    Text(String),
    /// Multi-select yields the chosen options in the order they were picked
    Many(Vec<String>),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Many(values.into_iter().map(Into::into).collect())
    }

    /// True when the value carries no information
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::Many(v) => v.is_empty(),
        }
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerValue::Text(s) => write!(f, "{}", s),
            AnswerValue::Many(v) => write!(f, "{}", v.join(MULTI_VALUE_DELIMITER)),
        }
    }
}

/// Answers to one form, keyed by field id, in the order they were given.
///
/// Optional fields that were skipped are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormAnswers {
    entries: Vec<(String, AnswerValue)>,
}

impl FormAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// A free-text reply, treated as a single-field submission
    pub fn free_text(text: impl Into<String>) -> Self {
        debug!("FormAnswers::free_text: called");
        let mut answers = Self::new();
        answers.insert(FREE_TEXT_FIELD, AnswerValue::Text(text.into()));
        answers
    }

    /// Set the answer for a field; re-answering keeps the original position
    pub fn insert(&mut self, id: impl Into<String>, value: AnswerValue) {
        let id = id.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((id, value)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as the content of a user turn: one `id: value` line per answer
    pub fn to_turn_content(&self) -> String {
        debug!(answer_count = self.entries.len(), "FormAnswers::to_turn_content: called");
        self.entries
            .iter()
            .map(|(id, value)| format!("{}: {}", id, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// JSON object form, as sent to the language model
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Serialize for FormAnswers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
