//! InterviewTurnResult - the interviewer's next move

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::FormSpec;

/// One step of the interview: a message, optionally a form, or the completion signal.
///
/// A result that is `complete` never carries a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewTurnResult {
    /// Internal reasoning, never shown to the user
    #[serde(
        default,
        rename = "thought",
        alias = "reasoning",
        skip_serializing_if = "Option::is_none"
    )]
    pub reasoning: Option<String>,

    /// Chat message for the user
    pub message: String,

    /// Next questions, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<FormSpec>,

    /// Handoff signal: the interview is over and generation should start
    #[serde(default, rename = "isComplete", alias = "complete")]
    pub complete: bool,
}

impl InterviewTurnResult {
    /// A question step
    pub fn ask(message: impl Into<String>, form: FormSpec) -> Self {
        Self {
            reasoning: None,
            message: message.into(),
            form: Some(form),
            complete: false,
        }
    }

    /// The completion handoff
    pub fn finished(message: impl Into<String>) -> Self {
        Self {
            reasoning: None,
            message: message.into(),
            form: None,
            complete: true,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Enforce complete => no form. Completion wins; the stray form is dropped.
    pub fn normalized(mut self) -> Self {
        debug!(complete = self.complete, has_form = self.form.is_some(), "InterviewTurnResult::normalized: called");
        if self.complete && self.form.is_some() {
            warn!(
                form_title = ?self.form.as_ref().and_then(|f| f.title.clone()),
                "Interview result claimed completion while carrying a form; discarding the form"
            );
            self.form = None;
        }
        self
    }
}
