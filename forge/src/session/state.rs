//! Session value: turn log, pending form, bundle

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ArtifactBundle, FormSpec, Role, Turn};

/// One user's pass through the interview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    turns: Vec<Turn>,
    pending_form: Option<FormSpec>,
    artifacts: Option<ArtifactBundle>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            created_at: Utc::now(),
            turns: Vec::new(),
            pending_form: None,
            artifacts: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn pending_form(&self) -> Option<&FormSpec> {
        self.pending_form.as_ref()
    }

    pub fn artifacts(&self) -> Option<&ArtifactBundle> {
        self.artifacts.as_ref()
    }

    /// A bundle exists; the interview is read-only until reset
    pub fn is_finished(&self) -> bool {
        self.artifacts.is_some()
    }

    /// The first thing the user said, usually the idea itself
    pub fn first_user_message(&self) -> Option<&str> {
        self.turns.iter().find(|t| t.role() == Role::User).map(|t| t.content())
    }

    pub(crate) fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub(crate) fn set_pending_form(&mut self, form: Option<FormSpec>) {
        self.pending_form = form;
    }

    pub(crate) fn set_artifacts(&mut self, bundle: ArtifactBundle) {
        self.pending_form = None;
        self.artifacts = Some(bundle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.turns().is_empty());
        assert!(session.pending_form().is_none());
        assert!(!session.is_finished());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(Session::new().id(), Session::new().id());
    }

    #[test]
    fn test_first_user_message_skips_assistant() {
        let mut session = Session::new();
        assert!(session.first_user_message().is_none());
        session.push_turn(Turn::assistant("hello"));
        session.push_turn(Turn::user("idea: a kiosk"));
        session.push_turn(Turn::user("second"));
        assert_eq!(session.first_user_message(), Some("idea: a kiosk"));
    }

    #[test]
    fn test_set_artifacts_clears_pending_form() {
        let mut session = Session::new();
        session.set_pending_form(crate::interview::Stage::Spark.turn_result().form);
        session.set_artifacts(ArtifactBundle::new("p".into(), "d".into(), "t".into(), "x".into()));
        assert!(session.is_finished());
        assert!(session.pending_form().is_none());
    }
}
