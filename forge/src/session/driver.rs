//! InterviewDriver - advances a Session one external trigger at a time

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::Session;
use crate::config::GatewayMode;
use crate::domain::{DocumentKind, FormAnswers, InterviewTurnResult, Turn};
use crate::gateway::{Gateway, GatewayError};
use crate::pipeline::{GenerationPipeline, PipelineError, PipelineEvent};

/// Why a step did not advance the session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("interview already complete")]
    AlreadyFinished,

    #[error("missing required answers: {}", .0.join(", "))]
    MissingAnswers(Vec<String>),

    #[error("nothing was submitted")]
    EmptySubmission,

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

impl SessionError {
    /// The generation stage that failed, for pipeline failures
    pub fn failed_stage(&self) -> Option<DocumentKind> {
        match self {
            SessionError::Pipeline(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Text safe to show the user; internal detail stays in the log
    pub fn user_message(&self) -> String {
        match self {
            SessionError::AlreadyFinished => {
                "The interview is already complete. Start over to begin a new one.".to_string()
            }
            SessionError::MissingAnswers(labels) => {
                format!("Please answer the required question(s): {}", labels.join(", "))
            }
            SessionError::EmptySubmission => "Please type a message first.".to_string(),
            SessionError::Gateway(_) => "Sorry, I encountered an error. Please try again.".to_string(),
            SessionError::Pipeline(_) => "Sorry, I failed to generate the documents. Please try again.".to_string(),
        }
    }
}

/// Result of one driver step
#[derive(Debug)]
pub enum StepOutcome {
    /// The step went through; this is the new session
    Advanced(Session),
    /// The step failed; `session` is exactly the one passed in.
    /// `failed_stage` names the document whose generation failed, if any.
    Failed {
        session: Session,
        message: String,
        failed_stage: Option<DocumentKind>,
    },
}

impl StepOutcome {
    pub fn session(&self) -> &Session {
        match self {
            StepOutcome::Advanced(session) => session,
            StepOutcome::Failed { session, .. } => session,
        }
    }

    pub fn into_session(self) -> Session {
        match self {
            StepOutcome::Advanced(session) => session,
            StepOutcome::Failed { session, .. } => session,
        }
    }

    /// The user-facing failure message, if the step failed
    pub fn failure(&self) -> Option<&str> {
        match self {
            StepOutcome::Advanced(_) => None,
            StepOutcome::Failed { message, .. } => Some(message),
        }
    }

    /// The generation stage that aborted the pipeline, if that is why the step failed
    pub fn failed_stage(&self) -> Option<DocumentKind> {
        match self {
            StepOutcome::Advanced(_) => None,
            StepOutcome::Failed { failed_stage, .. } => *failed_stage,
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, StepOutcome::Advanced(_))
    }
}

/// Drives the interview and, on completion, the generation pipeline.
///
/// Holds no session state of its own; one driver can serve any number of
/// sessions as long as each session has at most one step in flight.
pub struct InterviewDriver {
    gateway: Arc<dyn Gateway>,
    pipeline: GenerationPipeline,
}

impl InterviewDriver {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let pipeline = GenerationPipeline::new(gateway.clone());
        Self { gateway, pipeline }
    }

    /// Forward pipeline progress to this channel
    pub fn with_events(self, events: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        Self {
            gateway: self.gateway,
            pipeline: self.pipeline.with_events(events),
        }
    }

    pub fn mode(&self) -> GatewayMode {
        self.gateway.mode()
    }

    /// First entry: ask the opening question of an empty session
    pub async fn start(&self, session: Session) -> StepOutcome {
        debug!(session_id = %session.id(), turns = session.turns().len(), "start: called");
        if !session.turns().is_empty() {
            debug!("start: session already started");
            return StepOutcome::Advanced(session);
        }
        let backup = session.clone();
        let result = match self.gateway.next_turn(&[], None).await {
            Ok(result) => result.normalized(),
            Err(e) => return fail(backup, e.into()),
        };
        match self.apply(session, result).await {
            Ok(session) => StepOutcome::Advanced(session),
            Err(e) => fail(backup, e),
        }
    }

    /// Submit answers to the pending form
    pub async fn submit(&self, session: Session, answers: FormAnswers) -> StepOutcome {
        debug!(session_id = %session.id(), fields = answers.len(), "submit: called");
        if let Err(e) = check_submission(&session, &answers) {
            return fail(session, e);
        }
        if let Some(form) = session.pending_form() {
            let missing = form.missing_required(&answers);
            if !missing.is_empty() {
                return fail(session, SessionError::MissingAnswers(missing));
            }
        }
        self.advance(session, answers).await
    }

    /// Free-text fallback; treated as a one-field form and clears any pending form
    pub async fn submit_text(&self, session: Session, text: &str) -> StepOutcome {
        debug!(session_id = %session.id(), len = text.len(), "submit_text: called");
        let text = text.trim();
        if text.is_empty() {
            return fail(session, SessionError::EmptySubmission);
        }
        let answers = FormAnswers::free_text(text);
        if let Err(e) = check_submission(&session, &answers) {
            return fail(session, e);
        }
        self.advance(session, answers).await
    }

    /// Discard the session and start a fresh one
    pub async fn reset(&self, session: Session) -> StepOutcome {
        info!(session_id = %session.id(), "Resetting session");
        self.start(Session::new()).await
    }

    async fn advance(&self, session: Session, answers: FormAnswers) -> StepOutcome {
        let backup = session.clone();
        match self.try_advance(session, &answers).await {
            Ok(session) => StepOutcome::Advanced(session),
            Err(e) => fail(backup, e),
        }
    }

    async fn try_advance(&self, mut session: Session, answers: &FormAnswers) -> Result<Session, SessionError> {
        session.push_turn(Turn::user(answers.to_turn_content()));
        session.set_pending_form(None);

        let result = self.gateway.next_turn(session.turns(), Some(answers)).await?.normalized();
        self.apply(session, result).await
    }

    /// Record the interviewer's move; on completion run the pipeline
    async fn apply(&self, mut session: Session, result: InterviewTurnResult) -> Result<Session, SessionError> {
        debug!(complete = result.complete, has_form = result.form.is_some(), "apply: called");
        if !result.message.trim().is_empty() {
            session.push_turn(Turn::assistant(result.message));
        }

        if !result.complete {
            session.set_pending_form(result.form);
            return Ok(session);
        }

        info!(session_id = %session.id(), turns = session.turns().len(), "Interview complete; generating documents");
        let turns = session.turns().to_vec();
        let bundle = self.pipeline.run(&turns).await?;
        session.set_artifacts(bundle);
        Ok(session)
    }
}

fn check_submission(session: &Session, answers: &FormAnswers) -> Result<(), SessionError> {
    if session.is_finished() {
        return Err(SessionError::AlreadyFinished);
    }
    if answers.is_empty() {
        return Err(SessionError::EmptySubmission);
    }
    Ok(())
}

fn fail(session: Session, err: SessionError) -> StepOutcome {
    match &err {
        SessionError::Gateway(_) | SessionError::Pipeline(_) => {
            error!(session_id = %session.id(), error = %err, "Step failed; session left unchanged");
        }
        _ => warn!(session_id = %session.id(), error = %err, "Submission rejected"),
    }
    StepOutcome::Failed {
        message: err.user_message(),
        failed_stage: err.failed_stage(),
        session,
    }
}
