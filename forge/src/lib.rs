//! IdeaForge - conversational product interview
//!
//! A short guided interview (idea, basics, design preferences, tech
//! preferences) collects answers through chat turns and structured forms.
//! When the interview completes, a three-stage pipeline writes a PRD, a
//! design guide and a technical spec, each stage fed the documents before
//! it, plus a locally rendered transcript.
//!
//! # Modules
//!
//! - [`domain`] - turns, forms, answers, documents
//! - [`interview`] - stage table and structured-output extraction
//! - [`gateway`] - language model capability, live and offline
//! - [`pipeline`] - PRD -> Design -> Tech sequencing
//! - [`session`] - session value and the driver that advances it
//! - [`llm`] - OpenAI-compatible chat completions client
//! - [`prompts`] - handlebars prompt templates with on-disk overrides
//! - [`repl`] - terminal front end
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod interview;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use config::{Config, GatewayMode, LlmConfig};
pub use domain::{
    AnswerValue, ArtifactBundle, DocumentKind, FieldKind, FieldSpec, FormAnswers, FormSpec, GenerationContext,
    InterviewTurnResult, Role, Turn,
};
pub use gateway::{Gateway, GatewayError, LiveGateway, OfflineGateway, create_gateway};
pub use interview::{Stage, parse_turn_result};
pub use pipeline::{GenerationPipeline, PipelineError, PipelineEvent};
pub use session::{InterviewDriver, Session, SessionError, StepOutcome};
