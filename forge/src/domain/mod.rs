//! Domain types for the product interview
//!
//! - [`Turn`] - one chat message in the append-only interview log
//! - [`FormSpec`] / [`FieldSpec`] - structured questions shown to the user
//! - [`FormAnswers`] - a submitted form, keyed by field id
//! - [`InterviewTurnResult`] - what the interviewer says next
//! - [`ArtifactBundle`] - the generated documents, produced once per session

mod answers;
mod artifact;
mod form;
mod interview;
mod turn;

pub use answers::{AnswerValue, FREE_TEXT_FIELD, FormAnswers, MULTI_VALUE_DELIMITER};
pub use artifact::{ArtifactBundle, DocumentKind, GenerationContext, render_transcript};
pub use form::{FieldKind, FieldSpec, FormError, FormSpec};
pub use interview::InterviewTurnResult;
pub use turn::{Role, Turn};
