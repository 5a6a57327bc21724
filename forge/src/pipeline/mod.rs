//! Generation Pipeline - PRD, then Design, then Tech
//!
//! ```text
//! turns ──► PRD ──► Design(prd) ──► Tech(prd, design) ──► ArtifactBundle
//!                                                      ▲
//!                              transcript (local) ─────┘
//! ```
//!
//! Stages run strictly in order; each later stage needs the earlier
//! documents as input. The first failure aborts the run and nothing is
//! returned except the error.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::domain::{ArtifactBundle, DocumentKind, GenerationContext, Turn, render_transcript};
use crate::gateway::{Gateway, GatewayError};

/// Progress notifications for anyone watching a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    StageStarted(DocumentKind),
    StageFinished { kind: DocumentKind, chars: usize },
}

/// A stage failed; later stages were not attempted
#[derive(Debug, Error)]
#[error("{kind} generation failed: {source}")]
pub struct PipelineError {
    pub kind: DocumentKind,
    #[source]
    pub source: GatewayError,
}

/// Runs the three generation stages through a gateway
pub struct GenerationPipeline {
    gateway: Arc<dyn Gateway>,
    events: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl GenerationPipeline {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway, events: None }
    }

    /// Report stage progress on this channel
    pub fn with_events(mut self, events: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            // Nobody listening is fine
            let _ = tx.send(event);
        }
    }

    /// Produce the full bundle from the interview turns.
    ///
    /// Stage progress goes to the events channel, if one is attached.
    pub async fn run(&self, turns: &[Turn]) -> Result<ArtifactBundle, PipelineError> {
        info!(turn_count = turns.len(), mode = %self.gateway.mode(), "Starting document generation");

        let context = GenerationContext::default();
        let prd = self.stage(turns, DocumentKind::Prd, &context).await?;

        let context = context.with_prd(prd.clone());
        let design = self.stage(turns, DocumentKind::Design, &context).await?;

        let context = context.with_design(design.clone());
        let tech = self.stage(turns, DocumentKind::Tech, &context).await?;

        let transcript = render_transcript(turns);
        info!("Document generation complete");
        Ok(ArtifactBundle::new(prd, design, tech, transcript))
    }

    async fn stage(
        &self,
        turns: &[Turn],
        kind: DocumentKind,
        context: &GenerationContext,
    ) -> Result<String, PipelineError> {
        debug!(%kind, has_prd = context.prd.is_some(), has_design = context.design.is_some(), "stage: called");
        self.emit(PipelineEvent::StageStarted(kind));

        match self.gateway.generate_section(turns, kind, context).await {
            Ok(text) => {
                self.emit(PipelineEvent::StageFinished { kind, chars: text.len() });
                Ok(text)
            }
            Err(source) => {
                error!(%kind, error = %source, "Generation stage failed; aborting run");
                Err(PipelineError { kind, source })
            }
        }
    }
}
