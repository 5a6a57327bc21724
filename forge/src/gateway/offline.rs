//! OfflineGateway - deterministic stand-in for the hosted model

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{Gateway, GatewayError};
use crate::config::GatewayMode;
use crate::domain::{DocumentKind, FormAnswers, GenerationContext, InterviewTurnResult, Turn};
use crate::interview::Stage;

/// Answers every call from the fixed stage table and placeholder documents
#[derive(Debug, Clone, Default)]
pub struct OfflineGateway {
    latency: Duration,
}

impl OfflineGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering, to mimic a real model
    pub fn with_latency_ms(ms: u64) -> Self {
        Self {
            latency: Duration::from_millis(ms),
        }
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Placeholder document for a stage
fn placeholder_document(kind: DocumentKind) -> String {
    let body = match kind {
        DocumentKind::Prd => {
            "# Product Requirements Document\n\n\
             ## Executive Summary\nDrafted offline from the interview answers.\n\n\
             ## User Stories\n- As a user, I want to get started quickly so that I can see value immediately.\n\n\
             ## Acceptance Criteria\n- A new user can complete onboarding in under two minutes."
        }
        DocumentKind::Design => {
            "# Design Guide\n\n\
             ## Color Palette\n- Primary: #2563EB\n- Surface: #0B1120\n- Accent: #F472B6\n\n\
             ## Typography\n- Headings: Inter, semibold\n- Body: Inter, regular\n\n\
             ## Vibe\nClean, calm and confident."
        }
        DocumentKind::Tech => {
            "# Technical Specifications\n\n\
             ## Stack\n- Web frontend, HTTP API, relational database\n\n\
             ## Data Schema\n- users(id, email, created_at)\n\n\
             ## API Endpoints\n- GET /api/health\n\n\
             ## Security Considerations\n- Authenticate every request; store secrets outside the codebase."
        }
    };
    format!("{}\n\n(Generated offline, step {}/3)\n", body, kind.step())
}

#[async_trait]
impl Gateway for OfflineGateway {
    async fn next_turn(
        &self,
        turns: &[Turn],
        answers: Option<&FormAnswers>,
    ) -> Result<InterviewTurnResult, GatewayError> {
        debug!(turn_count = turns.len(), has_answers = answers.is_some(), "OfflineGateway::next_turn: called");
        self.pause().await;
        Ok(Stage::from_turn_count(turns.len()).turn_result())
    }

    async fn generate_section(
        &self,
        turns: &[Turn],
        kind: DocumentKind,
        context: &GenerationContext,
    ) -> Result<String, GatewayError> {
        debug!(turn_count = turns.len(), %kind, context_empty = context.is_empty(), "OfflineGateway::generate_section: called");
        self.pause().await;
        Ok(placeholder_document(kind))
    }

    fn mode(&self) -> GatewayMode {
        GatewayMode::Offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_next_turn_follows_stage_table() {
        let gateway = OfflineGateway::new();
        let mut turns = Vec::new();

        let first = gateway.next_turn(&turns, None).await.unwrap();
        assert_eq!(first, Stage::Spark.turn_result());

        turns.push(Turn::assistant(first.message));
        turns.push(Turn::user("idea: X"));
        let second = gateway
            .next_turn(&turns, Some(&FormAnswers::free_text("X")))
            .await
            .unwrap();
        assert_eq!(second.form.unwrap().title.as_deref(), Some("The Basics"));
    }

    #[tokio::test]
    async fn test_completion_after_seven_turns() {
        let gateway = OfflineGateway::new();
        let turns: Vec<Turn> = (0..7).map(|i| Turn::user(format!("t{}", i))).collect();
        let result = gateway.next_turn(&turns, None).await.unwrap();
        assert!(result.complete);
        assert!(result.form.is_none());
    }

    #[tokio::test]
    async fn test_documents_carry_required_sections() {
        let gateway = OfflineGateway::new();
        let ctx = GenerationContext::default();
        let prd = gateway.generate_section(&[], DocumentKind::Prd, &ctx).await.unwrap();
        assert!(prd.contains("Executive Summary"));
        assert!(prd.contains("User Stories"));
        assert!(prd.contains("Acceptance Criteria"));

        let design = gateway.generate_section(&[], DocumentKind::Design, &ctx).await.unwrap();
        assert!(design.contains("Color Palette"));
        assert!(design.contains("Typography"));
        assert!(design.contains("Vibe"));

        let tech = gateway.generate_section(&[], DocumentKind::Tech, &ctx).await.unwrap();
        for heading in ["Stack", "Data Schema", "API Endpoints", "Security Considerations"] {
            assert!(tech.contains(heading), "missing {}", heading);
        }
        assert!(tech.contains("step 3/3"));
    }

    #[test]
    fn test_mode() {
        assert_eq!(OfflineGateway::new().mode(), GatewayMode::Offline);
    }
}
