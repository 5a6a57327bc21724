//! Gateway - the language model capability behind the interview
//!
//! Two operations: pick the next interview step, and write one document.
//! [`OfflineGateway`] answers from the fixed stage table; [`LiveGateway`]
//! asks a hosted model. Both return the same types so callers cannot tell
//! them apart structurally.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

mod live;
mod offline;

pub use live::LiveGateway;
pub use offline::OfflineGateway;

use crate::config::{Config, GatewayMode};
use crate::domain::{DocumentKind, FormAnswers, FormError, GenerationContext, InterviewTurnResult, Turn};
use crate::interview::ExtractError;
use crate::llm::{self, LlmError};
use crate::prompts::PromptLoader;

/// Errors from a gateway call
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("language model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("language model returned no content")]
    EmptyResponse,

    #[error("malformed interview turn: {0}")]
    Malformed(#[from] ExtractError),

    #[error("interview turn carried an invalid form: {0}")]
    InvalidForm(#[from] FormError),

    #[error("prompt unavailable: {0}")]
    Prompt(String),
}

/// The language model capability, as seen by the interview and the pipeline
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Decide the next interview step from the turns so far and the form
    /// answers just submitted (if any)
    async fn next_turn(
        &self,
        turns: &[Turn],
        answers: Option<&FormAnswers>,
    ) -> Result<InterviewTurnResult, GatewayError>;

    /// Write one document, given the transcript and the documents already
    /// produced in this run
    async fn generate_section(
        &self,
        turns: &[Turn],
        kind: DocumentKind,
        context: &GenerationContext,
    ) -> Result<String, GatewayError>;

    /// Which implementation this is, for display
    fn mode(&self) -> GatewayMode;
}

/// Build the gateway selected by the config
pub fn create_gateway(config: &Config, prompts: PromptLoader) -> Result<Arc<dyn Gateway>, GatewayError> {
    let mode = config.gateway_mode();
    debug!(%mode, "create_gateway: called");
    match mode {
        GatewayMode::Offline => {
            info!("Using offline gateway");
            Ok(Arc::new(OfflineGateway::with_latency_ms(
                config.interview.offline_latency_ms,
            )))
        }
        GatewayMode::Live => {
            info!(model = %config.llm.model, "Using live gateway");
            let client = llm::create_client(&config.llm)?;
            Ok(Arc::new(LiveGateway::new(client, prompts, config.llm.max_tokens)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_config_builds_offline_gateway() {
        let mut config = Config::default();
        config.interview.offline = true;
        let gateway = create_gateway(&config, PromptLoader::embedded_only()).unwrap();
        assert_eq!(gateway.mode(), GatewayMode::Offline);
    }

    #[test]
    fn test_error_messages() {
        let err = GatewayError::from(ExtractError::NoOpeningBrace);
        assert!(err.to_string().contains("malformed"));
        assert_eq!(GatewayError::EmptyResponse.to_string(), "language model returned no content");
    }
}
