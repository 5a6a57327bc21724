//! LiveGateway - interview and generation backed by a hosted model

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{Gateway, GatewayError};
use crate::config::GatewayMode;
use crate::domain::{DocumentKind, FormAnswers, GenerationContext, InterviewTurnResult, Role, Turn};
use crate::interview::{Stage, parse_turn_result};
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message};
use crate::prompts::PromptLoader;

/// Interview turns are short JSON objects
const INTERVIEW_MAX_TOKENS: u32 = 4096;

pub struct LiveGateway {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl LiveGateway {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        debug!(%max_tokens, "LiveGateway::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    fn to_messages(turns: &[Turn]) -> Vec<Message> {
        turns
            .iter()
            .map(|turn| match turn.role() {
                Role::User => Message::user(turn.content()),
                Role::Assistant => Message::assistant(turn.content()),
            })
            .collect()
    }

    /// One model call; failures are logged with whatever the provider told us
    async fn call(&self, request: CompletionRequest) -> Result<CompletionResponse, GatewayError> {
        self.llm.complete(request).await.map_err(|e: LlmError| {
            warn!(
                status = ?e.status(),
                rate_limited = e.is_rate_limit(),
                error = %e,
                "Language model call failed"
            );
            GatewayError::Llm(e)
        })
    }

    fn prompt_error(e: eyre::Report) -> GatewayError {
        GatewayError::Prompt(e.to_string())
    }
}

#[async_trait]
impl Gateway for LiveGateway {
    async fn next_turn(
        &self,
        turns: &[Turn],
        answers: Option<&FormAnswers>,
    ) -> Result<InterviewTurnResult, GatewayError> {
        debug!(turn_count = turns.len(), has_answers = answers.is_some(), "LiveGateway::next_turn: called");

        // The opening question never varies; no need to ask the model for it
        if turns.is_empty() {
            debug!("LiveGateway::next_turn: empty log, using canned opening");
            return Ok(Stage::Spark.turn_result());
        }

        let mut messages = Self::to_messages(turns);
        if let Some(answers) = answers {
            messages.push(Message::user(format!("User submitted form data: {}", answers.to_json())));
        }

        let request = CompletionRequest {
            system_prompt: self.prompts.interview_prompt().map_err(Self::prompt_error)?,
            messages,
            max_tokens: INTERVIEW_MAX_TOKENS.min(self.max_tokens),
            json_mode: true,
        };

        let response = self.call(request).await?;
        let raw = response.content.filter(|c| !c.trim().is_empty()).ok_or(GatewayError::EmptyResponse)?;

        let result = parse_turn_result(&raw)?.normalized();
        if let Some(form) = &result.form {
            form.validate()?;
        }

        info!(
            complete = result.complete,
            has_form = result.form.is_some(),
            tokens = response.usage.total(),
            "Interview turn received"
        );
        Ok(result)
    }

    async fn generate_section(
        &self,
        turns: &[Turn],
        kind: DocumentKind,
        context: &GenerationContext,
    ) -> Result<String, GatewayError> {
        debug!(turn_count = turns.len(), %kind, "LiveGateway::generate_section: called");

        let instruction = self.prompts.section_prompt(kind, context).map_err(Self::prompt_error)?;
        let mut messages = vec![Message::user(instruction)];
        messages.extend(Self::to_messages(turns));

        let request = CompletionRequest {
            system_prompt: self.prompts.generation_prompt().map_err(Self::prompt_error)?,
            messages,
            max_tokens: self.max_tokens,
            json_mode: false,
        };

        let response = self.call(request).await?;
        let content = response.content.filter(|c| !c.trim().is_empty()).ok_or(GatewayError::EmptyResponse)?;

        info!(%kind, chars = content.len(), tokens = response.usage.total(), "Document generated");
        Ok(content)
    }

    fn mode(&self) -> GatewayMode {
        GatewayMode::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnswerValue;
    use crate::interview::ExtractError;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;

    fn gateway(client: Arc<MockLlmClient>) -> LiveGateway {
        LiveGateway::new(client, PromptLoader::embedded_only(), 16384)
    }

    fn some_turns() -> Vec<Turn> {
        vec![Turn::assistant("What do you want to build?"), Turn::user("idea: pet adoption app")]
    }

    #[tokio::test]
    async fn test_empty_log_skips_model() {
        let client = Arc::new(MockLlmClient::new(vec![]));
        let result = gateway(client.clone()).next_turn(&[], None).await.unwrap();
        assert_eq!(result, Stage::Spark.turn_result());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parses_wrapped_json() {
        let raw = r#"Sure! {"thought":"need audience","message":"Who is it for?","form":{"title":"Audience","fields":[{"id":"audience","label":"Audience","type":"text","required":true}]},"isComplete":false} Hope that helps"#;
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(raw)]));
        let result = gateway(client.clone()).next_turn(&some_turns(), None).await.unwrap();

        assert_eq!(result.message, "Who is it for?");
        assert_eq!(result.reasoning.as_deref(), Some("need audience"));
        assert_eq!(result.form.unwrap().fields[0].id, "audience");

        let request = &client.requests()[0];
        assert!(request.json_mode);
        assert!(request.system_prompt.contains("isComplete"));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, crate::llm::Role::Assistant);
    }

    #[tokio::test]
    async fn test_form_answers_appended_as_user_message() {
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(
            r#"{"message":"thanks","isComplete":true}"#,
        )]));
        let mut answers = FormAnswers::new();
        answers.insert("features", AnswerValue::many(["Payments", "AI Integration"]));

        gateway(client.clone())
            .next_turn(&some_turns(), Some(&answers))
            .await
            .unwrap();

        let request = &client.requests()[0];
        let last = request.messages.last().unwrap();
        assert_eq!(last.role, crate::llm::Role::User);
        assert!(last.content.starts_with("User submitted form data: "));
        assert!(last.content.contains("AI Integration"));
    }

    #[tokio::test]
    async fn test_complete_with_form_drops_form() {
        let raw = r#"{"message":"done","form":{"fields":[{"id":"x","label":"X","type":"text"}]},"isComplete":true}"#;
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(raw)]));
        let result = gateway(client).next_turn(&some_turns(), None).await.unwrap();
        assert!(result.complete);
        assert!(result.form.is_none());
    }

    #[tokio::test]
    async fn test_no_braces_is_malformed() {
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("I'd love to help!")]));
        let err = gateway(client).next_turn(&some_turns(), None).await.unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(ExtractError::NoOpeningBrace)));
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected() {
        let raw = r#"{"message":"pick","form":{"fields":[{"id":"x","label":"X","type":"select"}]}}"#;
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(raw)]));
        let err = gateway(client).next_turn(&some_turns(), None).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidForm(_)));
    }

    #[tokio::test]
    async fn test_empty_content_is_error() {
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("   ")]));
        let err = gateway(client).next_turn(&some_turns(), None).await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_api_failure_is_llm_error() {
        let client = Arc::new(MockLlmClient::with_results(vec![Err("upstream down".to_string())]));
        let err = gateway(client).next_turn(&some_turns(), None).await.unwrap_err();
        match err {
            GatewayError::Llm(e) => {
                assert_eq!(e.status(), Some(500));
                assert!(!e.is_rate_limit());
            }
            other => panic!("expected Llm error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_section_threads_context() {
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("# Tech")]));
        let ctx = GenerationContext::default()
            .with_prd("PRD-BODY")
            .with_design("DESIGN-BODY");

        let doc = gateway(client.clone())
            .generate_section(&some_turns(), DocumentKind::Tech, &ctx)
            .await
            .unwrap();
        assert_eq!(doc, "# Tech");

        let request = &client.requests()[0];
        assert!(!request.json_mode);
        assert!(request.system_prompt.contains("MoSCoW"));
        let instruction = &request.messages[0].content;
        assert!(instruction.contains("PRD-BODY"));
        assert!(instruction.contains("DESIGN-BODY"));
        // instruction + the two transcript turns
        assert_eq!(request.messages.len(), 3);
    }
}
