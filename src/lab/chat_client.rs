use crate::{
    classify,
    error::{ErrorKind, GeneLabError, ProviderError, Result},
    logger,
    models::{ChatRequest, ChatResponse, ChatTurn, SeededTurn, TurnRole},
    prompt::OrganismProfile,
    providers::ChatProvider,
};
use std::sync::Arc;

const QUOTA_EXHAUSTED_MESSAGE: &str = "All models exhausted their quota";

#[derive(Clone)]
pub struct ChatClient {
    provider: Arc<dyn ChatProvider>,
    models: Vec<String>,
    profile: OrganismProfile,
}

impl ChatClient {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        models: Vec<String>,
        profile: OrganismProfile,
    ) -> Self {
        Self {
            provider,
            models,
            profile,
        }
    }

    /// Persona instruction, canned acknowledgment, then the caller's turns.
    pub fn seed_history(&self, history: &[ChatTurn]) -> Vec<SeededTurn> {
        let mut seeded = Vec::with_capacity(history.len() + 2);
        seeded.push(SeededTurn::new(
            TurnRole::User,
            self.profile.chat_system_instruction(),
        ));
        seeded.push(SeededTurn::new(
            TurnRole::Model,
            self.profile.chat_acknowledgment(),
        ));
        seeded.extend(
            history
                .iter()
                .map(|turn| SeededTurn::new(turn.role.into(), turn.content.clone())),
        );
        seeded
    }

    /// Answer `request.message`, walking the model list in priority order.
    ///
    /// Quota failures move on to the next model; any other failure stops the walk.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(GeneLabError::invalid_input("Message is required"));
        }

        if !self.provider.is_configured() {
            return Err(GeneLabError::configuration("Gemini API key not configured"));
        }

        let history = self.seed_history(&request.history);
        let mut last_error: Option<ProviderError> = None;

        for model in &self.models {
            log::info!("💬 Sending chat message to {}", model);
            let timer = logger::timer(&format!("chat via {}", model));
            let outcome = self.provider.send(model, &history, message).await;
            timer.stop();

            match outcome {
                Ok(reply) => return Ok(ChatResponse {
                    success: true,
                    reply,
                }),
                Err(err) if classify::is_quota_error(&err.to_string()) => {
                    log::warn!("⚠️  {} is out of quota, trying next model: {}", model, err);
                    last_error = Some(err);
                }
                Err(err) => {
                    log::error!("❌ Chat with {} failed: {}", model, err);
                    return Err(chat_failure(ErrorKind::ProviderError, &err));
                }
            }
        }

        Err(match last_error {
            Some(err) => chat_failure(ErrorKind::QuotaExhausted, &err),
            None => GeneLabError::new(ErrorKind::QuotaExhausted, QUOTA_EXHAUSTED_MESSAGE),
        })
    }
}

fn chat_failure(kind: ErrorKind, err: &ProviderError) -> GeneLabError {
    let kind = match err {
        ProviderError::Transport(_) => ErrorKind::InternalError,
        _ => kind,
    };
    GeneLabError::new(kind, err.to_string()).with_status(500)
}
