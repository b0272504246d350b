use crate::{
    config::GeminiConfig,
    error::ProviderError,
    models::{
        GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse, SeededTurn,
        TurnRole,
    },
    providers::ChatProvider,
};
use async_trait::async_trait;
use reqwest::Client;

/// Gemini `generateContent` client. Each call replays the seeded history, so
/// no session lives between requests.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Seeded history followed by the new user message, in Gemini's vocabulary.
    pub fn build_request(history: &[SeededTurn], message: &str) -> GenerateContentRequest {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|turn| content(turn.role, &turn.text))
            .collect();
        contents.push(content(TurnRole::User, message));
        GenerateContentRequest { contents }
    }
}

fn content(role: TurnRole, text: &str) -> GeminiContent {
    let role = match role {
        TurnRole::User => "user",
        TurnRole::Model => "model",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![GeminiPart {
            text: text.to_string(),
        }],
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn send(
        &self,
        model: &str,
        history: &[SeededTurn],
        message: &str,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Transport("Gemini API key not configured".into()))?;

        let request = Self::build_request(history, message);
        log::debug!(
            "Gemini request to {} with {} turns",
            model,
            request.contents.len()
        );

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        parsed
            .text()
            .ok_or_else(|| ProviderError::InvalidResponse("Gemini returned no text".into()))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::canned;

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let client = GeminiClient::new(&GeminiConfig::new().with_base_url("http://localhost:1/v1beta/"));
        assert_eq!(
            client.endpoint("gemini-2.0-flash"),
            "http://localhost:1/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn request_appends_message_after_history() {
        let history = vec![
            SeededTurn::new(TurnRole::User, "persona"),
            SeededTurn::new(TurnRole::Model, "ack"),
        ];
        let request = GeminiClient::build_request(&history, "What is Pax6?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"].as_array().unwrap().len(), 3);
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["role"], "user");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "What is Pax6?");
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Pax6 "},{"text":"controls eyes."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Pax6 controls eyes."));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn unconfigured_without_key() {
        assert!(!GeminiClient::new(&GeminiConfig::new()).is_configured());
        assert!(GeminiClient::new(&GeminiConfig::new().with_api_key("k")).is_configured());
    }

    fn live_client(base_url: &str) -> GeminiClient {
        GeminiClient::new(
            &GeminiConfig::new()
                .with_api_key("gm_secret")
                .with_base_url(format!("{}/v1beta", base_url)),
        )
    }

    fn seeded() -> Vec<SeededTurn> {
        vec![
            SeededTurn::new(TurnRole::User, "persona"),
            SeededTurn::new(TurnRole::Model, "ack"),
        ]
    }

    #[tokio::test]
    async fn send_posts_contents_with_api_key_header() {
        let (base_url, request) = canned::serve_once(
            200,
            "application/json",
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Pax6 controls eyes."}]}}]}"#,
        )
        .await;

        let reply = live_client(&base_url)
            .send("gemini-2.0-flash", &seeded(), "What is Pax6?")
            .await
            .unwrap();
        assert_eq!(reply, "Pax6 controls eyes.");

        let request = request.await.unwrap();
        let lowered = request.to_lowercase();
        assert!(lowered.starts_with("post /v1beta/models/gemini-2.0-flash:generatecontent "));
        assert!(lowered.contains("x-goog-api-key: gm_secret"));
        assert!(request.contains(r#""text":"What is Pax6?""#));
    }

    #[tokio::test]
    async fn quota_failure_keeps_status_and_body_text() {
        let body = r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#;
        let (base_url, request) = canned::serve_once(429, "application/json", body).await;

        let err = live_client(&base_url)
            .send("gemini-2.0-flash", &seeded(), "hi")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Http {
                status: 429,
                body: body.to_string(),
            }
        );
        assert!(crate::classify::is_quota_error(&err.to_string()));
        request.await.unwrap();
    }

    #[tokio::test]
    async fn empty_candidates_is_invalid_response() {
        let (base_url, request) =
            canned::serve_once(200, "application/json", r#"{"candidates":[]}"#).await;

        let err = live_client(&base_url)
            .send("gemini-2.0-flash", &seeded(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)), "{:?}", err);
        request.await.unwrap();
    }

    #[tokio::test]
    async fn non_json_success_body_is_invalid_response() {
        let (base_url, request) = canned::serve_once(200, "text/html", "<html>").await;

        let err = live_client(&base_url)
            .send("gemini-2.0-flash", &seeded(), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)), "{:?}", err);
        request.await.unwrap();
    }
}
