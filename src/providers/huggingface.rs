use crate::{
    config::HuggingFaceConfig,
    error::ProviderError,
    models::DiffusionPayload,
    providers::ImageProvider,
};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_token: Option<String>,
    endpoint: String,
}

impl HuggingFaceClient {
    pub fn new(config: &HuggingFaceConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &HuggingFaceConfig) -> Self {
        Self {
            client,
            api_token: config.api_token.clone(),
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl ImageProvider for HuggingFaceClient {
    async fn generate(&self, payload: &DiffusionPayload) -> Result<Vec<u8>, ProviderError> {
        let token = self.api_token.as_deref().ok_or_else(|| {
            ProviderError::Transport("Hugging Face API token not configured".into())
        })?;

        log::debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Hugging Face API error {}: {}", status, body);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        log::debug!("Received {} image bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::DiffusionParameters, providers::canned};

    fn payload() -> DiffusionPayload {
        DiffusionPayload {
            inputs: "a hairless mouse".into(),
            parameters: DiffusionParameters {
                num_inference_steps: 50,
                guidance_scale: 12.0,
                negative_prompt: "cartoon".into(),
            },
        }
    }

    fn client(base_url: &str) -> HuggingFaceClient {
        HuggingFaceClient::new(
            &HuggingFaceConfig::new()
                .with_token("hf_secret")
                .with_endpoint(format!("{}/models/sdxl", base_url)),
        )
    }

    #[tokio::test]
    async fn posts_payload_with_bearer_token_and_returns_raw_bytes() {
        let png = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
        let (base_url, request) = canned::serve_once(200, "image/png", png.clone()).await;

        let bytes = client(&base_url).generate(&payload()).await.unwrap();
        assert_eq!(bytes, png);

        let request = request.await.unwrap();
        let lowered = request.to_lowercase();
        assert!(lowered.starts_with("post /models/sdxl "));
        assert!(lowered.contains("authorization: bearer hf_secret"));
        assert!(request.contains(r#""inputs":"a hairless mouse""#));
        assert!(request.contains(r#""num_inference_steps":50"#));
        assert!(request.contains(r#""negative_prompt":"cartoon""#));
    }

    #[tokio::test]
    async fn non_success_keeps_status_and_body_text() {
        let cases = [
            (503, r#"{"error":"Model is currently loading"}"#),
            (402, "Payment Required"),
            (429, "Too Many Requests"),
        ];

        for (status, body) in cases {
            let (base_url, request) = canned::serve_once(status, "text/plain", body).await;
            let err = client(&base_url).generate(&payload()).await.unwrap_err();
            assert_eq!(
                err,
                ProviderError::Http {
                    status,
                    body: body.to_string(),
                }
            );
            request.await.unwrap();
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = client(&base_url).generate(&payload()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn missing_token_never_sends() {
        let client = HuggingFaceClient::new(&HuggingFaceConfig::new());
        assert!(!client.is_configured());
        let err = client.generate(&payload()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
