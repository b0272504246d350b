use crate::{
    classify,
    config::HuggingFaceConfig,
    data_uri,
    error::{ErrorKind, GeneLabError, ProviderError, Result},
    logger,
    models::{DiffusionParameters, DiffusionPayload, ImageGenerationRequest, ImageGenerationResponse},
    prompt::OrganismProfile,
    providers::ImageProvider,
};
use std::sync::Arc;

const PROMPT_LOG_PREVIEW: usize = 200;

#[derive(Clone)]
pub struct ImageClient {
    provider: Arc<dyn ImageProvider>,
    profile: OrganismProfile,
    num_inference_steps: u32,
    guidance_scale: f32,
}

impl ImageClient {
    pub fn new(provider: Arc<dyn ImageProvider>, profile: OrganismProfile) -> Self {
        let defaults = HuggingFaceConfig::default();
        Self {
            provider,
            profile,
            num_inference_steps: defaults.num_inference_steps,
            guidance_scale: defaults.guidance_scale,
        }
    }

    pub fn with_sampling(mut self, num_inference_steps: u32, guidance_scale: f32) -> Self {
        self.num_inference_steps = num_inference_steps;
        self.guidance_scale = guidance_scale;
        self
    }

    pub fn build_payload(&self, prompt: &str) -> DiffusionPayload {
        DiffusionPayload {
            inputs: self.profile.enhance(prompt),
            parameters: DiffusionParameters {
                num_inference_steps: self.num_inference_steps,
                guidance_scale: self.guidance_scale,
                negative_prompt: self.profile.negative_prompt(),
            },
        }
    }

    /// Generate a phenotype image and return it as a PNG data URI.
    ///
    /// Upstream failures are never retried here; the envelope's `fallback`
    /// flag tells the caller it can carry on without the image.
    pub async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let prompt = request.prompt.as_str();
        if prompt.trim().is_empty() {
            return Err(GeneLabError::invalid_input("Prompt is required"));
        }

        if !self.provider.is_configured() {
            return Err(GeneLabError::configuration(
                "Hugging Face API token not configured",
            ));
        }

        log::info!("🎨 Phenotype prompt: {}", prompt);
        let payload = self.build_payload(prompt);
        log::debug!(
            "🧬 Enhanced prompt: {}...",
            payload.inputs.chars().take(PROMPT_LOG_PREVIEW).collect::<String>()
        );

        let timer = logger::timer("image generation");
        let outcome = self.provider.generate(&payload).await;
        timer.stop();

        match outcome {
            Ok(bytes) => Ok(ImageGenerationResponse {
                success: true,
                image: data_uri::encode_png(&bytes),
            }),
            Err(err) => Err(image_failure(err)),
        }
    }
}

fn image_failure(err: ProviderError) -> GeneLabError {
    match err {
        ProviderError::Http { status, body } => {
            let kind = classify::classify_image_failure(status, &body);
            log::warn!("Image provider returned {} ({})", status, kind);
            let error = GeneLabError::new(kind, classify::user_message(kind)).with_fallback(true);
            if kind == ErrorKind::ModelLoading {
                error.with_status(503)
            } else {
                error
                    .with_status(classify::passthrough_status(status))
                    .with_details(body)
            }
        }
        ProviderError::InvalidResponse(message) | ProviderError::Transport(message) => {
            log::error!("🔥 Image generation failed: {}", message);
            GeneLabError::internal(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeImage {
        outcome: std::result::Result<Vec<u8>, ProviderError>,
        configured: bool,
        seen: Mutex<Vec<DiffusionPayload>>,
    }

    impl FakeImage {
        fn returning(outcome: std::result::Result<Vec<u8>, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                configured: true,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ImageProvider for FakeImage {
        async fn generate(
            &self,
            payload: &DiffusionPayload,
        ) -> std::result::Result<Vec<u8>, ProviderError> {
            self.seen.lock().unwrap().push(payload.clone());
            self.outcome.clone()
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    fn http(status: u16, body: &str) -> std::result::Result<Vec<u8>, ProviderError> {
        Err(ProviderError::Http {
            status,
            body: body.to_string(),
        })
    }

    fn client(provider: Arc<FakeImage>) -> ImageClient {
        ImageClient::new(provider, OrganismProfile::mouse())
    }

    #[tokio::test]
    async fn success_returns_png_data_uri() {
        let fake = FakeImage::returning(Ok(vec![0x89, b'P', b'N', b'G']));
        let response = client(fake.clone())
            .generate(ImageGenerationRequest::new("three tails"))
            .await
            .unwrap();

        assert!(response.success);
        let (mime, bytes) = data_uri::decode(&response.image).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);

        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].inputs.contains("three tails"));
        assert_eq!(seen[0].parameters.num_inference_steps, 50);
        assert_eq!(seen[0].parameters.guidance_scale, 12.0);
        assert!(seen[0].parameters.negative_prompt.contains("cartoon"));
    }

    #[tokio::test]
    async fn prompt_is_templated_verbatim() {
        let fake = FakeImage::returning(Ok(vec![1]));
        client(fake.clone())
            .generate(ImageGenerationRequest::new("  webbed paws\n"))
            .await
            .unwrap();

        let seen = fake.seen.lock().unwrap();
        assert!(seen[0].inputs.contains("\n  webbed paws\n\n"));
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_before_provider() {
        let fake = FakeImage::returning(Ok(vec![1]));
        let err = client(fake.clone())
            .generate(ImageGenerationRequest::new("   "))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "Prompt is required");
        assert!(fake.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_token_is_configuration_error() {
        let fake = Arc::new(FakeImage {
            outcome: Ok(vec![1]),
            configured: false,
            seen: Mutex::new(Vec::new()),
        });
        let err = client(fake.clone())
            .generate(ImageGenerationRequest::new("eyeless"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ConfigurationError);
        assert_eq!(err.status, 500);
        assert!(fake.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cold_start_maps_to_503() {
        let err = client(FakeImage::returning(http(503, "loading")))
            .generate(ImageGenerationRequest::new("eyeless"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ModelLoading);
        assert_eq!(err.status, 503);
        assert!(err.message.contains("10–20 seconds"));
    }

    #[tokio::test]
    async fn billing_failure_passes_status_and_details_through() {
        let err = client(FakeImage::returning(http(
            400,
            r#"{"error":"insufficient credits"}"#,
        )))
        .generate(ImageGenerationRequest::new("eyeless"))
        .await
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::CreditsDepleted);
        assert_eq!(err.status, 400);
        assert!(err.fallback);
        assert_eq!(err.details.as_deref(), Some(r#"{"error":"insufficient credits"}"#));
    }

    #[tokio::test]
    async fn rate_limit_and_generic_failures() {
        let err = client(FakeImage::returning(http(429, "slow")))
            .generate(ImageGenerationRequest::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimited);
        assert_eq!(err.status, 429);

        let err = client(FakeImage::returning(http(500, "boom")))
            .generate(ImageGenerationRequest::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProviderError);
        assert_eq!(err.message, "Image generation temporarily unavailable");
        assert_eq!(err.status, 500);
    }

    #[tokio::test]
    async fn transport_failure_is_internal_error() {
        let err = client(FakeImage::returning(Err(ProviderError::Transport(
            "connection refused".into(),
        ))))
        .generate(ImageGenerationRequest::new("x"))
        .await
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InternalError);
        assert_eq!(err.status, 500);
        assert_eq!(err.message, "connection refused");
    }
}
