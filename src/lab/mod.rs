pub mod chat_client;
pub mod image_client;

use crate::{
    config::Config,
    providers::{ChatProvider, GeminiClient, HuggingFaceClient, ImageProvider},
};
use std::sync::Arc;

pub use chat_client::ChatClient;
pub use image_client::ImageClient;

/// Composition of the image and chat pipelines shared by every request.
#[derive(Clone)]
pub struct LabClient {
    image_client: ImageClient,
    chat_client: ChatClient,
}

impl LabClient {
    /// Wire the real Hugging Face and Gemini providers from configuration.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::new();
        let image: Arc<dyn ImageProvider> =
            Arc::new(HuggingFaceClient::with_client(http.clone(), &config.huggingface));
        let chat: Arc<dyn ChatProvider> =
            Arc::new(GeminiClient::with_client(http, &config.gemini));
        Self::with_providers(config, image, chat)
    }

    pub fn with_providers(
        config: &Config,
        image: Arc<dyn ImageProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        let profile = config.organism.profile();
        Self {
            image_client: ImageClient::new(image, profile.clone()).with_sampling(
                config.huggingface.num_inference_steps,
                config.huggingface.guidance_scale,
            ),
            chat_client: ChatClient::new(chat, config.gemini.models.clone(), profile),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn chat(&self) -> &ChatClient {
        &self.chat_client
    }
}
