use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImageGenerationRequest {
    #[serde(default, deserialize_with = "super::common::null_as_empty")]
    pub prompt: String,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageGenerationResponse {
    pub success: bool,
    pub image: String, // data:image/png;base64,...
}

/// Body posted to the Hugging Face inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffusionPayload {
    pub inputs: String,
    pub parameters: DiffusionParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffusionParameters {
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub negative_prompt: String,
}
