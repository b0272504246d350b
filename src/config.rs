use crate::prompt::Organism;
use std::env;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_HF_ENDPOINT: &str =
    "https://router.huggingface.co/hf-inference/models/stabilityai/stable-diffusion-xl-base-1.0";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODELS: &[&str] = &["gemini-2.0-flash", "gemini-1.5-flash"];

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct HuggingFaceConfig {
    pub api_token: Option<String>,
    pub endpoint: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        HuggingFaceConfig {
            api_token: None,
            endpoint: DEFAULT_HF_ENDPOINT.to_string(),
            num_inference_steps: 50,
            guidance_scale: 12.0,
        }
    }
}

impl HuggingFaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        HuggingFaceConfig {
            api_token: non_empty(lookup("HF_API_TOKEN")),
            endpoint: non_empty(lookup("HF_IMAGE_ENDPOINT")).unwrap_or(defaults.endpoint),
            num_inference_steps: lookup("HF_INFERENCE_STEPS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.num_inference_steps),
            guidance_scale: lookup("HF_GUIDANCE_SCALE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.guidance_scale),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_sampling(mut self, num_inference_steps: u32, guidance_scale: f32) -> Self {
        self.num_inference_steps = num_inference_steps;
        self.guidance_scale = guidance_scale;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Tried in order; quota failures fall through to the next entry.
    pub models: Vec<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let models = non_empty(lookup("GEMINI_MODELS"))
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|models| !models.is_empty())
            .unwrap_or(defaults.models);

        GeminiConfig {
            api_key: non_empty(lookup("GEMINI_API_KEY")),
            base_url: non_empty(lookup("GEMINI_BASE_URL")).unwrap_or(defaults.base_url),
            models,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub organism: Organism,
    pub huggingface: HuggingFaceConfig,
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            organism: Organism::default(),
            huggingface: HuggingFaceConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let organism = match non_empty(lookup("GENELAB_ORGANISM")) {
            Some(value) => value.parse().unwrap_or_else(|e: String| {
                log::warn!("{}, falling back to mouse", e);
                Organism::Mouse
            }),
            None => Organism::default(),
        };

        Config {
            host: non_empty(lookup("HOST")).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
                .and_then(|port| port.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            organism,
            huggingface: HuggingFaceConfig::from_lookup(&lookup),
            gemini: GeminiConfig::from_lookup(&lookup),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_organism(mut self, organism: Organism) -> Self {
        self.organism = organism;
        self
    }

    pub fn with_huggingface(mut self, config: HuggingFaceConfig) -> Self {
        self.huggingface = config;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
