pub mod classify;
pub mod config;
pub mod data_uri;
pub mod error;
pub mod lab;
pub mod logger;
pub mod models;
pub mod phenotype;
pub mod prompt;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;

pub use config::{Config, GeminiConfig, HuggingFaceConfig};
pub use error::{ErrorKind, GeneLabError, ProviderError, Result};
pub use lab::{ChatClient, ImageClient, LabClient};
pub use models::{
    ChatRequest, ChatResponse, ChatRole, ChatTurn, ImageGenerationRequest,
    ImageGenerationResponse,
};
pub use prompt::{Organism, OrganismProfile};
pub use providers::{ChatProvider, GeminiClient, HuggingFaceClient, ImageProvider};
