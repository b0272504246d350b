pub mod gemini;
pub mod huggingface;

use crate::{
    error::ProviderError,
    models::{DiffusionPayload, SeededTurn},
};
use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;

/// Text-to-image backend returning raw image bytes.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, payload: &DiffusionPayload) -> Result<Vec<u8>, ProviderError>;

    /// Whether the provider holds the credential it needs.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Conversational backend addressed by model identifier.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `message` to a session on `model` seeded with `history`.
    async fn send(
        &self,
        model: &str,
        history: &[SeededTurn],
        message: &str,
    ) -> Result<String, ProviderError>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// One-shot local HTTP endpoint for exercising the real provider clients.
#[cfg(test)]
pub(crate) mod canned {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answer a single request with `status` and `body`. Returns the base URL
    /// and a handle yielding the raw request text.
    pub async fn serve_once(
        status: u16,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let content_type = content_type.to_string();
        let body = body.into();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let head = format!(
                "HTTP/1.1 {} Canned\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                status,
                content_type,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (base_url, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
