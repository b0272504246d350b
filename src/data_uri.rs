use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

pub const PNG_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error, PartialEq)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Wrap raw image bytes as a PNG data URI.
pub fn encode_png(bytes: &[u8]) -> String {
    let mut uri = String::with_capacity(PNG_PREFIX.len() + bytes.len().div_ceil(3) * 4);
    uri.push_str(PNG_PREFIX);
    STANDARD.encode_string(bytes, &mut uri);
    uri
}

/// Split a base64 data URI into its MIME type and decoded bytes.
pub fn decode(uri: &str) -> Result<(String, Vec<u8>), DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingScheme)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(DataUriError::NotBase64)?;
    Ok((mime.to_string(), STANDARD.decode(payload)?))
}
