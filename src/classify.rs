//! Maps raw provider failures onto [`ErrorKind`].
//!
//! Providers signal billing, throttling and cold starts through a mix of
//! status codes and free-text bodies, so everything string-based lives here.

use crate::error::ErrorKind;

const CREDIT_PHRASES: &[&str] = &["credit balance is depleted", "insufficient credits"];
const QUOTA_MARKERS: &[&str] = &["429", "quota"];

/// Classify a non-2xx image provider response.
pub fn classify_image_failure(status: u16, body: &str) -> ErrorKind {
    if status == 503 {
        return ErrorKind::ModelLoading;
    }

    let body = body.to_lowercase();
    if CREDIT_PHRASES.iter().any(|phrase| body.contains(phrase)) || status == 402 || status == 403
    {
        ErrorKind::CreditsDepleted
    } else if status == 429 {
        ErrorKind::RateLimited
    } else {
        ErrorKind::ProviderError
    }
}

/// True when a chat failure is quota/rate related and the next model may succeed.
pub fn is_quota_error(text: &str) -> bool {
    let text = text.to_lowercase();
    QUOTA_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Message safe to show an end user for a classified image failure.
pub fn user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ModelLoading => "Model is loading on Hugging Face. Try again in 10–20 seconds.",
        ErrorKind::CreditsDepleted => "Image generation service requires additional credits",
        ErrorKind::RateLimited => "Too many requests. Please try again in a moment",
        _ => "Image generation temporarily unavailable",
    }
}

/// Status to answer with when passing a provider failure through.
pub fn passthrough_status(status: u16) -> u16 {
    if (400..=599).contains(&status) {
        status
    } else {
        502
    }
}
