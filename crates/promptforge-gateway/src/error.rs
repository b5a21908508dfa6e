//! Completion gateway error taxonomy
//!
//! Each failure condition is surfaced distinctly to the caller; none are
//! retried here. The submission service maps them onto terminal `failed`
//! records.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API key configured. Fatal; no request is sent.
    #[error("Completion gateway API key is not configured")]
    MissingCredentials,

    /// HTTP 429 from the gateway.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// HTTP 402 from the gateway.
    #[error("Payment required. Please add credits.")]
    QuotaExhausted,

    /// Any other non-success status.
    #[error("Completion gateway error: status {status}")]
    Http { status: u16, body: String },

    /// A 2xx response that carried no completion content.
    #[error("No response from the completion gateway")]
    EmptyCompletion,

    /// Transport-level failure (connect, timeout, body read).
    #[error("Completion gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GatewayError {
    /// True for throttling/quota conditions the caller should report as
    /// transient rather than as a system fault.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::RateLimited | GatewayError::QuotaExhausted)
    }
}
