pub mod client;
pub mod prompt;
pub mod recover;
pub mod schema;

pub use client::{GeminiClient, MockModel};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Cannot reach AI provider at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("AI provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    ResponseDecoding(String),

    #[error("Provider response contained no text")]
    EmptyResponse,
}

/// A generative model the service can hand an image or a prompt to.
///
/// One synchronous round trip per call: no retries, no streaming, and no
/// timeout beyond the HTTP client default — a hung provider call blocks the
/// request that made it. Production uses [`GeminiClient`]; tests substitute
/// [`MockModel`].
pub trait GenerativeModel: Send + Sync {
    /// Generate a text completion for a plain prompt.
    fn generate_text(&self, prompt: &str) -> Result<String, AiError>;

    /// Generate a text completion for an image plus instruction prompt.
    fn generate_from_image(
        &self,
        mime_type: &str,
        image: &[u8],
        prompt: &str,
    ) -> Result<String, AiError>;
}
