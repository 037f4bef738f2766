use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{AiError, GenerativeModel};
use crate::config::AiConfig;

/// Google Generative Language HTTP client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Create a client from startup configuration.
    pub fn new(config: &AiConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        GeminiClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
        }
    }

    fn generate(&self, parts: Vec<Part>) -> Result<String, AiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                AiError::Connection(self.base_url.clone())
            } else {
                AiError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AiError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| AiError::ResponseDecoding(e.to_string()))?;

        // Candidate parts are concatenated; the API may split a long answer.
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(AiError::EmptyResponse)?
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

impl GenerativeModel for GeminiClient {
    fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        self.generate(vec![Part::text(prompt)])
    }

    fn generate_from_image(
        &self,
        mime_type: &str,
        image: &[u8],
        prompt: &str,
    ) -> Result<String, AiError> {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        self.generate(vec![
            Part::inline_data(mime_type, data),
            Part::text(prompt),
        ])
    }
}

// Request body for models/{model}:generateContent
#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Part {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, data: String) -> Self {
        Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

// Response body from models/{model}:generateContent
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Mock model for testing — returns a canned response or a forced failure.
pub struct MockModel {
    response: Result<String, ()>,
}

impl MockModel {
    pub fn new(response: &str) -> Self {
        MockModel {
            response: Ok(response.to_string()),
        }
    }

    /// A model whose every call fails, for provider-outage paths.
    pub fn failing() -> Self {
        MockModel { response: Err(()) }
    }

    fn answer(&self) -> Result<String, AiError> {
        self.response
            .clone()
            .map_err(|_| AiError::Connection("mock".into()))
    }
}

impl GenerativeModel for MockModel {
    fn generate_text(&self, _prompt: &str) -> Result<String, AiError> {
        self.answer()
    }

    fn generate_from_image(
        &self,
        _mime_type: &str,
        _image: &[u8],
        _prompt: &str,
    ) -> Result<String, AiError> {
        self.answer()
    }
}
