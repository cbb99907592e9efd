//! Google Gemini `generateContent` client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{Summarizer, Summary};

/// Base URL of the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    /// API base URL, without a trailing slash.
    pub endpoint: String,
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Config for the public endpoint with the default timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    status: Option<String>,
}

fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

/// Pull the text out of a successful response body.
///
/// Text parts of the first candidate are concatenated. A blocked prompt or a
/// candidate without text is reported as [`Error::EmptyResponse`].
fn parse_response(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| Error::Summarizer(format!("Malformed response: {e}")))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response.prompt_feedback.and_then(|f| f.block_reason);
        return Err(Error::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::EmptyResponse(candidate.finish_reason));
    }
    Ok(text)
}

/// Turn a non-success status and its body into an error message.
fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let api = envelope.error;
            let code = if api.code == 0 { status } else { api.code };
            match api.status {
                Some(s) => format!("HTTP {code} {s}: {}", api.message),
                None => format!("HTTP {code}: {}", api.message),
            }
        }
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}

/// Blocking client for the Gemini `generateContent` method.
///
/// Each call is one HTTPS request; there is no retry. The underlying
/// connection pool is shared across threads.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Build a client.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tocdigest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Summarizer(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Build a client for the public endpoint with `api_key`.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(GeminiConfig::new(api_key))
    }

    /// The connection settings.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.endpoint, model)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout)
        } else {
            Error::Summarizer(err.to_string())
        }
    }
}

impl Summarizer for GeminiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<Summary> {
        log::debug!("POST {} ({} bytes of prompt)", self.url(model), prompt.len());

        let response = self
            .http
            .post(self.url(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(prompt))
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(Error::Summarizer(describe_failure(status.as_u16(), &body)));
        }

        let text = parse_response(&body)?;
        Ok(Summary::new(text, model))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
