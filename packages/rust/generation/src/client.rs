//! HTTP client for a text-generation inference endpoint.
//!
//! Speaks the Hugging Face inference JSON protocol: the prompt goes in
//! `inputs`, sampling settings in `parameters`, and the response is a list of
//! `{generated_text}` objects whose text starts with the prompt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use blogfactory_shared::{BlogFactoryError, Result};

use crate::{GenerationRequest, TextGenerator};

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("BlogFactory/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, serde::Serialize)]
struct InferenceParameters {
    do_sample: bool,
    min_length: usize,
    max_length: usize,
    /// Keep the prompt as a prefix of the output.
    return_full_text: bool,
}

#[derive(Debug, serde::Deserialize)]
struct InferenceOutput {
    generated_text: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// [`TextGenerator`] backed by a remote (or local) inference server.
pub struct HttpTextGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTextGenerator {
    /// Create a client for `endpoint`. `api_key` is sent as a bearer token when present.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                BlogFactoryError::upstream("generation", format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = InferenceRequest {
            inputs: &request.prompt,
            parameters: InferenceParameters {
                do_sample: request.do_sample,
                min_length: request.min_length,
                max_length: request.max_length,
                return_full_text: true,
            },
        };

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BlogFactoryError::upstream("generation", e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            BlogFactoryError::upstream("generation", format!("failed to read body: {e}"))
        })?;

        if !status.is_success() {
            return Err(BlogFactoryError::upstream(
                "generation",
                format!("HTTP {status}: {}", snippet(&text)),
            ));
        }

        let outputs: Vec<InferenceOutput> = serde_json::from_str(&text).map_err(|e| {
            BlogFactoryError::upstream(
                "generation",
                format!("invalid response: {e} (got: {})", snippet(&text)),
            )
        })?;

        let output = outputs.into_iter().next().ok_or_else(|| {
            BlogFactoryError::upstream("generation", "response contained no generations")
        })?;

        debug!(chars = output.generated_text.chars().count(), "chunk generated");
        Ok(output.generated_text)
    }

    fn name(&self) -> &str {
        "http-inference"
    }
}

/// First 200 characters of a response body, for error messages.
fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}
