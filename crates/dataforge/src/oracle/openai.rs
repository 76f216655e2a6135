//! OpenAI chat-completions oracle implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{DataforgeError, Result};
use crate::pipeline::ExecutionPlan;

use super::json::extract_json;
use super::prompts;
use super::provider::{CleanRequest, Oracle, OracleConfig, ReviewRequest};

/// OpenAI API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-backed oracle.
pub struct OpenAiOracle {
    client: Client,
    api_key: String,
    config: OracleConfig,
}

impl OpenAiOracle {
    /// Create a new oracle with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OracleConfig::default())
    }

    /// Create a new oracle with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DataforgeError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            DataforgeError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| DataforgeError::Config(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }

    /// One blocking round trip to the chat-completions API.
    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_prompt()
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| DataforgeError::Http(format!("API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(DataforgeError::Http(format!(
                "API error ({status}): {error_text}"
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| DataforgeError::Http(format!("Failed to parse API response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DataforgeError::OracleFormat("No choices in API response".to_string()))
    }
}

impl Oracle for OpenAiOracle {
    fn plan(&self, query: &str, available_stages: &[String]) -> Result<ExecutionPlan> {
        let prompt = prompts::planning_prompt(query, available_stages);
        let response = self.send_message(&prompt)?;

        let value = extract_json(&response)
            .map_err(|e| DataforgeError::Planning(e.to_string()))?;
        let plan: ExecutionPlan = serde_json::from_value(value)
            .map_err(|e| DataforgeError::Planning(format!("unusable plan: {e}")))?;

        Ok(plan)
    }

    fn clean_records(&self, request: &CleanRequest<'_>) -> Result<Value> {
        let prompt = prompts::cleaning_prompt(request);
        let response = self.send_message(&prompt)?;
        extract_json(&response)
    }

    fn review_records(&self, request: &ReviewRequest<'_>) -> Result<Value> {
        let prompt = prompts::review_prompt(request);
        let response = self.send_message(&prompt)?;
        extract_json(&response)
    }

    fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Chat-completions response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}
