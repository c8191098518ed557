//! OpenAI-compatible chat oracle.
//!
//! Talks to any `/chat/completions` endpoint (OpenRouter, a local
//! server, ...) with hand-rolled OpenAI-format types. The composed prompt
//! states the counterpoint rules up front; corrective feedback from the
//! checker rides along in the user message.

use std::time::Duration;

use async_trait::async_trait;
use counterpoint::{Composition, Voice};
use serde::{Deserialize, Serialize};

use crate::extract::extract_voices;
use crate::oracle::{Oracle, OracleError};

/// Configuration for one OpenAI-compatible backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// API key; optional for local models
    pub api_key: Option<String>,

    /// Model identifier passed through to the backend
    pub model: String,

    /// Sampling temperature; counterpoint wants some adventure
    pub temperature: f32,

    /// Response token cap, if the backend should be limited
    pub max_tokens: Option<u32>,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            model: "deepseek/deepseek-r1-0528".to_string(),
            temperature: 0.8,
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

const SYSTEM_PROMPT: &str = "\
You are an expert music composer specializing in first species counterpoint. \
You must follow these strict rules:\n\
1. Avoid parallel motives (both voices moving in the same direction for 3 or more consecutive steps).\n\
2. Avoid parallel perfect intervals (unison, fourth, fifth, octave) approached in similar motion.\n\
3. Keep the voices within an octave plus a major third, and never cross or overlap them.\n\
4. Avoid dissonant melodic leaps (tritones, sevenths, anything beyond an octave).\n\
5. Never repeat a note in two consecutive measures of the counterpoint.\n\
6. Keep vertical intervals consonant: no seconds, sevenths, or tritones.\n\
7. Use octaves or unisons only in the first and last measures, and end on one.\n\
8. Stay inside the declared key; in minor, raise the 6th and 7th only on the way up.\n\
9. Shape the line: vary the notes and reach the single highest note exactly once, past the midpoint.\n\
When given feedback about rule violations you MUST produce a different melody that fixes them.\n\
Return only JSON in exactly this shape: \
{\"Counterpoint\": [79, 83, 81], \"CantusFirmus\": [60, 62, 65]}";

/// Chat message in OpenAI format.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Melody oracle backed by an OpenAI-compatible chat endpoint.
pub struct OpenAiOracle {
    client: reqwest::Client,
    config: OracleConfig,
}

impl OpenAiOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(OpenAiOracle { client, config })
    }

    fn user_content(cantus_firmus: &Voice, feedback: Option<&str>) -> String {
        let cantus = serde_json::to_string(cantus_firmus).unwrap_or_else(|_| "[]".into());
        let mut content = format!(
            "Complete the following first species counterpoint exercise.\n\"CantusFirmus\": {cantus}"
        );
        if let Some(feedback) = feedback {
            content.push_str(&format!(
                "\nPlease fix the following problems from the previous attempt:\n{feedback}"
            ));
        }
        content
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn propose(
        &self,
        cantus_firmus: &Voice,
        feedback: Option<&str>,
    ) -> Result<Composition, OracleError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::user_content(cantus_firmus, feedback),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut call = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            call = call.bearer_auth(key);
        }

        tracing::debug!(model = %self.config.model, feedback = feedback.is_some(), "requesting melody");

        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else {
                OracleError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or(OracleError::EmptyResponse)?;

        tracing::debug!(length = content.len(), "oracle response received");

        extract_voices(content)?.into_composition(cantus_firmus)
    }
}
