//! Meeting summarization over an OpenAI-compatible chat API.

use crate::defaults;
use crate::error::{MinutierError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// System instruction driving the structured meeting report.
///
/// The persona and section requirements are fixed; only the transcript
/// varies between runs.
pub const REPORT_INSTRUCTION: &str = "\
You are an expert meeting-report analyst. Your role is to turn a raw, \
speaker-labeled transcript into a professional, clear, structured report. \
Guidelines: \
1. Clearly identify each speaker (name or label, if given). \
2. Summarize in detail what each speaker said, point by point, in \
chronological order. \
3. Distinguish contributions, main ideas, arguments, questions, answers, \
decisions taken, disagreements, and follow-up actions, listed as a), b), etc. \
4. Omit no topic, however briefly it was raised. \
5. Use numbered headings, subheadings and bullet points for a clean, \
professional read. \
6. End the report with a \"Key points & next steps\" section gathering: \
a) the key points discussed, b) the decisions taken, c) the identified \
action items (with owners when mentioned).";

/// Trait for transcript summarization.
///
/// This trait allows swapping implementations (remote API vs mock).
pub trait Summarizer: Send + Sync {
    /// Produce a summary of `transcript` under the given system instruction.
    fn summarize(&self, instruction: &str, transcript: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Summarizer backed by a `chat/completions` endpoint.
pub struct ChatSummarizer {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::blocking::Client,
}

impl ChatSummarizer {
    /// Create a summarizer with explicit endpoint settings.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(defaults::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| MinutierError::ApiTransport {
                message: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: defaults::SUMMARY_MAX_TOKENS,
            client,
        })
    }

    /// Override the summary token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Summarizer for ChatSummarizer {
    fn summarize(&self, instruction: &str, transcript: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content: transcript,
                },
            ],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| MinutierError::ApiTransport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().unwrap_or_default();
            return Err(MinutierError::ApiQuota {
                message: format!("{}: {}", status, body),
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MinutierError::Summary {
                message: format!("summary API returned {}: {}", status, body),
            });
        }

        let parsed: ChatResponse = response.json().map_err(|e| MinutierError::Summary {
            message: format!("invalid summary response: {}", e),
        })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| MinutierError::Summary {
                message: "summary response contained no choices".to_string(),
            })?;
        Ok(content)
    }
}

/// Mock summarizer for testing
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    response: String,
    should_fail: bool,
}

impl MockSummarizer {
    /// Create a new mock summarizer with default settings
    pub fn new() -> Self {
        Self {
            response: "mock summary".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on summarize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer for MockSummarizer {
    fn summarize(&self, _instruction: &str, _transcript: &str) -> Result<String> {
        if self.should_fail {
            Err(MinutierError::Summary {
                message: "mock summary failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}
