use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

/// Outcome of one analysis call. Serializes untagged, so the three cases map
/// directly to the wire shapes: a field mapping, `{"raw_analysis": ...}`, or
/// `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Structured(Value),
    Raw { raw_analysis: String },
    Failed { error: String },
}

/// Client for the DeepSeek chat-completion API.
pub struct DeepSeekClient {
    http: Client,
    api_key: String,
    chat_url: String,
    model: String,
}

impl DeepSeekClient {
    /// Fails fast when no credential is available, before any network call.
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Config(
                "DeepSeek API key not provided; set DEEPSEEK_API_KEY".to_string(),
            ));
        }

        Ok(Self {
            http: Client::new(),
            api_key: api_key.to_string(),
            chat_url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_key.as_deref().unwrap_or(""),
            &config.base_url,
            &config.model,
        )
    }

    /// Analyze extracted page text. Never fails: transport and decoding
    /// problems come back as `Analysis::Failed` or `Analysis::Raw`.
    pub async fn analyze_content(&self, content: &str) -> Analysis {
        match self.request_analysis(content).await {
            Ok(reply) => parse_reply(&reply),
            Err(e) => {
                warn!("DeepSeek API call failed: {}", e);
                Analysis::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn request_analysis(&self, content: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: build_prompt(content),
            }],
            temperature: 0.3,
            max_tokens: 8000,
        };

        let res = self
            .http
            .post(&self.chat_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Analysis(format!(
                "DeepSeek API returned {}: {}",
                status, text
            )));
        }

        let json: Value = res.json().await?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AppError::Analysis("Unexpected response shape from DeepSeek API".to_string())
            })?
            .to_string();

        info!(chars = reply.len(), "received analysis reply");
        Ok(reply)
    }
}

pub fn build_prompt(content: &str) -> String {
    let mut prompt = String::with_capacity(content.len() + 400);
    prompt.push_str(
        "Analyze the following article and extract:\n\
         1. title (article title)\n\
         2. author (author information)\n\
         3. date (publication date)\n\
         4. source (source website)\n\
         5. keywords (main topics and keywords, at most 5)\n\
         6. abstract (article summary, at most 200 words)\n\n\
         Reply with a single JSON object using exactly those keys.\n\n\
         Article content:\n",
    );
    prompt.push_str(content);
    prompt
}

/// Best-effort decoding of the model reply. Anything that is not a JSON
/// object is kept verbatim under the raw fallback instead of failing.
pub fn parse_reply(reply: &str) -> Analysis {
    let candidate = strip_code_fence(reply.trim());
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) if value.is_object() => Analysis::Structured(value),
        _ => Analysis::Raw {
            raw_analysis: reply.trim().to_string(),
        },
    }
}

// Models often wrap JSON in a markdown code fence.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end()
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(text)
}
