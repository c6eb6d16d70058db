//! Text-completion backends consumed by the analysis pipeline

use crate::config::{CompletionConfig, ProviderKind};
use crate::error::{Result, ResumeMatchError};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// A blocking-style "answer this prompt" capability. Callers await one
/// completion at a time and treat every error as recoverable.
pub trait CompletionService: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Chat-completions client for Azure OpenAI deployments and
/// OpenAI-compatible endpoints.
pub struct ChatCompletionClient {
    client: Client,
    url: String,
    provider: ProviderKind,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionClient {
    /// Build a client from configuration; the API key comes from the
    /// environment variable named in `api_key_env`.
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            ResumeMatchError::Configuration(format!(
                "API key not found in environment variable {}",
                config.api_key_env
            ))
        })?;

        if config.model.trim().is_empty() {
            return Err(ResumeMatchError::Configuration(
                "completion.model (deployment) is not set".to_string(),
            ));
        }

        let url = match config.provider {
            ProviderKind::Azure => {
                if config.endpoint.trim().is_empty() {
                    return Err(ResumeMatchError::Configuration(
                        "completion.endpoint is required for Azure".to_string(),
                    ));
                }
                format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    config.endpoint.trim_end_matches('/'),
                    config.model,
                    config.api_version
                )
            }
            ProviderKind::OpenAi => {
                let base = if config.endpoint.trim().is_empty() {
                    DEFAULT_OPENAI_ENDPOINT
                } else {
                    config.endpoint.trim_end_matches('/')
                };
                format!("{}/chat/completions", base)
            }
        };

        Ok(Self {
            client: Client::new(),
            url,
            provider: config.provider,
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: match self.provider {
                ProviderKind::Azure => None,
                ProviderKind::OpenAi => Some(self.model.as_str()),
            },
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

impl CompletionService for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = self.client.post(&self.url).json(&self.build_request(prompt));
        let request = match self.provider {
            ProviderKind::Azure => request.header("api-key", &self.api_key),
            ProviderKind::OpenAi => request.bearer_auth(&self.api_key),
        };

        debug!("Sending completion request ({} prompt chars)", prompt.len());
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResumeMatchError::Completion(format!(
                "service returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ResumeMatchError::MalformedResponse("response had no content".to_string()))
    }
}

/// Backend that refuses every prompt, leaving only the deterministic
/// analyzers in play.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineCompletion;

impl CompletionService for OfflineCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(ResumeMatchError::Completion("completion service disabled (offline mode)".to_string()))
    }
}

/// Deterministic stand-in that answers prompts from a list of rules.
/// A rule fires when every one of its needles occurs in the prompt; the
/// first matching rule wins. Unmatched prompts fail.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    rules: Vec<ScriptedRule>,
    calls: AtomicUsize,
}

#[derive(Debug)]
struct ScriptedRule {
    needles: Vec<String>,
    reply: Option<String>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needles: &[&str], response: impl Into<String>) -> Self {
        self.rules.push(ScriptedRule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            reply: Some(response.into()),
        });
        self
    }

    pub fn fail(mut self, needles: &[&str]) -> Self {
        self.rules.push(ScriptedRule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            reply: None,
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionService for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.needles.iter().all(|needle| prompt.contains(needle.as_str())));

        match rule {
            Some(ScriptedRule { reply: Some(reply), .. }) => Ok(reply.clone()),
            Some(ScriptedRule { reply: None, .. }) => {
                Err(ResumeMatchError::Completion("scripted failure".to_string()))
            }
            None => Err(ResumeMatchError::Completion("no scripted reply for prompt".to_string())),
        }
    }
}
