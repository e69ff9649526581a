//! Text-completion gateway for planner and presenter calls.
//!
//! The [`Gateway`] trait decouples the pipeline from the model backend. Two
//! HTTP implementations are provided (Ollama and Gemini); tests use scripted
//! gateways that return predetermined replies without touching the network.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::io::config::{AgentConfig, Provider};

/// A completion may sit behind a slow local model; allow it generous time.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Abstraction over text-completion backends.
pub trait Gateway {
    /// Send one rendered prompt and return the model's raw text reply.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Build the gateway selected by configuration.
pub fn build_gateway(config: &AgentConfig) -> Result<Box<dyn Gateway>> {
    match config.provider {
        Provider::Ollama => Ok(Box::new(OllamaGateway::new(config)?)),
        Provider::Gemini => Ok(Box::new(GeminiGateway::new(config)?)),
    }
}

fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("build http client")
}

/// Gateway backed by a local Ollama server (`/api/generate`).
pub struct OllamaGateway {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaGateway {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl Gateway for OllamaGateway {
    #[instrument(skip_all, fields(model = %self.model))]
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .with_context(|| format!("send completion request to {url}"))?;
        if !response.status().is_success() {
            bail!("ollama returned {}", response.status());
        }

        let parsed: OllamaResponse = response.json().context("parse ollama response")?;
        debug!(reply_chars = parsed.response.len(), "completion received");
        Ok(parsed.response)
    }
}

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gateway backed by the Gemini `generateContent` API.
pub struct GeminiGateway {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiGateway {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("api_key is required for the gemini provider")?;
        Ok(Self {
            http: http_client()?,
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiReplyContent,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiReplyPart {
    text: String,
}

impl Gateway for GeminiGateway {
    #[instrument(skip_all, fields(model = %self.model))]
    fn complete(&self, prompt: &str) -> Result<String> {
        // The key travels in the query string, so the URL must stay out of
        // logs and error messages. reqwest attaches the URL to its errors;
        // strip it before adding context.
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(reqwest::Error::without_url)
            .context("send completion request to gemini")?;
        if !response.status().is_success() {
            bail!("gemini returned {}", response.status());
        }

        let parsed: GeminiResponse = response
            .json()
            .map_err(reqwest::Error::without_url)
            .context("parse gemini response")?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .context("gemini response contained no candidates")?;
        debug!(reply_chars = text.len(), "completion received");
        Ok(text)
    }
}
