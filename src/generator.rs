//! Question generation through a hosted model.
//!
//! The model is a black-box collaborator behind [`QuestionGenerator`]. The
//! Gemini client below is the production implementation; the response
//! handling is kept in pure functions so it can be tested without a network.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::mcq::{McqConfig, McqError};
use crate::prompt;
use crate::question::{GroundingSource, MAX_SOURCES, Question, QuestionError, check_all};

const GENERATE_THINKING_BUDGET: u32 = 4096;
const VALIDATE_THINKING_BUDGET: u32 = 1024;
const FALLBACK_SOURCE_TITLE: &str = "External Source";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid generation parameters: {0}")]
    Config(#[from] McqError),
    #[error("no API key configured (set GEMINI_API_KEY or api_key in the config file)")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("model {model} returned HTTP {status}: {body}")]
    Status {
        model: String,
        status: u16,
        body: String,
    },
    #[error("the model returned an empty response")]
    Empty,
    #[error("malformed model output: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("model output breaks the question contract: {0}")]
    Contract(#[from] QuestionError),
}

/// Structured verdict of the pedagogical review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub advice: String,
}

impl ValidationResult {
    /// Verdict used when the review itself could not be obtained.
    pub fn accepted() -> Self {
        Self {
            is_valid: true,
            title: String::new(),
            message: String::new(),
            advice: String::new(),
        }
    }
}

/// External capability producing questions for a request.
pub trait QuestionGenerator {
    fn generate(
        &self,
        config: &McqConfig,
    ) -> impl Future<Output = Result<Vec<Question>, GenerateError>> + Send;

    fn validate(
        &self,
        config: &McqConfig,
    ) -> impl Future<Output = Result<ValidationResult, GenerateError>> + Send;
}

/// Result of a full review-then-generate round.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The review rejected the request; show title, message and advice.
    Rejected(ValidationResult),
    Generated(Vec<Question>),
}

/// Check parameters locally, ask for a review, then generate.
///
/// A failed review call is logged and treated as a pass. A negative verdict
/// stops before generation so earlier results stay untouched.
pub async fn run_generation<G: QuestionGenerator>(
    generator: &G,
    config: &McqConfig,
) -> Result<GenerationOutcome, GenerateError> {
    config.validate()?;
    let verdict = match generator.validate(config).await {
        Ok(verdict) => verdict,
        Err(err) => {
            warn!(error = %err, "configuration review failed; continuing without it");
            ValidationResult::accepted()
        }
    };
    if !verdict.is_valid {
        info!(title = %verdict.title, "configuration rejected by review");
        return Ok(GenerationOutcome::Rejected(verdict));
    }
    let questions = generator.generate(config).await?;
    info!(count = questions.len(), "questions generated");
    Ok(GenerationOutcome::Generated(questions))
}

// ---- Gemini wire types ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GenerateResponse {
    /// Answer text of the first candidate, thought parts excluded.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Web citations of the first candidate, in response order.
    pub fn sources(&self) -> Vec<GroundingSource> {
        let Some(meta) = self
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
        else {
            return Vec::new();
        };
        meta.grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
                Some(GroundingSource {
                    uri: uri.to_string(),
                    title: web
                        .title
                        .clone()
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| FALLBACK_SOURCE_TITLE.to_string()),
                })
            })
            .collect()
    }
}

/// Turn a generate response into checked questions.
///
/// With live search on and at least one citation returned, the first
/// [`MAX_SOURCES`] citations are attached to every question.
pub fn parse_questions(
    response: &GenerateResponse,
    use_live_search: bool,
) -> Result<Vec<Question>, GenerateError> {
    let text = response.text().ok_or(GenerateError::Empty)?;
    let mut questions: Vec<Question> = serde_json::from_str(text.trim())?;
    check_all(&questions)?;

    let mut sources = response.sources();
    if use_live_search && !sources.is_empty() {
        sources.truncate(MAX_SOURCES);
        for q in &mut questions {
            q.sources = Some(sources.clone());
        }
    }
    Ok(questions)
}

pub fn parse_validation(response: &GenerateResponse) -> Result<ValidationResult, GenerateError> {
    let text = response.text().ok_or(GenerateError::Empty)?;
    Ok(serde_json::from_str(text.trim())?)
}

/// Request body for `generateContent` with a declared JSON response schema.
pub fn request_body(prompt: &str, schema: Value, thinking_budget: u32, live_search: bool) -> Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
            "thinkingConfig": { "thinkingBudget": thinking_budget }
        }
    });
    if live_search {
        body["tools"] = json!([{ "googleSearch": {} }]);
    }
    body
}

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, GenerateError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerateError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GenerateError::Client)?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn call(&self, body: &Value) -> Result<GenerateResponse, GenerateError> {
        let endpoint = self.endpoint();
        debug!(model = %self.model, %endpoint, "calling generateContent");
        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| GenerateError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(model = %self.model, status = status.as_u16(), "generateContent failed");
            return Err(GenerateError::Status {
                model: self.model.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response
            .json::<GenerateResponse>()
            .await
            .map_err(|source| GenerateError::Transport { endpoint, source })?;
        debug!(candidates = parsed.candidates.len(), "generateContent succeeded");
        Ok(parsed)
    }
}

impl QuestionGenerator for GeminiClient {
    async fn generate(&self, config: &McqConfig) -> Result<Vec<Question>, GenerateError> {
        let body = request_body(
            &prompt::generation_prompt(config),
            prompt::question_schema(),
            GENERATE_THINKING_BUDGET,
            config.use_live_search,
        );
        let response = self.call(&body).await?;
        let questions = parse_questions(&response, config.use_live_search)?;
        let expected = usize::from(config.number_of_options);
        for (idx, q) in questions.iter().enumerate() {
            if q.options.len() != expected {
                warn!(
                    question = idx + 1,
                    expected,
                    got = q.options.len(),
                    "model returned a different option count than requested"
                );
            }
        }
        Ok(questions)
    }

    async fn validate(&self, config: &McqConfig) -> Result<ValidationResult, GenerateError> {
        let body = request_body(
            &prompt::validation_prompt(config),
            prompt::validation_schema(),
            VALIDATE_THINKING_BUDGET,
            false,
        );
        let response = self.call(&body).await?;
        parse_validation(&response)
    }
}
