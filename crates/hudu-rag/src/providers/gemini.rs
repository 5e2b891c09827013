//! Gemini client for embeddings, answer generation and image transcription
//!
//! Talks to the Generative Language REST API with an API key. Calls are made
//! once; failures surface to the caller without retries.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::llm::{Completion, LlmProvider};

/// Upper bound on texts per `batchEmbedContents` request
pub const MAX_EMBED_BATCH: usize = 100;

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embed_model: String,
    temperature: f32,
    batch_size: usize,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// Fails with a configuration error when no API key is set.
    pub fn new(config: &LlmConfig, batch_size: usize) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config(format!("{} is not set", crate::config::API_KEY_ENV)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model: model_path(&config.chat_model),
            embed_model: model_path(&config.embed_model),
            temperature: config.temperature,
            batch_size: batch_size.clamp(1, MAX_EMBED_BATCH),
        })
    }

    /// Embedding model path
    pub fn embed_model(&self) -> &str {
        &self.embed_model
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{}:{}", self.base_url, model, method)
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<Completion> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint(&self.chat_model, "generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse Gemini response: {}", e)))?;

        completion_from_response(body)
    }

    async fn embed_request(&self, texts: &[String], task: TaskType) -> Result<Vec<Vec<f32>>> {
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: self.embed_model.clone(),
                    content: EmbedContent {
                        parts: vec![TextPart { text: text.clone() }],
                    },
                    task_type: task,
                })
                .collect(),
        };

        let response = self
            .client
            .post(self.endpoint(&self.embed_model, "batchEmbedContents"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Gemini embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Gemini embedding failed ({}): {}",
                status, body
            )));
        }

        let embed_response: BatchEmbedResponse = response.json().await.map_err(|e| {
            Error::embedding(format!("Failed to parse Gemini embedding response: {}", e))
        })?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Gemini returned {} embeddings for {} texts",
                embed_response.embeddings.len(),
                texts.len()
            )));
        }

        Ok(embed_response
            .embeddings
            .into_iter()
            .map(|e| e.values)
            .collect())
    }

    async fn embed_one(&self, text: &str, task: TaskType) -> Result<Vec<f32>> {
        self.embed_request(&[text.to_string()], task)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("No embedding in Gemini response"))
    }
}

/// Prefix bare model names with `models/`
fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Decide between text and raw payload for a `generateContent` response
fn completion_from_response(body: serde_json::Value) -> Result<Completion> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .cloned()
        .ok_or_else(|| {
            let feedback = body
                .get("promptFeedback")
                .map(|f| f.to_string())
                .unwrap_or_default();
            Error::generation(format!("No candidates in Gemini response {}", feedback))
        })?;

    let texts: Vec<&str> = candidate
        .pointer("/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if texts.is_empty() {
        return Ok(Completion::Raw(candidate));
    }

    Ok(Completion::Text(texts.concat()))
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Serialize)]
struct EmbedContentRequest {
    model: String,
    content: EmbedContent,
    #[serde(rename = "taskType")]
    task_type: TaskType,
}

/// Embedding purpose sent with each request
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

#[derive(Serialize)]
struct EmbedContent {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_one(text, TaskType::RetrievalDocument).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            all_embeddings.extend(self.embed_request(batch, TaskType::RetrievalDocument).await?);
        }
        Ok(all_embeddings)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embed_one(query, TaskType::RetrievalQuery).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        tracing::debug!("Generating answer with model: {}", self.chat_model);
        self.generate(vec![Part::Text {
            text: prompt.to_string(),
        }])
        .await
    }

    async fn transcribe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        instruction: &str,
    ) -> Result<Completion> {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        self.generate(vec![
            Part::Text {
                text: instruction.to_string(),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.to_string(),
                    data,
                },
            },
        ])
        .await
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.chat_model
    }
}
