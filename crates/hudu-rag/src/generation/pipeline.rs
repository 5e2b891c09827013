//! Answering pipeline: load, chunk, index, then answer questions

use std::path::Path;

use super::prompt::PromptBuilder;
use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::providers::{Completion, LlmProvider, Providers};
use crate::retrieval::VectorIndex;

/// Returned when the model has no answer in the documents
pub const NOT_FOUND_MESSAGE: &str = "The answer could not be found in the provided documents";

/// Prefix for every successful answer
pub const ANSWER_BANNER: &str = "HuduAssist KE 🇰🇪: ";

/// A ready-to-query pipeline over one uploaded source
pub struct AnsweringPipeline {
    index: VectorIndex,
    providers: Providers,
    top_k: usize,
}

impl std::fmt::Debug for AnsweringPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsweringPipeline")
            .field("index", &self.index)
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl AnsweringPipeline {
    /// Load, chunk and index `path`
    ///
    /// Failures are logged here; callers only map them to a response.
    pub async fn build(path: &Path, providers: &Providers, config: &RagConfig) -> Result<Self> {
        match Self::try_build(path, providers, config).await {
            Ok(pipeline) => Ok(pipeline),
            Err(e) => {
                tracing::error!("Failed to initialize QA system for {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    async fn try_build(path: &Path, providers: &Providers, config: &RagConfig) -> Result<Self> {
        let units = DocumentLoader::new(providers.llm.clone()).load(path).await?;
        let chunks = TextChunker::from_config(&config.chunking).chunk_units(&units)?;
        let index = VectorIndex::build(chunks, providers.embedder.as_ref()).await?;

        Ok(Self {
            index,
            providers: providers.clone(),
            top_k: config.retrieval.top_k,
        })
    }

    /// Answer a question from the indexed document
    pub async fn answer(&self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_request("A 'query' input is required"));
        }

        let results = self
            .index
            .search(query, self.top_k, self.providers.embedder.as_ref())
            .await?;
        tracing::debug!("Retrieved {} chunks for query", results.len());

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_rag_prompt(query, &context);

        let answer = match self.providers.llm.complete(&prompt).await? {
            Completion::Text(text) => text,
            Completion::Raw(raw) => {
                tracing::warn!("{} returned no text: {}", self.providers.llm.name(), raw);
                String::new()
            }
        };

        Ok(postprocess_answer(&answer))
    }

    /// The index backing this pipeline
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

/// Answer a question without document context
pub async fn answer_general(llm: &dyn LlmProvider, query: &str) -> Result<String> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::invalid_request("A 'query' input is required"));
    }

    let prompt = PromptBuilder::build_general_prompt(query);
    match llm.complete(&prompt).await? {
        Completion::Text(text) => Ok(format!("{}{}", ANSWER_BANNER, text)),
        Completion::Raw(raw) => Err(Error::generation(format!(
            "{} returned no text: {}",
            llm.name(),
            raw
        ))),
    }
}

/// Map a raw model answer to the user-facing response
pub fn postprocess_answer(answer: &str) -> String {
    if answer.trim().is_empty() || answer.to_lowercase().contains("don't know") {
        NOT_FOUND_MESSAGE.to_string()
    } else {
        format!("{}{}", ANSWER_BANNER, answer)
    }
}
