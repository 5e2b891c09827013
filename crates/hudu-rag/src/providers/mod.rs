//! Provider abstractions for embeddings and chat completion
//!
//! The pipeline talks to vendors only through these traits, so the Gemini
//! backend can be swapped (or faked in tests) without touching retrieval code.

pub mod embedding;
pub mod gemini;
pub mod llm;

use std::sync::Arc;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::{Completion, LlmProvider};

use crate::config::RagConfig;
use crate::error::Result;

/// Embedding and chat providers shared by every pipeline
#[derive(Clone)]
pub struct Providers {
    /// Embeds chunks and queries
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Answers prompts and transcribes images
    pub llm: Arc<dyn LlmProvider>,
}

impl Providers {
    /// Bundle two providers
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { embedder, llm }
    }

    /// One Gemini client serving both roles
    pub fn gemini(config: &RagConfig) -> Result<Self> {
        let client = Arc::new(GeminiClient::new(
            &config.llm,
            config.retrieval.embed_batch_size,
        )?);
        tracing::info!(
            "Gemini providers ready (chat: {}, embeddings: {})",
            client.model(),
            client.embed_model()
        );
        Ok(Self::new(client.clone(), client))
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("embedder", &self.embedder.name())
            .field("llm", &self.llm.name())
            .field("model", &self.llm.model())
            .finish()
    }
}
