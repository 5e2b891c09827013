//! Embedding provider trait

use async_trait::async_trait;
use crate::error::Result;

/// Turns text into vectors for similarity search
///
/// Documents and queries may be embedded differently (Gemini takes a task
/// type per request); vectors from both sides must still be comparable.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single document text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed document texts, one vector per input in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Embed a search query
    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embed(query).await
    }

    /// Provider name for logging
    fn name(&self) -> &str;
}
