// Providers that never leave the process. Also compiled into the integration
// tests, so everything is imported through the parent module.

use super::{async_trait, Completion, EmbeddingProvider, Error, LlmProvider, Result};

/// Hashes words into buckets so similar text gets similar vectors
pub struct BagOfWordsEmbedder;

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; 64];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
            vector[bucket % 64] += 1.0;
        }
        Ok(vector)
    }

    fn name(&self) -> &str {
        "bag-of-words"
    }
}

/// Embedding service that is always down
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::embedding("vendor down"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Answers with the prompt it receives, so responses expose the context
pub struct EchoLlm;

#[async_trait]
impl LlmProvider for EchoLlm {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        Ok(Completion::Text(prompt.to_string()))
    }

    async fn transcribe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        _instruction: &str,
    ) -> Result<Completion> {
        Ok(Completion::Text(format!("{} bytes of {}", image.len(), mime_type)))
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }
}

/// Returns the same completion for every call
pub struct ScriptedLlm(pub Completion);

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, _prompt: &str) -> Result<Completion> {
        Ok(self.0.clone())
    }

    async fn transcribe_image(&self, _: &[u8], _: &str, _: &str) -> Result<Completion> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }
}

/// Chat model that is always down
pub struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<Completion> {
        Err(Error::generation("Gemini API error 503: overloaded"))
    }

    async fn transcribe_image(&self, _: &[u8], _: &str, _: &str) -> Result<Completion> {
        Err(Error::generation("Gemini API error 503: overloaded"))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-1"
    }
}
