//! LLM provider trait for chat completion and image transcription

use async_trait::async_trait;
use crate::error::Result;

/// Result of a chat-completion call
///
/// The provider decides once whether the vendor returned usable text or only
/// a raw payload (for example a candidate stopped by a safety filter).
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Textual answer
    Text(String),
    /// Vendor payload without text content
    Raw(serde_json::Value),
}

impl Completion {
    /// Textual rendering of the completion
    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Raw(value) => value.to_string(),
        }
    }

    /// Whether the vendor returned text
    pub fn is_text(&self) -> bool {
        matches!(self, Completion::Text(_))
    }
}

/// Trait for LLM-based generation
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.5-flash)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run a single non-streaming completion for a prompt
    async fn complete(&self, prompt: &str) -> Result<Completion>;

    /// Ask a vision-capable model to follow `instruction` on an image
    async fn transcribe_image(
        &self,
        image: &[u8],
        mime_type: &str,
        instruction: &str,
    ) -> Result<Completion>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_text() {
        assert_eq!(Completion::Text("hi".into()).into_text(), "hi");
        let raw = Completion::Raw(serde_json::json!({"finishReason": "SAFETY"}));
        assert!(!raw.is_text());
        assert_eq!(raw.into_text(), r#"{"finishReason":"SAFETY"}"#);
    }
}
