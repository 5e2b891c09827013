//! # hudu-rag
//!
//! Session-scoped document Q&A for Kenyan government information
//! (HuduAssist KE).
//!
//! ## Pipeline
//!
//! 1. **Load**: PDF, CSV, DOC/DOCX and images become document units
//! 2. **Chunk**: boundary-aware overlapping chunks
//! 3. **Index**: chunks embedded through an [`providers::EmbeddingProvider`]
//! 4. **Answer**: top-k retrieval, prompt assembly, one chat completion
//!
//! Each upload gets its own session holding a pipeline; questions without a
//! session are answered in general mode.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::AnsweringPipeline;
pub use providers::{Completion, EmbeddingProvider, LlmProvider, Providers};
pub use server::RagServer;
pub use session::SessionRegistry;
