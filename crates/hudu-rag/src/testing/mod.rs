//! Fake providers and fixtures shared by unit tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::AnsweringPipeline;
use crate::providers::{Completion, EmbeddingProvider, LlmProvider, Providers};

mod documents;
mod fakes;

pub use documents::*;
pub use fakes::*;

pub fn fake_providers() -> Providers {
    Providers::new(Arc::new(BagOfWordsEmbedder), Arc::new(EchoLlm))
}

/// Build a pipeline over a one-row CSV holding `text`
pub async fn pipeline_for(dir: &Path, text: &str) -> Arc<AnsweringPipeline> {
    let path = dir.join(format!("{}.csv", uuid::Uuid::new_v4()));
    std::fs::write(&path, format!("info\n\"{}\"\n", text)).unwrap();
    let pipeline = AnsweringPipeline::build(&path, &fake_providers(), &RagConfig::default())
        .await
        .unwrap();
    Arc::new(pipeline)
}
