//! Shared helpers for HTTP-level tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use std::path::Path;
use std::sync::Arc;

use hudu_rag::config::{RagConfig, UploadPolicy};
use hudu_rag::server::state::AppState;
use hudu_rag::{Completion, EmbeddingProvider, Error, LlmProvider, Providers, RagServer, Result};

#[path = "../../src/testing/documents.rs"]
mod documents;
#[path = "../../src/testing/fakes.rs"]
mod fakes;

pub use documents::*;
pub use fakes::*;

pub const BOUNDARY: &str = "hudu-test-boundary";

pub fn test_config(temp_dir: &Path, accept: UploadPolicy) -> RagConfig {
    let mut config = RagConfig::default();
    config.upload.temp_dir = temp_dir.to_path_buf();
    config.upload.accept = accept;
    config
}

pub fn test_app(config: RagConfig) -> (Router, AppState) {
    test_app_with(
        config,
        Providers::new(Arc::new(BagOfWordsEmbedder), Arc::new(EchoLlm)),
    )
}

pub fn test_app_with(config: RagConfig, providers: Providers) -> (Router, AppState) {
    let state = AppState::with_providers(config, providers).expect("state");
    let router = RagServer::with_state(state.clone()).build_router();
    (router, state)
}

pub fn multipart_upload(filename: &str, data: &[u8], session_id: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY,
            f = filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    if let Some(id) = session_id {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"session_id\"\r\n\r\n{id}\r\n",
                b = BOUNDARY,
                id = id
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
