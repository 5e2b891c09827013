//! Configuration for the Q&A service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Optional chat model override
pub const CHAT_MODEL_ENV: &str = "GEMINI_CHAT_MODEL";
/// Optional embedding model override
pub const EMBED_MODEL_ENV: &str = "GEMINI_EMBED_MODEL";
/// Optional listen port override
pub const PORT_ENV: &str = "PORT";
/// Optional path to a TOML config file
pub const CONFIG_PATH_ENV: &str = "HUDU_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Gemini configuration
    pub llm: LlmConfig,
    /// Upload configuration
    pub upload: UploadConfig,
    /// Session lifecycle configuration
    pub sessions: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Overlap between neighbouring chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question
    pub top_k: usize,
    /// Texts per embedding request
    pub embed_batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            embed_batch_size: 100,
        }
    }
}

/// Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key, only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Generative Language API base URL
    pub base_url: String,
    /// Chat/vision model name
    pub chat_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Answer questions that come without a session
    pub general_queries: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            chat_model: "models/gemini-2.5-flash".to_string(),
            embed_model: "models/text-embedding-004".to_string(),
            temperature: 0.4,
            timeout_secs: 120,
            general_queries: true,
        }
    }
}

/// Which file types an upload may carry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadPolicy {
    /// Only `.pdf` uploads
    #[default]
    PdfOnly,
    /// Any extension the loader understands
    AllSupported,
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Accepted upload types
    pub accept: UploadPolicy,
    /// Directory for uploaded temp files
    pub temp_dir: PathBuf,
    /// Timeout for URL downloads in seconds
    pub download_timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accept: UploadPolicy::PdfOnly,
            temp_dir: std::env::temp_dir(),
            download_timeout_secs: 30,
        }
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time after which a session is evicted (seconds)
    pub idle_ttl_secs: u64,
    /// Maximum live sessions; the least recently used is evicted beyond this
    pub max_sessions: usize,
    /// Interval of the background eviction sweep (seconds)
    pub reap_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 3600,
            max_sessions: 100,
            reap_interval_secs: 60,
        }
    }
}

impl RagConfig {
    /// Load configuration: defaults, then an optional TOML file, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            Error::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("hudu-rag").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.llm.api_key = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty());

        if let Some(model) = lookup(CHAT_MODEL_ENV).filter(|m| !m.is_empty()) {
            self.llm.chat_model = model;
        }
        if let Some(model) = lookup(EMBED_MODEL_ENV).filter(|m| !m.is_empty()) {
            self.llm.embed_model = model;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid {}: {}", PORT_ENV, port)))?;
        }

        Ok(())
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("top_k must be positive".to_string()));
        }
        if self.retrieval.embed_batch_size == 0 {
            return Err(Error::Config("embed_batch_size must be positive".to_string()));
        }
        if self.sessions.max_sessions == 0 {
            return Err(Error::Config("max_sessions must be positive".to_string()));
        }
        Ok(())
    }

    /// Whether the Gemini credential is present
    pub fn api_key_configured(&self) -> bool {
        self.llm.api_key.is_some()
    }
}
