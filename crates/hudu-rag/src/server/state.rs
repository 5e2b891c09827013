//! Application state for the HTTP server

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::Providers;
use crate::session::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Live sessions
    sessions: Arc<SessionRegistry>,
    /// Vendor providers, or why they could not be created
    providers: std::result::Result<Providers, String>,
    /// Client for URL downloads
    http: reqwest::Client,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with Gemini providers
    ///
    /// A missing API key does not fail startup; the service runs degraded.
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let providers = Providers::gemini(&config).map_err(|e| {
            tracing::warn!("Providers unavailable, running degraded: {}", e);
            e.to_string()
        });

        Self::build(config, providers)
    }

    /// Create state with the given providers
    pub fn with_providers(config: RagConfig, providers: Providers) -> Result<Self> {
        Self::build(config, Ok(providers))
    }

    fn build(
        config: RagConfig,
        providers: std::result::Result<Providers, String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upload.download_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let sessions = Arc::new(SessionRegistry::from_config(&config.sessions));
        tracing::info!(
            "Session registry initialized (ttl {}s, capacity {})",
            config.sessions.idle_ttl_secs,
            config.sessions.max_sessions
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                providers,
                http,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the session registry
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.inner.sessions
    }

    /// Get providers, or a configuration error when they failed to start
    pub fn providers(&self) -> Result<&Providers> {
        self.inner
            .providers
            .as_ref()
            .map_err(|reason| Error::Config(reason.clone()))
    }

    /// Why providers failed to initialise, if they did
    pub fn provider_error(&self) -> Option<&str> {
        self.inner.providers.as_ref().err().map(String::as_str)
    }

    /// Get the download client
    pub fn http_client(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
