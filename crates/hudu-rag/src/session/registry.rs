//! Session registry with idle expiry and capacity eviction

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::generation::AnsweringPipeline;
use crate::types::SessionSummary;

/// One uploaded source and its pipeline
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session identifier
    pub id: String,
    /// Original filename of the upload
    pub filename: String,
    /// Pipeline answering questions for this session
    pub pipeline: Arc<AnsweringPipeline>,
    /// Temp file owned by the session, removed on release
    pub temp_path: Option<PathBuf>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    last_accessed: Instant,
    sequence: u64,
}

impl Session {
    /// Time since the session was last used
    pub fn idle_for(&self) -> Duration {
        self.last_accessed.elapsed()
    }

    fn release(self) {
        let Some(path) = self.temp_path else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Removed temp file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove temp file {} for session {}: {}",
                path.display(),
                self.id,
                e
            ),
        }
    }
}

/// Concurrency-safe map of session id to session
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
    idle_ttl: Duration,
    max_sessions: usize,
    sequence: AtomicU64,
}

impl SessionRegistry {
    /// Create a registry
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
            sequence: AtomicU64::new(0),
        }
    }

    /// Create a registry from configuration
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(Duration::from_secs(config.idle_ttl_secs), config.max_sessions)
    }

    /// Register a pipeline and return its session id
    ///
    /// A supplied id replaces any existing session under that id.
    pub fn create(
        &self,
        pipeline: Arc<AnsweringPipeline>,
        filename: impl Into<String>,
        temp_path: Option<PathBuf>,
        session_id: Option<String>,
    ) -> String {
        let id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        if !self.sessions.contains_key(&id) {
            self.make_room();
        }

        let session = Session {
            id: id.clone(),
            filename: filename.into(),
            pipeline,
            temp_path,
            created_at: Utc::now(),
            last_accessed: Instant::now(),
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
        };
        let new_path = session.temp_path.clone();

        if let Some(mut displaced) = self.sessions.insert(id.clone(), session) {
            tracing::info!("Session {} replaced", id);
            if displaced.temp_path == new_path {
                displaced.temp_path = None;
            }
            displaced.release();
        }

        tracing::info!("Session {} created ({} active)", id, self.sessions.len());
        id
    }

    /// Look up a session, refreshing its last access time
    pub fn get(&self, session_id: &str) -> Result<Session> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        entry.last_accessed = Instant::now();
        Ok(entry.value().clone())
    }

    /// Remove a session and release its temp file
    pub fn delete(&self, session_id: &str) -> Result<()> {
        let (_, session) = self
            .sessions
            .remove(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        session.release();
        tracing::info!("Session {} deleted", session_id);
        Ok(())
    }

    /// Sessions in creation order
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<(u64, SessionSummary)> = self
            .sessions
            .iter()
            .map(|entry| {
                (
                    entry.sequence,
                    SessionSummary {
                        session_id: entry.id.clone(),
                        filename: entry.filename.clone(),
                    },
                )
            })
            .collect();
        sessions.sort_by_key(|(sequence, _)| *sequence);
        sessions.into_iter().map(|(_, summary)| summary).collect()
    }

    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are active
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for longer than the TTL; returns how many
    pub fn evict_expired(&self) -> usize {
        let expired: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.idle_for() >= self.idle_ttl)
            .map(|entry| entry.key().clone())
            .collect();

        let mut evicted = 0;
        for id in expired {
            let removed = self
                .sessions
                .remove_if(&id, |_, session| session.idle_for() >= self.idle_ttl);
            if let Some((_, session)) = removed {
                tracing::info!("Session {} expired after {:?} idle", id, session.idle_for());
                session.release();
                evicted += 1;
            }
        }
        evicted
    }

    /// Evict least-recently-used sessions until a new one fits
    fn make_room(&self) {
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.last_accessed)
                .map(|entry| entry.key().clone());

            let Some(id) = oldest else {
                break;
            };
            if let Some((_, session)) = self.sessions.remove(&id) {
                tracing::info!("Session {} evicted (capacity {})", id, self.max_sessions);
                session.release();
            }
        }
    }

    /// Periodically evict expired sessions
    pub fn spawn_reaper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = registry.evict_expired();
                if evicted > 0 {
                    tracing::info!(
                        "Reaper evicted {} idle sessions ({} active)",
                        evicted,
                        registry.len()
                    );
                }
            }
        })
    }
}
