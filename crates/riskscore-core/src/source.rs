//! Exam data store port.
//!
//! The assembler only asks for raw attempt data when it actually has to
//! score; cache hits never reach a source.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{AttemptData, CacheKey};
use crate::parser::parse_attempt;

/// Supplies the questions and answers of one exam attempt.
#[async_trait]
pub trait AttemptSource: Send + Sync {
    /// Load raw data for an attempt. An attempt without answers is not an
    /// error; return empty data instead.
    async fn load(&self, key: &CacheKey) -> Result<AttemptData>;
}

/// In-memory source keyed by attempt id, counting loads.
#[derive(Debug, Default)]
pub struct InMemoryAttemptSource {
    attempts: HashMap<String, AttemptData>,
    load_count: AtomicU32,
}

impl InMemoryAttemptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attempt(mut self, attempt_id: impl Into<String>, data: AttemptData) -> Self {
        self.attempts.insert(attempt_id.into(), data);
        self
    }

    /// Number of times [`AttemptSource::load`] was called.
    pub fn load_count(&self) -> u32 {
        self.load_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AttemptSource for InMemoryAttemptSource {
    async fn load(&self, key: &CacheKey) -> Result<AttemptData> {
        self.load_count.fetch_add(1, Ordering::Relaxed);
        match self.attempts.get(&key.attempt_id) {
            Some(data) => Ok(data.clone()),
            None => {
                tracing::debug!("no raw data for attempt {key}, scoring empty attempt");
                Ok(AttemptData::default())
            }
        }
    }
}

/// Reads one attempt from a JSON or TOML file, whatever the key.
#[derive(Debug, Clone)]
pub struct FileAttemptSource {
    path: PathBuf,
}

impl FileAttemptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AttemptSource for FileAttemptSource {
    async fn load(&self, _key: &CacheKey) -> Result<AttemptData> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || parse_attempt(&path)).await?
    }
}
