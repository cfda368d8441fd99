//! Analysis cache port and its implementations.
//!
//! The port only exposes whole-record `get` and `put`. There is no way to
//! update part of a stored analysis, so a reader never sees category data
//! from one generation next to an overall risk from another.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CorruptCacheEntry;
use crate::model::OverallAnalysis;

/// Keyed store of assembled analyses, one entry per exam attempt.
#[async_trait]
pub trait AnalysisCache: Send + Sync {
    /// Fetch the stored analysis for an attempt, if any.
    async fn get(&self, attempt_id: &str) -> Result<Option<OverallAnalysis>>;

    /// Replace the stored analysis for an attempt with a full snapshot.
    async fn put(&self, attempt_id: &str, analysis: &OverallAnalysis) -> Result<()>;
}

/// Process-local cache, mostly for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisCache {
    entries: RwLock<HashMap<String, OverallAnalysis>>,
}

impl InMemoryAnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisCache for InMemoryAnalysisCache {
    async fn get(&self, attempt_id: &str) -> Result<Option<OverallAnalysis>> {
        Ok(self.entries.read().await.get(attempt_id).cloned())
    }

    async fn put(&self, attempt_id: &str, analysis: &OverallAnalysis) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(attempt_id.to_string(), analysis.clone());
        Ok(())
    }
}

/// One JSON file per attempt under a directory.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so a reader sees either the old snapshot or the
/// new one.
#[derive(Debug, Clone)]
pub struct JsonFileAnalysisCache {
    dir: PathBuf,
}

impl JsonFileAnalysisCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing an attempt.
    pub fn path_for(&self, attempt_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_file_stem(attempt_id)))
    }
}

#[async_trait]
impl AnalysisCache for JsonFileAnalysisCache {
    async fn get(&self, attempt_id: &str) -> Result<Option<OverallAnalysis>> {
        let path = self.path_for(attempt_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to read cache file {}", path.display())))
            }
        };
        let analysis: OverallAnalysis = serde_json::from_str(&content)
            .map_err(|source| CorruptCacheEntry { path, source })?;
        Ok(Some(analysis))
    }

    async fn put(&self, attempt_id: &str, analysis: &OverallAnalysis) -> Result<()> {
        let json =
            serde_json::to_vec_pretty(analysis).context("failed to serialize analysis")?;
        let dir = self.dir.clone();
        let path = self.path_for(attempt_id);

        tokio::task::spawn_blocking(move || -> Result<()> {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create cache dir {}", dir.display()))?;
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)
                .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
            tmp.write_all(&json)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path)
                .with_context(|| format!("failed to write cache file {}", path.display()))?;
            Ok(())
        })
        .await
        .context("cache write task panicked")?
    }
}

/// Encode an attempt id as a file name.
///
/// ASCII letters, digits, `-` and `_` pass through; every other byte is
/// written as `%XX`. Distinct ids always get distinct files.
fn sanitize_file_stem(attempt_id: &str) -> String {
    let mut stem = String::with_capacity(attempt_id.len());
    for byte in attempt_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}
