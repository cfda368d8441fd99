//! Cached analysis assembly.
//!
//! Per attempt the assembler moves between three states:
//!
//! ```text
//! NO_ANALYSIS --assemble(any)-------> FRESH   (score, store, return fresh)
//! CACHED      --assemble(false)-----> CACHED  (return stored snapshot)
//! CACHED      --assemble(true)------> FRESH   (rescore, replace, return fresh)
//! ```
//!
//! Calls for the same attempt are serialized so a double-submitted
//! regeneration cannot interleave its load, score and store steps with
//! another one. Different attempts never wait on each other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::analyze;
use crate::cache::AnalysisCache;
use crate::error::{AssembleError, CorruptCacheEntry};
use crate::model::{AnalysisSource, CacheKey, OverallAnalysis};
use crate::narrative::NarrativeWriter;
use crate::source::AttemptSource;

/// Builds analyses from raw attempt data, reusing cached snapshots.
pub struct AnalysisAssembler {
    source: Arc<dyn AttemptSource>,
    cache: Arc<dyn AnalysisCache>,
    narrative: Option<Arc<dyn NarrativeWriter>>,
    locks: KeyedLocks,
    computations: AtomicU64,
}

impl AnalysisAssembler {
    pub fn new(source: Arc<dyn AttemptSource>, cache: Arc<dyn AnalysisCache>) -> Self {
        Self {
            source,
            cache,
            narrative: None,
            locks: KeyedLocks::default(),
            computations: AtomicU64::new(0),
        }
    }

    /// Attach a narrative writer, invoked on fresh assemblies only.
    pub fn with_narrative(mut self, writer: Arc<dyn NarrativeWriter>) -> Self {
        self.narrative = Some(writer);
        self
    }

    /// How many times raw answers have been scored by this assembler.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Return the analysis for an attempt, scoring it only when needed.
    ///
    /// With `force_regenerate` the stored snapshot is ignored and replaced.
    /// A cache hit is returned unmodified apart from `source`.
    pub async fn assemble(
        &self,
        key: &CacheKey,
        force_regenerate: bool,
    ) -> Result<OverallAnalysis, AssembleError> {
        if key.is_blank() {
            return Err(AssembleError::MissingCacheKey);
        }
        let key = key.normalized();
        let attempt_id = key.attempt_id.as_str();

        let lock = self.locks.acquire(attempt_id).await;
        let result = self
            .assemble_locked(&key, attempt_id, &lock, force_regenerate)
            .await;
        self.locks.release(attempt_id, lock).await;
        result
    }

    /// Read the stored analysis without scoring anything.
    ///
    /// An entry that cannot be decoded, or that was written for a different
    /// attempt, reads as absent.
    pub async fn cached(&self, key: &CacheKey) -> Result<Option<OverallAnalysis>, AssembleError> {
        if key.is_blank() {
            return Err(AssembleError::MissingCacheKey);
        }
        let attempt_id = key.attempt_id.trim();
        let stored = match self.cache.get(attempt_id).await {
            Ok(stored) => stored,
            Err(e) if e.downcast_ref::<CorruptCacheEntry>().is_some() => {
                tracing::warn!("ignoring unreadable cached analysis for {attempt_id}: {e:#}");
                None
            }
            Err(source) => {
                return Err(AssembleError::CacheRead {
                    attempt_id: attempt_id.to_string(),
                    source,
                })
            }
        };

        let Some(mut analysis) = stored else {
            return Ok(None);
        };
        let recorded = analysis.key.attempt_id.trim();
        if recorded != attempt_id {
            tracing::warn!(
                "cached analysis under {attempt_id} was written for attempt {recorded}; ignoring it"
            );
            return Ok(None);
        }
        analysis.source = AnalysisSource::Cached;
        Ok(Some(analysis))
    }

    async fn assemble_locked(
        &self,
        key: &CacheKey,
        attempt_id: &str,
        lock: &Mutex<()>,
        force_regenerate: bool,
    ) -> Result<OverallAnalysis, AssembleError> {
        let _guard = lock.lock().await;

        if force_regenerate {
            tracing::info!("regenerating analysis for {key}");
        } else if let Some(stored) = self.lookup(key, attempt_id).await? {
            return Ok(stored);
        }

        self.regenerate(key, attempt_id).await
    }

    async fn lookup(
        &self,
        key: &CacheKey,
        attempt_id: &str,
    ) -> Result<Option<OverallAnalysis>, AssembleError> {
        let Some(stored) = self.cached(key).await? else {
            tracing::debug!("no cached analysis for {key}");
            return Ok(None);
        };

        if let (Some(requested), Some(recorded)) = (&key.session_id, &stored.key.session_id) {
            if requested != recorded {
                tracing::warn!(
                    "cached analysis for {attempt_id} belongs to session {recorded}, \
                     requested {requested}; regenerating"
                );
                return Ok(None);
            }
        }

        tracing::debug!("serving cached analysis {} for {key}", stored.analysis_id);
        Ok(Some(stored))
    }

    async fn regenerate(
        &self,
        key: &CacheKey,
        attempt_id: &str,
    ) -> Result<OverallAnalysis, AssembleError> {
        let data = self
            .source
            .load(key)
            .await
            .map_err(|source| AssembleError::AttemptLoad {
                attempt_id: attempt_id.to_string(),
                source,
            })?;

        let mut analysis = analyze(key, &data);
        self.computations.fetch_add(1, Ordering::Relaxed);

        if let Some(writer) = &self.narrative {
            match writer.interpret(&analysis).await {
                Ok(text) => analysis.narrative = Some(text),
                Err(e) => {
                    tracing::warn!("narrative writer '{}' failed for {key}: {e:#}", writer.name());
                }
            }
        }

        self.cache
            .put(attempt_id, &analysis)
            .await
            .map_err(|source| AssembleError::CacheWrite {
                attempt_id: attempt_id.to_string(),
                source,
            })?;

        tracing::info!(
            "assembled analysis {} for {key}: {} over {} categories",
            analysis.analysis_id,
            analysis.overall_risk,
            analysis.category_aggregates.len()
        );
        Ok(analysis)
    }
}

/// One async mutex per attempt id, dropped again once nobody holds it.
#[derive(Default)]
struct KeyedLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    async fn acquire(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().await;
        Arc::clone(map.entry(key.to_string()).or_default())
    }

    async fn release(&self, key: &str, lock: Arc<Mutex<()>>) {
        let mut map = self.inner.lock().await;
        // The map and `lock` are the only remaining handles.
        if Arc::strong_count(&lock) == 2 {
            map.remove(key);
        }
    }
}
