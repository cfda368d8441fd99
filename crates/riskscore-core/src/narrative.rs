//! Narrative interpretation seam.
//!
//! The written interpretation of an analysis is produced by an external
//! service. It is the expensive step that cached analyses exist to avoid,
//! and it is allowed to fail or be skipped.

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::model::OverallAnalysis;

/// Writes a narrative interpretation for a freshly assembled analysis.
#[async_trait]
pub trait NarrativeWriter: Send + Sync {
    /// Human-readable writer name, used in logs.
    fn name(&self) -> &str;

    async fn interpret(&self, analysis: &OverallAnalysis) -> Result<String>;
}

/// Deterministic writer summarising the analysis from its own fields.
#[derive(Debug, Default)]
pub struct MockNarrativeWriter {
    fail: bool,
    call_count: AtomicU32,
}

impl MockNarrativeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer whose every call fails, as an unreachable service would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NarrativeWriter for MockNarrativeWriter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn interpret(&self, analysis: &OverallAnalysis) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            anyhow::bail!("narrative service unavailable");
        }

        let mut text = format!(
            "Resultado global: {} ({} de {} puntos posibles en {} preguntas).",
            analysis.overall_risk,
            analysis.total_score,
            analysis.total_questions * 3,
            analysis.total_questions
        );
        if !analysis.flags.high_risk_categories.is_empty() {
            text.push_str(&format!(
                " Áreas de riesgo alto: {}.",
                analysis.flags.high_risk_categories.join(", ")
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::model::{AttemptData, CacheKey};

    #[tokio::test]
    async fn mock_writer_summarises_and_counts() {
        let writer = MockNarrativeWriter::new();
        let analysis = analyze(&CacheKey::new("a"), &AttemptData::default());
        let text = writer.interpret(&analysis).await.unwrap();
        assert!(text.contains("RIESGO BAJO"));
        assert_eq!(writer.call_count(), 1);
    }

    #[tokio::test]
    async fn failing_writer_errors() {
        let writer = MockNarrativeWriter::failing();
        let analysis = analyze(&CacheKey::new("a"), &AttemptData::default());
        assert!(writer.interpret(&analysis).await.is_err());
    }
}
