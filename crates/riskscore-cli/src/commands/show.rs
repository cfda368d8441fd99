//! The `riskscore show` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use riskscore_core::assembler::AnalysisAssembler;
use riskscore_core::cache::JsonFileAnalysisCache;
use riskscore_core::model::CacheKey;
use riskscore_core::source::InMemoryAttemptSource;

use crate::config::load_config_from;

pub async fn execute(
    key: String,
    cache_dir: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let cache_dir = cache_dir.unwrap_or(config.cache_dir);
    let format = format.unwrap_or(config.default_format);
    super::check_format(&format)?;

    // Reads only; the source is never consulted.
    let assembler = AnalysisAssembler::new(
        Arc::new(InMemoryAttemptSource::new()),
        Arc::new(JsonFileAnalysisCache::new(cache_dir)),
    );

    let key = CacheKey::new(key);
    match assembler.cached(&key).await? {
        Some(analysis) => super::print_analysis(&analysis, &format),
        None => anyhow::bail!(
            "no cached analysis for attempt '{}'; run `riskscore analyze` first",
            key.attempt_id
        ),
    }
}
