//! The `riskscore analyze` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use riskscore_core::assembler::AnalysisAssembler;
use riskscore_core::cache::JsonFileAnalysisCache;
use riskscore_core::model::CacheKey;
use riskscore_core::narrative::MockNarrativeWriter;
use riskscore_core::source::FileAttemptSource;

use crate::config::load_config_from;

/// Options for a single analyze run.
pub struct AnalyzeArgs {
    pub attempt: PathBuf,
    pub key: String,
    pub session: Option<String>,
    pub force: bool,
    pub cache_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let cache_dir = args.cache_dir.unwrap_or(config.cache_dir);
    let format = args.format.unwrap_or(config.default_format);
    super::check_format(&format)?;

    let mut key = CacheKey::new(args.key);
    if let Some(session) = args.session {
        key = key.with_session(session);
    }

    tracing::debug!("analyzing {key} with cache at {}", cache_dir.display());

    let source = Arc::new(FileAttemptSource::new(args.attempt));
    let cache = Arc::new(JsonFileAnalysisCache::new(cache_dir));
    let mut assembler = AnalysisAssembler::new(source, cache);
    if config.narrative {
        assembler = assembler.with_narrative(Arc::new(MockNarrativeWriter::new()));
    }

    let analysis = assembler.assemble(&key, args.force).await?;
    super::print_analysis(&analysis, &format)
}
