use crate::process_identification::script_block::target::{extract_target, TemplateResolver};
use crate::process_identification::script_block::types::ExtractionTarget;
use futures_util::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Extracts many source files with at most `concurrency` extractions in flight.
/// Targets come back ordered by source path whatever order they finished in.
pub async fn extract_targets<R>(
    sources: Vec<(PathBuf, String)>,
    resolver: Arc<R>,
    concurrency: usize,
) -> Vec<ExtractionTarget>
where
    R: TemplateResolver + Send + Sync + 'static,
{
    let total = sources.len();
    let mut targets: Vec<ExtractionTarget> = stream::iter(sources)
        .map(|(path, text)| {
            let resolver = Arc::clone(&resolver);
            tokio::task::spawn_blocking(move || extract_target(path, &text, resolver.as_ref()))
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|joined| async move {
            joined
                .inspect_err(|e| error!("Extraction task failed: {}", e))
                .ok()
        })
        .collect()
        .await;

    targets.sort_by(|a, b| a.source_file.cmp(&b.source_file));
    info!(
        "Extracted {} of {} source files ({} with errors)",
        targets.len(),
        total,
        targets.iter().filter(|t| !t.is_extractable()).count()
    );
    targets
}
