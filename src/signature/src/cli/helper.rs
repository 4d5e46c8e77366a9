use crate::config::Config;
use crate::process_identification::rules::RuleStore;
use crate::process_identification::script_block::{
    extract_targets, process_id_of, ExtractionTarget, FsTemplateResolver,
};
use crate::process_identification::signature::SignatureMatcher;
use crate::utils::{read_sources, SourceFinder};
use anyhow::Result;
use signature_common::{warning_message, Colorize};
use std::path::Path;
use std::sync::Arc;

pub(super) fn load_matcher(config: &Config, rules: &Path) -> Result<SignatureMatcher> {
    let store = RuleStore::from_file(rules, &config.store_options())?;
    for dropped in store.dropped() {
        warning_message!("Rule {} dropped: {}", dropped.id, dropped.reason);
    }
    Ok(SignatureMatcher::new(Arc::new(store)))
}

/// Extraction targets of every `.nf` file under `modules` declaring a process
pub(super) async fn scan_targets(config: &Config, modules: &Path) -> Result<Vec<ExtractionTarget>> {
    let paths = SourceFinder::new().with_extension("nf").find(modules);
    let sources = read_sources(paths)
        .into_iter()
        .filter(|(_, text)| process_id_of(text).is_some())
        .collect();
    let resolver = Arc::new(FsTemplateResolver::new(config.template_dir.clone()));
    Ok(extract_targets(sources, resolver, config.extraction_concurrency).await)
}
