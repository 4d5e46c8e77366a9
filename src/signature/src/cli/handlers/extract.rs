use crate::cli::helper::scan_targets;
use crate::config::Config;
use crate::process_identification::script_block::ExtractionTarget;
use anyhow::Result;
use itertools::Itertools;
use signature_common::{info_message, verdict_line, Colorize};
use std::path::Path;

pub async fn extract(config: &Config, modules: &Path, json: bool) -> Result<()> {
    let targets = scan_targets(config, modules).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
        return Ok(());
    }

    for target in &targets {
        verdict_line!(target.is_extractable(), "{}", describe(target));
    }
    info_message!(
        "{} processes, {} extractable",
        targets.len(),
        targets.iter().filter(|t| t.is_extractable()).count()
    );
    Ok(())
}

fn describe(target: &ExtractionTarget) -> String {
    let name = target.process_id.as_deref().unwrap_or("<unnamed>");
    let path = target.source_file.display();
    if let Some(error) = target.error {
        return format!("{} {} ({})", name, path, error);
    }
    if let Some(template) = target.template_name() {
        return format!("{} {} (template {})", name, path, template);
    }
    let lines = target
        .segments
        .iter()
        .map(|segment| format!("{}-{}", segment.start_line + 1, segment.end_line + 1))
        .join(", ");
    format!("{} {} (lines {})", name, path, lines)
}
