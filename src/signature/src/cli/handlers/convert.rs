use crate::process_identification::rules::parse_generated_rule;
use crate::utils::{read_sources, SourceFinder};
use anyhow::{Context, Result};
use signature_common::{success_message, warning_message, Colorize};
use std::path::Path;

/// Converts every generator response under `input` into one rule collection
pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let sources = read_sources(SourceFinder::new().find(input));
    let total = sources.len();

    let mut rules = Vec::with_capacity(total);
    for (path, response) in sources {
        match parse_generated_rule(&response) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                warning_message!("Skipping {}: {:#}", path.display(), e);
            }
        }
    }

    let json = serde_json::to_string_pretty(&rules)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    success_message!(
        "Wrote {} of {} rules to {}",
        rules.len(),
        total,
        output.display()
    );
    Ok(())
}
