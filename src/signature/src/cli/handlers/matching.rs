use crate::cli::helper::load_matcher;
use crate::config::Config;
use crate::process_identification::quality::parse_command_line;
use anyhow::{Context, Result};
use itertools::Itertools;
use signature_common::{info_message, verdict_line, Colorize};
use std::path::Path;

pub fn match_command(config: &Config, rules: &Path, command: &str) -> Result<()> {
    let matcher = load_matcher(config, rules)?;
    let command = parse_command_line(command).context("Empty command")?;

    let candidates = matcher.candidates(&command);
    match candidates.split_first() {
        Some((winner, shadowed)) => {
            verdict_line!(true, "{} ({})", winner.id(), winner.rule.label);
            if !shadowed.is_empty() {
                info_message!(
                    "Also matched by: {}",
                    shadowed.iter().map(|rule| rule.id()).join(", ")
                );
            }
        }
        None => verdict_line!(false, "No rule matched '{}'", command),
    }
    Ok(())
}
