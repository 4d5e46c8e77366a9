use crate::cli::helper::load_matcher;
use crate::config::Config;
use crate::process_identification::quality::{classify_synthetic, evaluate_fixtures, FailReason};
use anyhow::Result;
use itertools::Itertools;
use signature_common::{info_message, verdict_line, Colorize};
use std::path::Path;

pub fn check(config: &Config, rules: &Path, json: bool) -> Result<()> {
    let matcher = load_matcher(config, rules)?;
    let evaluations = evaluate_fixtures(&matcher);

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluations)?);
        return Ok(());
    }

    let mut passed = 0;
    for evaluation in &evaluations {
        match FailReason::from_classification(classify_synthetic(&evaluation.synthetic)) {
            Some(reason) => verdict_line!(false, "{} ({})", evaluation.rule_id, reason),
            None => {
                passed += 1;
                verdict_line!(true, "{}", evaluation.rule_id);
            }
        }
        if !evaluation.synthetic.ambiguous_with.is_empty() {
            info_message!(
                "{} also matches commands taken by: {}",
                evaluation.rule_id,
                evaluation.synthetic.ambiguous_with.iter().join(", ")
            );
        }
    }
    info_message!(
        "{} of {} rules pass their fixtures",
        passed,
        evaluations.len()
    );
    Ok(())
}
