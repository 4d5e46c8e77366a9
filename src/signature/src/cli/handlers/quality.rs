use crate::cli::commands::QualityArgs;
use crate::cli::helper::{load_matcher, scan_targets};
use crate::config::Config;
use crate::process_identification::quality::{
    parse_command_log, parse_completed_processes, AliasMap, QualityEvaluator,
};
use crate::utils::{read_sources, read_text, SourceFinder};
use anyhow::Result;
use signature_common::{info_message, verdict_line, warning_message, Colorize};
use std::path::PathBuf;

pub async fn quality(config: &Config, args: &QualityArgs) -> Result<()> {
    let matcher = load_matcher(config, &args.rules)?;
    let targets = scan_targets(config, &args.modules).await?;

    let workflow_files: Vec<PathBuf> = args
        .workflows
        .iter()
        .flat_map(|path| {
            if path.is_dir() {
                SourceFinder::new().with_extension("nf").find(path)
            } else {
                vec![path.clone()]
            }
        })
        .collect();
    let workflows = read_sources(workflow_files);
    let aliases = AliasMap::from_sources(workflows.iter().map(|(_, text)| text));

    let logged = parse_completed_processes(
        &read_text(&args.completion_log)?,
        &config.completion_marker,
    );
    if logged.is_empty() {
        warning_message!(
            "No completed processes found in {}",
            args.completion_log.display()
        );
    }
    let commands = parse_command_log(&read_text(&args.commands)?);

    let evaluator = QualityEvaluator::new(&matcher, &aliases, &targets, commands.as_slice());
    let report = evaluator.report(logged.as_slice());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for process in &report.processes {
        verdict_line!(process.passed(), "{}", process);
    }
    let telemetry = evaluator.telemetry();
    info_message!(
        "{} of {} processes passed, {} of {} commands attributed",
        report.passed(),
        report.processes.len(),
        telemetry.total - telemetry.unmatched,
        telemetry.total
    );
    Ok(())
}
