mod common;

use self::common::{asset, load_matcher, read_asset};
use rstest::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracer_signature::process_identification::constants::COMPLETED_STATUS_MARKER;
use tracer_signature::process_identification::quality::{
    evaluate_fixtures, parse_command_log, parse_completed_processes, AliasMap, QualityEvaluator,
};
use tracer_signature::process_identification::rules::{parse_generated_rule, DropReason};
use tracer_signature::process_identification::script_block::{
    extract_targets, process_id_of, ExtractionErrorKind, ExtractionTarget, FsTemplateResolver,
};
use tracer_signature::process_identification::signature::SignatureMatcher;
use tracer_signature::utils::{read_sources, SourceFinder};

/// Extraction targets of every module of the test pipeline
#[fixture]
#[once]
fn targets() -> Vec<ExtractionTarget> {
    let paths = SourceFinder::new()
        .with_extension("nf")
        .find(&asset("pipeline/modules"));
    let sources = read_sources(paths)
        .into_iter()
        .filter(|(_, text)| process_id_of(text).is_some())
        .collect();
    Runtime::new().unwrap().block_on(extract_targets(
        sources,
        Arc::new(FsTemplateResolver::default()),
        4,
    ))
}

#[fixture]
fn matcher() -> SignatureMatcher {
    load_matcher()
}

fn target<'a>(targets: &'a [ExtractionTarget], process_id: &str) -> &'a ExtractionTarget {
    targets
        .iter()
        .find(|t| t.process_id.as_deref() == Some(process_id))
        .unwrap()
}

#[rstest]
fn test_bad_rules_are_dropped(matcher: SignatureMatcher) {
    let ids: Vec<&str> = matcher.rules().iter().map(|r| r.id()).collect();
    assert_eq!(
        ids,
        vec![
            "nextflow/core/FASTQC",
            "nextflow/core/TRIMGALORE",
            "nextflow/core/SAMTOOLS_SORT",
            "nextflow/core/SALMON_QUANT",
            "nextflow/core/MULTIQC",
        ]
    );
    let dropped = matcher.store().dropped();
    assert_eq!(dropped.len(), 2);
    assert_eq!(dropped[0].id, "nextflow/core/SAMTOOLS_FLAGSTAT");
    assert!(matches!(dropped[0].reason, DropReason::PatternCompile(_)));
    assert_eq!(dropped[1].reason, DropReason::DuplicateId);
    assert_eq!(
        matcher.store().compiled("nextflow/core/FASTQC").unwrap().source(),
        r"fastqc\s"
    );
}

#[rstest]
fn test_module_extraction(targets: &Vec<ExtractionTarget>) {
    assert_eq!(targets.len(), 8);

    let salmon = target(targets, "SALMON_QUANT");
    assert!(salmon.is_extractable());
    assert_eq!(salmon.segments.len(), 2);

    let fastqc = target(targets, "FASTQC");
    assert_eq!(fastqc.segments.len(), 1);
    assert_eq!(
        (fastqc.segments[0].start_line, fastqc.segments[0].end_line),
        (13, 18)
    );

    let deseq2 = target(targets, "DESEQ2_QC");
    assert!(deseq2.segments.is_empty());
    assert_eq!(deseq2.template_name().as_deref(), Some("deseq2_qc.r"));
    assert!(deseq2.is_extractable());

    let custom = target(targets, "CUSTOM_DUMPSOFTWAREVERSIONS");
    assert_eq!(custom.error, Some(ExtractionErrorKind::NoScriptBlock));
}

#[rstest]
fn test_shadowed_fixture_is_reported_as_ambiguous(matcher: SignatureMatcher) {
    let evaluations = evaluate_fixtures(&matcher);
    let trimgalore = evaluations
        .iter()
        .find(|e| e.rule_id == "nextflow/core/TRIMGALORE")
        .unwrap();
    assert_eq!(trimgalore.synthetic.true_positives, vec![0]);
    assert_eq!(trimgalore.synthetic.false_negatives, vec![1]);
    assert_eq!(
        trimgalore.synthetic.ambiguous_with,
        BTreeSet::from(["nextflow/core/FASTQC".to_string()])
    );

    let sort = evaluations
        .iter()
        .find(|e| e.rule_id == "nextflow/core/SAMTOOLS_SORT")
        .unwrap();
    assert!(sort.synthetic.passes());
}

#[rstest]
fn test_quality_report(matcher: SignatureMatcher, targets: &Vec<ExtractionTarget>) {
    let aliases = AliasMap::from_sources([read_asset("pipeline/workflows/rnaseq.nf")]);
    let logged = parse_completed_processes(&read_asset("nextflow.log"), COMPLETED_STATUS_MARKER);
    let commands = parse_command_log(&read_asset("commands.log"));
    assert_eq!(commands.len(), 6);

    let evaluator = QualityEvaluator::new(&matcher, &aliases, targets, commands.as_slice());
    let report = evaluator.report(logged.as_slice());

    let lines: Vec<String> = report.processes.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "FASTQC_RAW / FASTQC",
            "TRIMGALORE (False negative: Did not match for 1/2 tests)",
            "SAMTOOLS_SORT",
            "SAMTOOLS_INDEX (Cannot extract rule from source code: In progress, not yet extracted)",
            "SALMON_QUANT (Matched on synthetic fixtures, but not on real data)",
            "STRINGTIE (Cannot find process in source code: workflows)",
            "DESEQ2_QC (Cannot extract rule from source code: Cannot recognise dynamic script, deseq2_qc.r)",
            "GHOST (Cannot find process in source code: modules)",
            "MULTIQC (False negative: Did not match for 1/2 tests)",
            "CUSTOM_DUMPSOFTWAREVERSIONS (Cannot extract rule from source code: No script block)",
        ]
    );
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 8);

    let telemetry = evaluator.telemetry();
    assert_eq!(telemetry.total, 6);
    assert_eq!(telemetry.unmatched, 3);
    assert_eq!(telemetry.hits_for_process("SAMTOOLS_SORT").len(), 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["processes"][0]["process_name"], "FASTQC");
    assert_eq!(
        json["processes"][1]["ambiguous_with"][0],
        "nextflow/core/FASTQC"
    );
}

#[test]
fn test_convert_generated_responses() {
    let rule = parse_generated_rule(&read_asset("responses/samtools_index.txt")).unwrap();
    assert_eq!(rule.id, "nextflow/core/SAMTOOLS_INDEX");
    assert_eq!(rule.pattern, r"samtools index\s");
    assert_eq!(
        rule.test_fixtures[0].commands,
        vec!["samtools index -@ 3 WT_REP1.sorted.bam"]
    );

    assert!(parse_generated_rule(&read_asset("responses/truncated.txt")).is_err());
}
