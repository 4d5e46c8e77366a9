use crate::process_identification::quality::aliases::AliasMap;
use crate::process_identification::quality::attribution::{AttributionGap, ProcessResolver};
use crate::process_identification::quality::evaluator::{
    aggregate_by_process, classify, evaluate_fixtures, evaluate_telemetry, RuleClassification,
    RuleEvaluation, SyntheticResult, TelemetryEvaluation,
};
use crate::process_identification::script_block::ExtractionTarget;
use crate::process_identification::signature::SignatureMatcher;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailReason {
    #[error("{gap}")]
    Attribution { gap: AttributionGap },
    #[error("False negative: Did not match for {missed}/{total} tests")]
    FalseNegative { missed: usize, total: usize },
    #[error("False positive: Matched, but possibly confused with: {}", .confused_with.join(", "))]
    FalsePositive { confused_with: Vec<String> },
    #[error("Matched on synthetic fixtures, but not on real data")]
    SyntheticOnly,
}

impl FailReason {
    pub fn from_classification(classification: RuleClassification) -> Option<Self> {
        match classification {
            RuleClassification::Pass => None,
            RuleClassification::FalseNegative { missed, total } => {
                Some(FailReason::FalseNegative { missed, total })
            }
            RuleClassification::FalsePositive { confused_with } => {
                Some(FailReason::FalsePositive { confused_with })
            }
            RuleClassification::SyntheticOnly => Some(FailReason::SyntheticOnly),
        }
    }
}

/// Verdict for one process seen completing in a real run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub logged_as: String,
    /// Declared name, when the workflow includes resolve it
    pub process_name: Option<String>,
    pub rule_ids: Vec<String>,
    pub real_hits: usize,
    pub failure: Option<FailReason>,
    /// Rules that took this process's fixture commands although its own rules matched too
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub ambiguous_with: BTreeSet<String>,
}

impl ProcessReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for ProcessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.logged_as)?;
        if let Some(process_name) = self
            .process_name
            .as_deref()
            .filter(|name| *name != self.logged_as)
        {
            write!(f, " / {}", process_name)?;
        }
        if let Some(failure) = &self.failure {
            write!(f, " ({})", failure)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityReport {
    pub processes: Vec<ProcessReport>,
}

impl QualityReport {
    pub fn passed(&self) -> usize {
        self.processes.iter().filter(|p| p.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.processes.len() - self.passed()
    }
}

/// Scores the rule set against its fixtures and one real run.
#[derive(Debug)]
pub struct QualityEvaluator<'a> {
    resolver: ProcessResolver<'a>,
    rule_evaluations: Vec<RuleEvaluation>,
    by_process: HashMap<String, SyntheticResult>,
    telemetry: TelemetryEvaluation,
}

impl<'a> QualityEvaluator<'a> {
    pub fn new<S: AsRef<str>>(
        matcher: &'a SignatureMatcher,
        aliases: &'a AliasMap,
        targets: &'a [ExtractionTarget],
        real_commands: &[S],
    ) -> Self {
        let rule_evaluations = evaluate_fixtures(matcher);
        let by_process = aggregate_by_process(&rule_evaluations);
        let telemetry = evaluate_telemetry(matcher, real_commands);
        Self {
            resolver: ProcessResolver::new(aliases, targets, matcher),
            rule_evaluations,
            by_process,
            telemetry,
        }
    }

    pub fn rule_evaluations(&self) -> &[RuleEvaluation] {
        &self.rule_evaluations
    }

    pub fn telemetry(&self) -> &TelemetryEvaluation {
        &self.telemetry
    }

    pub fn evaluate_process(&self, logged_as: &str) -> ProcessReport {
        let mut report = ProcessReport {
            logged_as: logged_as.to_string(),
            process_name: self.resolver.process_name(logged_as).map(str::to_string),
            rule_ids: Vec::new(),
            real_hits: 0,
            failure: None,
            ambiguous_with: BTreeSet::new(),
        };

        let attribution = match self.resolver.attribute(logged_as) {
            Ok(attribution) => attribution,
            Err(gap) => {
                report.failure = Some(FailReason::Attribution { gap });
                return report;
            }
        };

        report.rule_ids = attribution
            .rules
            .iter()
            .map(|rule| rule.id().to_string())
            .collect();
        report.real_hits = self
            .telemetry
            .hits_for_process(attribution.process_name)
            .len();

        let synthetic = self
            .by_process
            .get(attribution.process_name)
            .cloned()
            .unwrap_or_default();
        report.ambiguous_with = synthetic.ambiguous_with.clone();
        report.failure = FailReason::from_classification(classify(&synthetic, report.real_hits));
        report
    }

    /// One entry per logged process, in logged order
    pub fn report<S: AsRef<str>>(&self, logged_processes: &[S]) -> QualityReport {
        let processes: Vec<ProcessReport> = logged_processes
            .iter()
            .map(|logged_as| self.evaluate_process(logged_as.as_ref()))
            .collect();
        let report = QualityReport { processes };
        info!(
            "Quality report: {} passed, {} failed",
            report.passed(),
            report.failed()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_identification::script_block::ExtractionErrorKind;
    use crate::process_identification::test_utils::{matcher, rule_with_fixtures};
    use std::path::PathBuf;

    fn target(process_id: &str) -> ExtractionTarget {
        ExtractionTarget {
            process_id: Some(process_id.to_string()),
            source_file: PathBuf::from("main.nf"),
            segments: Vec::new(),
            template_file: None,
            error: None,
        }
    }

    #[test]
    fn test_report_in_logged_order_with_reasons() {
        let matcher = matcher(vec![
            rule_with_fixtures("nextflow/core/FASTQC", r"^fastqc\s", vec![vec!["fastqc a.fq"]]),
            rule_with_fixtures(
                "nextflow/core/MULTIQC",
                r"^multiqc\s",
                vec![vec!["multiqc ."], vec!["fastqc b.fq"]],
            ),
            rule_with_fixtures("nextflow/core/GZIP", r"^gzip", vec![vec!["gzip -d x"]]),
        ]);
        let aliases = AliasMap::from_sources([
            "include { FASTQC as FASTQC_RAW; MULTIQC; GZIP; UNTRACKED } from './m'",
        ]);
        let mut broken = target("UNTRACKED");
        broken.error = Some(ExtractionErrorKind::NoExecutableContent);
        let targets = vec![target("FASTQC"), target("MULTIQC"), target("GZIP"), broken];
        let commands = ["fastqc s1.fq", "ls"];

        let evaluator = QualityEvaluator::new(&matcher, &aliases, &targets, &commands);
        let report = evaluator.report(&["MULTIQC", "FASTQC_RAW", "GZIP", "UNTRACKED", "NOPE"]);

        let lines: Vec<String> = report.processes.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "MULTIQC (False negative: Did not match for 1/2 tests)",
                "FASTQC_RAW / FASTQC",
                "GZIP (Matched on synthetic fixtures, but not on real data)",
                "UNTRACKED (Cannot extract rule from source code: No executable content in script block)",
                "NOPE (Cannot find process in source code: workflows)",
            ]
        );
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 4);
        assert_eq!(report.processes[1].real_hits, 1);
        assert_eq!(report.processes[1].rule_ids, vec!["nextflow/core/FASTQC"]);
    }

    #[test]
    fn test_false_positive_message() {
        let reason = FailReason::FalsePositive {
            confused_with: vec!["nextflow/core/A".into(), "nextflow/core/B".into()],
        };
        assert_eq!(
            reason.to_string(),
            "False positive: Matched, but possibly confused with: nextflow/core/A, nextflow/core/B"
        );
    }
}
