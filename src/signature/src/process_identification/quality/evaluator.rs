use crate::process_identification::rules::{process_name_of, CompiledRule};
use crate::process_identification::signature::SignatureMatcher;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureOutcome {
    TruePositive,
    FalseNegative,
}

/// How a rule fared on its own synthetic fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyntheticResult {
    /// Fixture indices where at least one command was attributed to the rule
    pub true_positives: Vec<usize>,
    pub false_negatives: Vec<usize>,
    /// Ids of other rules that took one of the fixture commands
    pub false_positives: BTreeSet<String>,
    /// Those false positives where the rule's own pattern matched too but loaded later
    pub ambiguous_with: BTreeSet<String>,
}

impl SyntheticResult {
    pub fn total(&self) -> usize {
        self.true_positives.len() + self.false_negatives.len()
    }

    pub fn passes(&self) -> bool {
        self.false_negatives.is_empty() && self.false_positives.is_empty()
    }

    pub fn merge(&mut self, other: &SyntheticResult) {
        self.true_positives.extend(&other.true_positives);
        self.false_negatives.extend(&other.false_negatives);
        self.false_positives
            .extend(other.false_positives.iter().cloned());
        self.ambiguous_with
            .extend(other.ambiguous_with.iter().cloned());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleEvaluation {
    pub rule_id: String,
    pub outcomes: Vec<FixtureOutcome>,
    #[serde(flatten)]
    pub synthetic: SyntheticResult,
}

impl RuleEvaluation {
    pub fn process_name(&self) -> &str {
        process_name_of(&self.rule_id)
    }
}

pub fn evaluate_rule(matcher: &SignatureMatcher, rule: &CompiledRule) -> RuleEvaluation {
    let mut synthetic = SyntheticResult::default();
    let mut outcomes = Vec::with_capacity(rule.rule.test_fixtures.len());

    for (idx, fixture) in rule.rule.test_fixtures.iter().enumerate() {
        let mut attributed = false;
        for command in &fixture.commands {
            match matcher.match_command(command) {
                Some(winner) if winner.id() == rule.id() => attributed = true,
                Some(winner) => {
                    synthetic.false_positives.insert(winner.id().to_string());
                    if rule.is_match(command) {
                        synthetic.ambiguous_with.insert(winner.id().to_string());
                    }
                }
                None => {}
            }
        }

        let outcome = if attributed {
            synthetic.true_positives.push(idx);
            FixtureOutcome::TruePositive
        } else {
            synthetic.false_negatives.push(idx);
            FixtureOutcome::FalseNegative
        };
        outcomes.push(outcome);
    }

    debug!(
        "Rule {}: {}/{} fixtures attributed, {} confusions",
        rule.id(),
        synthetic.true_positives.len(),
        synthetic.total(),
        synthetic.false_positives.len()
    );
    RuleEvaluation {
        rule_id: rule.id().to_string(),
        outcomes,
        synthetic,
    }
}

/// Evaluates every active rule against its own fixtures, in load order
pub fn evaluate_fixtures(matcher: &SignatureMatcher) -> Vec<RuleEvaluation> {
    matcher
        .rules()
        .iter()
        .map(|rule| evaluate_rule(matcher, rule))
        .collect()
}

/// Folds rule results into one result per process name
pub fn aggregate_by_process(evaluations: &[RuleEvaluation]) -> HashMap<String, SyntheticResult> {
    let mut by_process: HashMap<String, SyntheticResult> = HashMap::new();
    for evaluation in evaluations {
        by_process
            .entry(evaluation.process_name().to_string())
            .or_default()
            .merge(&evaluation.synthetic);
    }
    by_process
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryHit {
    pub rule_id: String,
    pub command: String,
}

/// Real commands attributed by the matcher, grouped by process name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetryEvaluation {
    pub by_process: HashMap<String, Vec<TelemetryHit>>,
    pub unmatched: usize,
    pub total: usize,
}

impl TelemetryEvaluation {
    pub fn hits_for_process(&self, process_name: &str) -> &[TelemetryHit] {
        self.by_process
            .get(process_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn hits_for_rule(&self, rule_id: &str) -> usize {
        self.hits_for_process(process_name_of(rule_id))
            .iter()
            .filter(|hit| hit.rule_id == rule_id)
            .count()
    }
}

pub fn evaluate_telemetry<S: AsRef<str>>(
    matcher: &SignatureMatcher,
    commands: &[S],
) -> TelemetryEvaluation {
    let mut evaluation = TelemetryEvaluation {
        total: commands.len(),
        ..TelemetryEvaluation::default()
    };
    for command in commands {
        let command = command.as_ref();
        match matcher.match_command(command) {
            Some(rule) => evaluation
                .by_process
                .entry(rule.process_name().to_string())
                .or_default()
                .push(TelemetryHit {
                    rule_id: rule.id().to_string(),
                    command: command.to_string(),
                }),
            None => evaluation.unmatched += 1,
        }
    }
    debug!(
        "Attributed {} of {} telemetry commands",
        evaluation.total - evaluation.unmatched,
        evaluation.total
    );
    evaluation
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleClassification {
    Pass,
    FalseNegative { missed: usize, total: usize },
    FalsePositive { confused_with: Vec<String> },
    SyntheticOnly,
}

/// Verdict from the fixtures alone. Missed fixtures outrank confusions.
pub fn classify_synthetic(synthetic: &SyntheticResult) -> RuleClassification {
    if !synthetic.false_negatives.is_empty() {
        RuleClassification::FalseNegative {
            missed: synthetic.false_negatives.len(),
            total: synthetic.total(),
        }
    } else if !synthetic.false_positives.is_empty() {
        RuleClassification::FalsePositive {
            confused_with: synthetic.false_positives.iter().cloned().collect(),
        }
    } else {
        RuleClassification::Pass
    }
}

/// As [`classify_synthetic`], and a rule passing its fixtures must also hit real commands
pub fn classify(synthetic: &SyntheticResult, real_hits: usize) -> RuleClassification {
    match classify_synthetic(synthetic) {
        RuleClassification::Pass if real_hits == 0 => RuleClassification::SyntheticOnly,
        classification => classification,
    }
}

pub fn classify_rule(
    evaluation: &RuleEvaluation,
    telemetry: &TelemetryEvaluation,
) -> RuleClassification {
    classify(
        &evaluation.synthetic,
        telemetry.hits_for_rule(&evaluation.rule_id),
    )
}
