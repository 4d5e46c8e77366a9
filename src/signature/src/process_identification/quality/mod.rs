//! Measures how well the rule set attributes commands, on synthetic fixtures and real runs.

pub mod aliases;
pub mod attribution;
pub mod completion_log;
pub mod evaluator;
pub mod report;
pub mod telemetry;

pub use aliases::{parse_includes, AliasMap, IncludeAlias};
pub use attribution::{Attribution, AttributionGap, ExtractionFailure, ProcessResolver};
pub use completion_log::parse_completed_processes;
pub use evaluator::{
    classify, classify_rule, classify_synthetic, evaluate_fixtures, evaluate_telemetry,
    FixtureOutcome, RuleClassification, RuleEvaluation, SyntheticResult, TelemetryEvaluation,
};
pub use report::{FailReason, ProcessReport, QualityEvaluator, QualityReport};
pub use telemetry::{parse_command_line, parse_command_log};
