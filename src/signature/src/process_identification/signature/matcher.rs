use crate::process_identification::rules::{CompiledRule, RuleStore};
use crate::process_identification::signature::pattern::CompiledPattern;
use itertools::Itertools;
use std::sync::Arc;
use tracing::{debug, warn};

/// Attributes commands to at most one rule.
///
/// A single alternation over every active pattern rejects most commands in one pass. When it
/// matches, the rules are tried one by one in load order and the first match wins, so an
/// earlier rule shadows any later rule that would match the same command.
#[derive(Debug, Clone)]
pub struct SignatureMatcher {
    store: Arc<RuleStore>,
    combined: Option<CompiledPattern>,
}

impl SignatureMatcher {
    pub fn new(store: Arc<RuleStore>) -> Self {
        let combined = build_combined(&store);
        Self { store, combined }
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    pub fn rules(&self) -> &[CompiledRule] {
        self.store.rules()
    }

    /// Source of the fast-reject alternation, None when commands are always tested linearly
    pub fn combined_pattern(&self) -> Option<&str> {
        self.combined.as_ref().map(|pattern| pattern.source())
    }

    /// The earliest-loaded rule whose pattern matches `command`
    pub fn match_command(&self, command: &str) -> Option<&CompiledRule> {
        if !self.may_match(command) {
            return None;
        }
        self.store.rules().iter().find(|rule| rule.is_match(command))
    }

    /// Every rule whose pattern matches `command`, in load order. The first element, if any,
    /// is what [`SignatureMatcher::match_command`] returns.
    pub fn candidates(&self, command: &str) -> Vec<&CompiledRule> {
        if !self.may_match(command) {
            return Vec::new();
        }
        self.store
            .rules()
            .iter()
            .filter(|rule| rule.is_match(command))
            .collect()
    }

    fn may_match(&self, command: &str) -> bool {
        match &self.combined {
            None => true,
            // a blown budget can't prove absence, leave it to the individual patterns
            Some(combined) => combined.try_match(command).unwrap_or_else(|e| {
                debug!("Fast-reject gave up on '{}': {}", command, e);
                true
            }),
        }
    }
}

fn build_combined(store: &RuleStore) -> Option<CompiledPattern> {
    if store.is_empty() {
        return None;
    }
    // group numbers shift inside the alternation, so `\1` would point at another rule's group
    if let Some(rule) = store
        .rules()
        .iter()
        .find(|rule| rule.pattern.uses_backreferences())
    {
        debug!(
            "Rule {} uses backreferences, matching without fast rejection",
            rule.id()
        );
        return None;
    }

    let source = store
        .rules()
        .iter()
        .map(|rule| format!("(?:{})", rule.pattern.source()))
        .join("|");
    CompiledPattern::compile(&source, store.backtrack_limit())
        .inspect_err(|e| warn!("Failed to combine rule patterns, matching linearly: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_identification::rules::{RuleStore, StoreOptions};
    use crate::process_identification::test_utils::{matcher, rule};
    use rstest::{fixture, rstest};

    #[fixture]
    fn rnaseq_matcher() -> SignatureMatcher {
        matcher(vec![
            rule("nextflow/core/FASTQC", r"^fastqc\s"),
            rule("nextflow/core/FASTQC_QUIET", r"^fastqc\s.*--quiet"),
            rule("nextflow/core/BROKEN", r"samtools (sort"),
            rule("nextflow/core/SAMTOOLS_SORT", r"^samtools sort"),
            rule("nextflow/core/SAMTOOLS_ANY", r"^samtools \w+"),
            rule("nextflow/core/SALMON_QUANT", r"^salmon quant\s.*(?=--libType)"),
        ])
    }

    const COMMANDS: &[&str] = &[
        "fastqc --quiet sample.fq",
        "fastqc sample.fq",
        "samtools sort in.bam",
        "samtools index in.bam",
        "samtools (sort",
        "salmon quant -i idx --libType A",
        "salmon quant -i idx",
        "STAR --runMode alignReads",
        "",
    ];

    #[rstest]
    fn test_first_loaded_rule_wins(rnaseq_matcher: SignatureMatcher) {
        let matched = rnaseq_matcher.match_command("fastqc --quiet sample.fq");
        assert_eq!(matched.map(|r| r.id()), Some("nextflow/core/FASTQC"));

        let candidates: Vec<&str> = rnaseq_matcher
            .candidates("fastqc --quiet sample.fq")
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(
            candidates,
            vec!["nextflow/core/FASTQC", "nextflow/core/FASTQC_QUIET"]
        );
    }

    #[rstest]
    #[case("samtools sort in.bam", Some("nextflow/core/SAMTOOLS_SORT"))]
    #[case("samtools index in.bam", Some("nextflow/core/SAMTOOLS_ANY"))]
    #[case("salmon quant -i idx --libType A", Some("nextflow/core/SALMON_QUANT"))]
    #[case("salmon quant -i idx", None)]
    #[case("STAR --runMode alignReads", None)]
    fn test_match_command(
        rnaseq_matcher: SignatureMatcher,
        #[case] command: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(rnaseq_matcher.match_command(command).map(|r| r.id()), expected);
    }

    #[rstest]
    fn test_match_equals_linear_scan(rnaseq_matcher: SignatureMatcher) {
        assert!(rnaseq_matcher.combined_pattern().is_some());
        for command in COMMANDS {
            let linear = rnaseq_matcher
                .rules()
                .iter()
                .position(|rule| rule.is_match(command));
            let matched = rnaseq_matcher
                .match_command(command)
                .and_then(|r| rnaseq_matcher.store().position(r.id()));
            assert_eq!(matched, linear, "command: {:?}", command);
        }
    }

    #[rstest]
    fn test_dropped_rule_never_matches(rnaseq_matcher: SignatureMatcher) {
        for command in COMMANDS {
            assert!(rnaseq_matcher
                .candidates(command)
                .iter()
                .all(|r| r.id() != "nextflow/core/BROKEN"));
        }
    }

    #[test]
    fn test_combined_pattern_is_deterministic() {
        let rules = || {
            vec![
                rule("nextflow/core/A", r"^a\s"),
                rule("nextflow/core/B", r"^b|^c"),
            ]
        };
        let first = matcher(rules());
        let second = matcher(rules());
        assert_eq!(first.combined_pattern(), Some(r"(?:^a\s)|(?:^b|^c)"));
        assert_eq!(first.combined_pattern(), second.combined_pattern());
        assert_eq!(first.rules().len(), second.rules().len());
    }

    #[test]
    fn test_backreferences_disable_fast_reject() {
        let matcher = matcher(vec![
            rule("nextflow/core/A", r"^(x)y"),
            rule("nextflow/core/B", r"^(\w+) \1$"),
        ]);
        assert_eq!(matcher.combined_pattern(), None);
        assert_eq!(
            matcher.match_command("cat cat").map(|r| r.id()),
            Some("nextflow/core/B")
        );
    }

    #[test]
    fn test_empty_store_matches_nothing() {
        let matcher = matcher(vec![]);
        assert_eq!(matcher.combined_pattern(), None);
        assert!(matcher.match_command("fastqc x").is_none());
    }

    #[test]
    fn test_exhausted_budget_is_no_match_for_that_rule() {
        let store = RuleStore::load(
            vec![
                rule("nextflow/core/SLOW", r"(?i)(a|b|ab)*(?=c)"),
                rule("nextflow/core/ABAB", r"^abab"),
            ],
            &StoreOptions {
                backtrack_limit: 100_000,
                ..StoreOptions::default()
            },
        );
        let matcher = SignatureMatcher::new(Arc::new(store));
        let command = "ab".repeat(28);
        assert_eq!(
            matcher.match_command(&command).map(|r| r.id()),
            Some("nextflow/core/ABAB")
        );
    }
}
