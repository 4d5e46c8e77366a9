use crate::process_identification::rules::{
    Fixture, PatternScore, RuleQuality, RuleStore, ScoreValue, StoreOptions, StructuredRule,
};
use crate::process_identification::signature::SignatureMatcher;
use std::sync::Arc;

pub fn rule(id: &str, pattern: &str) -> StructuredRule {
    rule_with_fixtures(id, pattern, vec![])
}

/// A rule with one fixture per command list
pub fn rule_with_fixtures(id: &str, pattern: &str, fixtures: Vec<Vec<&str>>) -> StructuredRule {
    StructuredRule {
        id: id.to_string(),
        source: None,
        label: format!("{} label", id),
        pattern: pattern.to_string(),
        quality: RuleQuality {
            ai_self_eval_pattern_score: PatternScore {
                value: ScoreValue::Number(8.0),
                reasoning: "test".to_string(),
            },
        },
        test_fixtures: fixtures
            .into_iter()
            .enumerate()
            .map(|(i, commands)| Fixture {
                label: format!("fixture {}", i),
                script: String::new(),
                commands: commands.into_iter().map(String::from).collect(),
            })
            .collect(),
    }
}

pub fn matcher(rules: Vec<StructuredRule>) -> SignatureMatcher {
    let store = RuleStore::load(rules, &StoreOptions::default());
    SignatureMatcher::new(Arc::new(store))
}
