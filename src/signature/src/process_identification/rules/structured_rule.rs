use crate::process_identification::constants::RULE_ID_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A signature for the commands of one nextflow process, as stored in the rule collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRule {
    /// Namespaced id, e.g. `nextflow/core/FASTQC`
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RuleSource>,
    pub label: String,
    /// Regex source with leading `^` and trailing `$` stripped by the generator
    pub pattern: String,
    pub quality: RuleQuality,
    #[serde(default)]
    pub test_fixtures: Vec<Fixture>,
}

impl StructuredRule {
    /// Last segment of the id, which names the process the rule was generated from
    pub fn process_name(&self) -> &str {
        process_name_of(&self.id)
    }
}

pub fn process_name_of(rule_id: &str) -> &str {
    rule_id.rsplit(RULE_ID_SEPARATOR).next().unwrap_or(rule_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSource {
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleQuality {
    pub ai_self_eval_pattern_score: PatternScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternScore {
    pub value: ScoreValue,
    pub reasoning: String,
}

/// Generators emit the score either as a number or as the raw text they were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(f64),
    Text(String),
}

impl From<&str> for ScoreValue {
    fn from(raw: &str) -> Self {
        raw.trim()
            .parse::<f64>()
            .map(ScoreValue::Number)
            .unwrap_or_else(|_| ScoreValue::Text(raw.trim().to_string()))
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Number(n) => write!(f, "{}", n),
            ScoreValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Commands known to come from one run of the rule's process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub label: String,
    pub script: String,
    pub commands: Vec<String>,
}
