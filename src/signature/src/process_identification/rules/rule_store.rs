use crate::process_identification::constants::DEFAULT_BACKTRACK_LIMIT;
use crate::process_identification::rules::structured_rule::StructuredRule;
use crate::process_identification::signature::CompiledPattern;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Failures reading the rule collection itself. Problems with single rules are never errors.
#[derive(Debug, Error)]
pub enum RuleFileError {
    #[error("Failed to read rule file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed rule collection: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Ids of rules known to be bad, removed before compilation
    pub denylist: HashSet<String>,
    pub backtrack_limit: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            denylist: HashSet::new(),
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    Denylisted,
    DuplicateId,
    PatternCompile(String),
    /// The entry is not a valid rule
    Malformed(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Denylisted => write!(f, "denylisted"),
            DropReason::DuplicateId => write!(f, "duplicate id"),
            DropReason::PatternCompile(e) => write!(f, "pattern does not compile: {}", e),
            DropReason::Malformed(e) => write!(f, "malformed rule: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRule {
    pub id: String,
    pub reason: DropReason,
}

/// An active rule and its pattern, compiled once at load.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: StructuredRule,
    pub pattern: CompiledPattern,
}

impl CompiledRule {
    pub fn id(&self) -> &str {
        &self.rule.id
    }

    pub fn process_name(&self) -> &str {
        self.rule.process_name()
    }

    pub fn is_match(&self, command: &str) -> bool {
        self.pattern.is_match(command)
    }
}

/// The active rule set. Load order is kept and decides which rule wins a command.
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Vec<CompiledRule>,
    index: HashMap<String, usize>,
    dropped: Vec<DroppedRule>,
    backtrack_limit: usize,
}

impl RuleStore {
    fn empty(capacity: usize, options: &StoreOptions) -> Self {
        RuleStore {
            rules: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            dropped: Vec::new(),
            backtrack_limit: options.backtrack_limit,
        }
    }

    fn drop_rule(&mut self, id: String, reason: DropReason) {
        warn!("Dropping rule {}: {}", id, reason);
        self.dropped.push(DroppedRule { id, reason });
    }

    fn admit(&mut self, rule: StructuredRule, options: &StoreOptions) {
        let reason = if options.denylist.contains(&rule.id) {
            DropReason::Denylisted
        } else if self.index.contains_key(&rule.id) {
            DropReason::DuplicateId
        } else {
            match CompiledPattern::compile(&rule.pattern, options.backtrack_limit) {
                Ok(pattern) => {
                    self.index.insert(rule.id.clone(), self.rules.len());
                    self.rules.push(CompiledRule { rule, pattern });
                    return;
                }
                Err(e) => DropReason::PatternCompile(e.to_string()),
            }
        };
        self.drop_rule(rule.id, reason);
    }

    fn loaded(self, total: usize) -> Self {
        info!(
            "Loaded {} of {} rules ({} dropped)",
            self.rules.len(),
            total,
            self.dropped.len()
        );
        self
    }

    pub fn load(rules: Vec<StructuredRule>, options: &StoreOptions) -> Self {
        let total = rules.len();
        let mut store = Self::empty(total, options);
        for rule in rules {
            store.admit(rule, options);
        }
        store.loaded(total)
    }

    /// Only a document that is not a JSON array is fatal. Entries that are not valid
    /// rules are dropped as `Malformed`, keeping their place in load order.
    pub fn from_json_str(json: &str, options: &StoreOptions) -> Result<Self, RuleFileError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let total = entries.len();
        let mut store = Self::empty(total, options);
        for (position, entry) in entries.into_iter().enumerate() {
            let id = entry
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| format!("#{}", position), str::to_string);
            match serde_json::from_value::<StructuredRule>(entry) {
                Ok(rule) => store.admit(rule, options),
                Err(e) => store.drop_rule(id, DropReason::Malformed(e.to_string())),
            }
        }
        Ok(store.loaded(total))
    }

    pub fn from_file<P: AsRef<Path>>(path: P, options: &StoreOptions) -> Result<Self, RuleFileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RuleFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, options)
    }

    /// Active rules in load order
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&CompiledRule> {
        self.index.get(id).map(|&idx| &self.rules[idx])
    }

    pub fn compiled(&self, id: &str) -> Option<&CompiledPattern> {
        self.get(id).map(|rule| &rule.pattern)
    }

    /// Load-order position of an active rule
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn dropped(&self) -> &[DroppedRule] {
        &self.dropped
    }

    /// Evaluation budget the patterns were compiled with
    pub fn backtrack_limit(&self) -> usize {
        self.backtrack_limit
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
