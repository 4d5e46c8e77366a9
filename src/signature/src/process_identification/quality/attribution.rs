//! Follows a logged process name back to the rules that should identify it.

use crate::process_identification::quality::aliases::AliasMap;
use crate::process_identification::rules::CompiledRule;
use crate::process_identification::script_block::{ExtractionErrorKind, ExtractionTarget};
use crate::process_identification::signature::SignatureMatcher;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Why a logged process could not be tied to any rule.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AttributionGap {
    #[error("Cannot find process in source code: workflows")]
    UnresolvedInWorkflow,
    #[error("Cannot find process in source code: modules")]
    UnresolvedInModules,
    #[error("Cannot extract rule from source code: {0}")]
    ExtractionError(ExtractionFailure),
    #[error("Cannot extract rule from source code: In progress, not yet extracted")]
    NotYetProcessed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionFailure {
    #[error("{0}")]
    Structure(ExtractionErrorKind),
    #[error("Cannot recognise dynamic script, {0}")]
    DynamicTemplate(String),
}

/// A logged process tied to its declaration and its active rules.
#[derive(Debug, Clone)]
pub struct Attribution<'a> {
    pub process_name: &'a str,
    pub target: &'a ExtractionTarget,
    pub rules: Vec<&'a CompiledRule>,
}

/// Resolves logged names through workflow aliases, module declarations and the rule store.
#[derive(Debug)]
pub struct ProcessResolver<'a> {
    aliases: &'a AliasMap,
    targets: HashMap<&'a str, &'a ExtractionTarget>,
    matcher: &'a SignatureMatcher,
}

impl<'a> ProcessResolver<'a> {
    pub fn new(
        aliases: &'a AliasMap,
        targets: &'a [ExtractionTarget],
        matcher: &'a SignatureMatcher,
    ) -> Self {
        let mut by_process = HashMap::with_capacity(targets.len());
        for target in targets {
            if let Some(process_id) = target.process_id.as_deref() {
                by_process.entry(process_id).or_insert(target);
            }
        }
        Self {
            aliases,
            targets: by_process,
            matcher,
        }
    }

    pub fn process_name(&self, logged_as: &str) -> Option<&'a str> {
        self.aliases.resolve(logged_as)
    }

    pub fn attribute(&self, logged_as: &str) -> Result<Attribution<'a>, AttributionGap> {
        let process_name = self
            .process_name(logged_as)
            .ok_or(AttributionGap::UnresolvedInWorkflow)?;
        let target = *self
            .targets
            .get(process_name)
            .ok_or(AttributionGap::UnresolvedInModules)?;

        let rules: Vec<&CompiledRule> = self
            .matcher
            .rules()
            .iter()
            .filter(|rule| rule.process_name() == process_name)
            .collect();
        if !rules.is_empty() {
            return Ok(Attribution {
                process_name,
                target,
                rules,
            });
        }

        Err(match (target.error, target.template_name()) {
            (Some(kind), _) => AttributionGap::ExtractionError(ExtractionFailure::Structure(kind)),
            (None, Some(template)) => {
                AttributionGap::ExtractionError(ExtractionFailure::DynamicTemplate(template))
            }
            (None, None) => AttributionGap::NotYetProcessed,
        })
    }
}
