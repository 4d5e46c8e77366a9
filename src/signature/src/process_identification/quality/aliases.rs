//! Maps the names processes are logged under back to the process they were declared as.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static INCLUDE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binclude\s*\{([^}]*)\}").expect("valid include regex"));

static INCLUDE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\s+as\s+(\w+))?$").expect("valid include entry regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeAlias {
    pub original: String,
    pub alias: String,
}

/// Every `include { A as B; C }` entry of a workflow file. An entry without `as` aliases
/// the process to itself.
pub fn parse_includes(text: &str) -> Vec<IncludeAlias> {
    INCLUDE_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|block| block.as_str().split(';'))
        .filter_map(|entry| {
            let entry = entry.trim();
            let caps = INCLUDE_ENTRY.captures(entry)?;
            let original = caps.get(1)?.as_str().to_string();
            let alias = caps
                .get(2)
                .map(|alias| alias.as_str().to_string())
                .unwrap_or_else(|| original.clone());
            Some(IncludeAlias { original, alias })
        })
        .collect()
}

/// Logged name to declared process name. A later include of the same alias replaces an
/// earlier one.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    aliases: HashMap<String, String>,
}

impl AliasMap {
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map: AliasMap = sources
            .into_iter()
            .flat_map(|text| parse_includes(text.as_ref()))
            .collect();
        debug!("Resolved {} workflow aliases", map.len());
        map
    }

    pub fn insert(&mut self, include: IncludeAlias) {
        self.aliases.insert(include.alias, include.original);
    }

    pub fn resolve(&self, logged_as: &str) -> Option<&str> {
        self.aliases.get(logged_as).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl FromIterator<IncludeAlias> for AliasMap {
    fn from_iter<T: IntoIterator<Item = IncludeAlias>>(iter: T) -> Self {
        let mut map = AliasMap::default();
        iter.into_iter().for_each(|include| map.insert(include));
        map
    }
}
