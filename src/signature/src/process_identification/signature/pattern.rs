use fancy_regex::{Regex, RegexBuilder};
use regex::Regex as PlainRegex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static BACKREFERENCE: LazyLock<PlainRegex> = LazyLock::new(|| {
    PlainRegex::new(r"\\(?:[1-9]|k<|k\{|k'|g\{|g-?[0-9])").expect("valid backreference regex")
});

/// A rule pattern compiled once with an evaluation budget.
///
/// Patterns that need backtracking (look-around, backreferences) are bounded by the
/// backtrack limit; everything else is delegated to the linear-time `regex` engine.
#[derive(Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(source: &str, backtrack_limit: usize) -> Result<Self, fancy_regex::Error> {
        let regex = RegexBuilder::new(source)
            .backtrack_limit(backtrack_limit)
            .build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the pattern, surfacing a blown budget as an error
    pub fn try_match(&self, text: &str) -> Result<bool, fancy_regex::Error> {
        self.regex.is_match(text)
    }

    /// Evaluates the pattern; a blown budget counts as no match
    pub fn is_match(&self, text: &str) -> bool {
        self.try_match(text).unwrap_or_else(|e| {
            debug!("Pattern '{}' gave up on '{}': {}", self.source, text, e);
            false
        })
    }

    /// Whether group numbers in the pattern are load-bearing, which rules it out of an
    /// alternation with other patterns
    pub fn uses_backreferences(&self) -> bool {
        BACKREFERENCE.is_match(&self.source)
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledPattern").field(&self.source).finish()
    }
}
