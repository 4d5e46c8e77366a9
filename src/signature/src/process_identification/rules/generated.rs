//! Converts a pattern generator's tagged response into a [`StructuredRule`].
//!
//! A response looks like
//!
//! ```text
//! <file>modules/nf-core/fastqc/main.nf</file>
//! <process>FASTQC</process>
//! <process_description>Runs FastQC on reads</process_description>
//! <pattern>^fastqc\s</pattern>
//! <quality_score>8</quality_score>
//! <reasoning>...</reasoning>
//! <example>
//!   <label>paired end</label>
//!   <script>fastqc --threads 2 a.fq b.fq</script>
//!   <sched_process_exec_events>
//!   PID: 1 ARGV: ["fastqc", "--threads", "2", "a.fq", "b.fq"]
//!   </sched_process_exec_events>
//! </example>
//! ```

use crate::process_identification::constants::RULE_ID_PREFIX;
use crate::process_identification::quality::telemetry::argv_from_event_line;
use crate::process_identification::rules::structured_rule::{
    Fixture, PatternScore, RuleQuality, RuleSource, ScoreValue, StructuredRule,
};
use anyhow::{anyhow, Result};
use regex::Regex;
use std::sync::LazyLock;

static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(\w+)>").expect("valid tag regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub content: String,
    pub children: Vec<Tag>,
}

impl Tag {
    fn child(&self, name: &str) -> Result<&str> {
        self.children
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.content.as_str())
            .ok_or_else(|| anyhow!("Missing <{}> in <{}>", name, self.name))
    }
}

/// Every `<name>...</name>` element of `content`, each followed by its own descendants.
pub fn extract_tags(content: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut cursor = 0;
    while let Some(caps) = OPEN_TAG.captures_at(content, cursor) {
        let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let closing = format!("</{}>", name.as_str());
        match content[open.end()..].find(&closing) {
            Some(len) => {
                let inner = content[open.end()..open.end() + len].trim();
                let children = extract_tags(inner);
                tags.push(Tag {
                    name: name.as_str().to_string(),
                    content: inner.to_string(),
                    children: children.clone(),
                });
                tags.extend(children);
                cursor = open.end() + len + closing.len();
            }
            None => cursor = open.end(),
        }
    }
    tags
}

fn required<'a>(tags: &'a [Tag], name: &str) -> Result<&'a str> {
    optional(tags, name).ok_or_else(|| anyhow!("Missing <{}> tag", name))
}

fn optional<'a>(tags: &'a [Tag], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.name == name)
        .map(|tag| tag.content.as_str())
}

/// Removes a leading `^` and an unescaped trailing `$`
pub fn strip_anchors(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    match pattern.strip_suffix('$') {
        Some(stripped) if !stripped.ends_with('\\') => stripped,
        _ => pattern,
    }
}

pub fn parse_generated_rule(response: &str) -> Result<StructuredRule> {
    let tags = extract_tags(response);

    let process = required(&tags, "process")?;
    let test_fixtures = tags
        .iter()
        .filter(|tag| tag.name == "example")
        .map(|example| {
            let commands = example
                .child("sched_process_exec_events")?
                .lines()
                .filter_map(argv_from_event_line)
                .collect();
            Ok(Fixture {
                label: example.child("label")?.to_string(),
                script: example.child("script")?.to_string(),
                commands,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StructuredRule {
        id: format!("{}{}", RULE_ID_PREFIX, process),
        source: optional(&tags, "file").map(|file| RuleSource {
            file: file.to_string(),
        }),
        label: required(&tags, "process_description")?.to_string(),
        pattern: strip_anchors(required(&tags, "pattern")?).to_string(),
        quality: RuleQuality {
            ai_self_eval_pattern_score: PatternScore {
                value: ScoreValue::from(required(&tags, "quality_score")?),
                reasoning: required(&tags, "reasoning")?.to_string(),
            },
        },
        test_fixtures,
    })
}
