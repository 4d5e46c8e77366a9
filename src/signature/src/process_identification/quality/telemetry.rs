//! Turns captured exec events into the command strings rules are matched against.

use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

static EVENT_ARGV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ARGV:\s*(\[.*\])").expect("valid ARGV regex"));

/// Joins an argument array `[...]`. JSON string arrays keep commas inside their tokens;
/// anything else is split on commas, trimmed and unquoted. Empty tokens are dropped.
fn join_argv(record: &str) -> Option<String> {
    let command = match serde_json::from_str::<Vec<String>>(record) {
        Ok(tokens) => tokens
            .iter()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .join(" "),
        Err(_) => record[1..record.len() - 1]
            .split(',')
            .map(|token| token.trim().replace('"', ""))
            .filter(|token| !token.is_empty())
            .join(" "),
    };
    (!command.is_empty()).then_some(command)
}

fn bracketed(line: &str) -> Option<&str> {
    let line = line.trim();
    (line.len() >= 2 && line.starts_with('[') && line.ends_with(']')).then_some(line)
}

/// The bracketed argument array of a line, if the line is an argument-array record
fn argv_record(line: &str) -> Option<&str> {
    EVENT_ARGV
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|record| record.as_str())
        .or_else(|| bracketed(line))
}

/// Command of an exec event line such as `PID: 12 ARGV: ["samtools", "sort"]`
pub fn argv_from_event_line(line: &str) -> Option<String> {
    EVENT_ARGV
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|record| join_argv(record.as_str()))
}

/// Command of a bare argument array such as `["samtools", "sort"]`
pub fn parse_argv_record(line: &str) -> Option<String> {
    bracketed(line).and_then(join_argv)
}

fn strip_outer_quotes(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '"' || first == '\'') => {
            Some(&line[1..line.len() - 1])
        }
        _ => None,
    }
}

/// One line of a telemetry command log. Blank lines and argument arrays without
/// tokens carry no command.
pub fn parse_command_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(literal) = strip_outer_quotes(line) {
        return Some(literal.to_string());
    }
    match argv_record(line) {
        Some(record) => join_argv(record),
        None => Some(line.to_string()),
    }
}

pub fn parse_command_log(text: &str) -> Vec<String> {
    text.lines().filter_map(parse_command_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::argv_record(r#"["samtools","sort","-@","4","in.bam"]"#, Some("samtools sort -@ 4 in.bam"))]
    #[case::argv_record_spaced(r#"[ "fastqc", "", "--threads", "2" ]"#, Some("fastqc --threads 2"))]
    #[case::event_line(r#"PID: 4 ARGV: ["salmon", "quant", "-i", "idx"]"#, Some("salmon quant -i idx"))]
    #[case::quoted_literal(r#""STAR --runMode alignReads""#, Some("STAR --runMode alignReads"))]
    #[case::single_quoted("'gzip -cd a.gz'", Some("gzip -cd a.gz"))]
    #[case::bare("bedtools genomecov -ibam x.bam", Some("bedtools genomecov -ibam x.bam"))]
    #[case::blank("   ", None)]
    #[case::empty_array("[]", None)]
    #[case::only_empty_tokens(r#"["", " "]"#, None)]
    #[case::empty_event_line("PID: 9 ARGV: []", None)]
    #[case::comma_inside_token(
        r#"["STAR", "--outSAMattributes", "NH,HI,AS"]"#,
        Some("STAR --outSAMattributes NH,HI,AS")
    )]
    #[case::unquoted_record("[samtools, view, -b]", Some("samtools view -b"))]
    fn test_parse_command_line(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_command_line(line).as_deref(), expected);
    }

    #[test]
    fn test_lone_quote_is_kept() {
        assert_eq!(parse_command_line("\"").as_deref(), Some("\""));
    }

    #[test]
    fn test_parse_command_log() {
        let log = "\"fastqc a.fq\"\n\n[\"samtools\", \"index\", \"a.bam\"]\n";
        assert_eq!(
            parse_command_log(log),
            vec!["fastqc a.fq".to_string(), "samtools index a.bam".to_string()]
        );
    }
}
