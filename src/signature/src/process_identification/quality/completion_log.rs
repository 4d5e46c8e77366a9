use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

static PROCESS_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bNF[A-Z0-9_]+:[A-Z0-9_:]+").expect("valid completion token regex")
});

/// Name of the process a completion line reports, e.g. `FASTQC` for
/// `name: NFCORE_RNASEQ:RNASEQ:FASTQC (WT_REP1); status: COMPLETED`.
pub fn completed_process_name(line: &str, marker: &str) -> Option<String> {
    if !line.contains(marker) {
        return None;
    }
    let token = PROCESS_TOKEN.find(line)?;
    token
        .as_str()
        .rsplit(':')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Completed processes in the order they were first logged
pub fn parse_completed_processes(text: &str, marker: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| completed_process_name(line, marker))
        .unique()
        .collect()
}
