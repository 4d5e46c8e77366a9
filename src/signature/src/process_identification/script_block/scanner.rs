//! Finds where the script section of a process definition ends.
//!
//! The scanner walks the text after the `script:` marker one token at a time. A token is
//! either a triple-quote delimiter or the start of a line. Outside of a literal, a line that
//! consists of a bare `identifier:` opens the next section (`output:`, `stub:`, ...) and
//! therefore closes the script section. Inside a literal such lines are command text.

use regex::Regex;
use std::sync::LazyLock;

pub const LITERAL_DELIMITER: &str = "\"\"\"";

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\w+:\s*$").expect("valid section header regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Outside,
    InsideLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A `"""` delimiter starting at the byte offset
    Delimiter(usize),
    /// A line starting at the byte offset, without its line terminator
    LineStart { offset: usize, line: &'a str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue(ScanState),
    /// The section ends right before the byte offset
    SectionEnd(usize),
}

impl ScanState {
    pub fn step(self, token: Token<'_>) -> Transition {
        match (self, token) {
            (ScanState::Outside, Token::Delimiter(_)) => Transition::Continue(ScanState::InsideLiteral),
            (ScanState::InsideLiteral, Token::Delimiter(_)) => Transition::Continue(ScanState::Outside),
            (ScanState::Outside, Token::LineStart { offset, line }) if SECTION_HEADER.is_match(line) => {
                Transition::SectionEnd(offset)
            }
            (state, Token::LineStart { .. }) => Transition::Continue(state),
        }
    }
}

/// Tokens of `text` from byte offset `start` (which must be a line start) to the end.
pub fn tokens(text: &str, start: usize) -> impl Iterator<Item = Token<'_>> {
    text[start..]
        .split_inclusive('\n')
        .scan(start, |next_offset, raw| {
            let offset = *next_offset;
            *next_offset += raw.len();
            Some((offset, raw.trim_end_matches(['\n', '\r'])))
        })
        .flat_map(|(offset, line)| {
            std::iter::once(Token::LineStart { offset, line }).chain(
                line.match_indices(LITERAL_DELIMITER)
                    .map(move |(idx, _)| Token::Delimiter(offset + idx)),
            )
        })
}

/// Returns the exclusive end offset of the section whose body starts at `body_start`,
/// together with the state the scanner was in when it stopped.
///
/// An unbalanced delimiter leaves the scanner `InsideLiteral` and the section then runs to
/// the end of the text.
pub fn find_section_end(text: &str, body_start: usize) -> (usize, ScanState) {
    let mut state = ScanState::Outside;
    for token in tokens(text, body_start) {
        match state.step(token) {
            Transition::Continue(next) => state = next,
            Transition::SectionEnd(offset) => return (offset, state),
        }
    }
    (text.len(), state)
}
