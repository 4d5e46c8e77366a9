use crate::process_identification::script_block::scanner::{find_section_end, ScanState};
use crate::process_identification::script_block::types::{ExtractionErrorKind, ScriptSegment};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// `script:` on its own line, optionally followed by a `//` comment
static SCRIPT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*script:[ \t]*(?://.*)?\r?$").expect("valid script marker regex")
});

static TRIPLE_QUOTED_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)""".*?""""#).expect("valid literal regex"));

static TEMPLATE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\btemplate\s*\(?\s*['"]([^'"]+)['"]"#).expect("valid template regex")
});

/// The bounded script section of one process definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    /// Byte range of the section, from the start of the marker line
    pub section: Range<usize>,
    pub segments: Vec<ScriptSegment>,
    /// File name given to a `template` directive, unresolved
    pub template_name: Option<String>,
    /// Scanner state when the section boundary was found
    pub end_state: ScanState,
}

pub fn locate_script_block(text: &str) -> Result<ScriptBlock, ExtractionErrorKind> {
    let marker = SCRIPT_MARKER
        .find(text)
        .ok_or(ExtractionErrorKind::NoScriptBlock)?;

    let body_start = text[marker.end()..]
        .find('\n')
        .map(|idx| marker.end() + idx + 1)
        .unwrap_or(text.len());
    let (section_end, end_state) = find_section_end(text, body_start);
    let section = marker.start()..section_end;
    let section_text = &text[section.clone()];

    let segments: Vec<ScriptSegment> = TRIPLE_QUOTED_LITERAL
        .find_iter(section_text)
        .map(|m| {
            let start_offset = section.start + m.start();
            let end_offset = section.start + m.end() - 1;
            ScriptSegment {
                start_offset,
                end_offset,
                start_line: line_of(text, start_offset),
                end_line: line_of(text, end_offset),
            }
        })
        .collect();

    // a directive spelled out inside command text or a comment is not a directive
    let template_name = TEMPLATE_DIRECTIVE
        .captures_iter(section_text)
        .filter(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            let line_start = section_text[..start].rfind('\n').map_or(0, |idx| idx + 1);
            let offset = section.start + start;
            !section_text[line_start..start].contains("//")
                && !segments.iter().any(|segment| segment.contains(offset))
        })
        .find_map(|caps| caps.get(1).map(|m| m.as_str().to_string()));

    Ok(ScriptBlock {
        section,
        segments,
        template_name,
        end_state,
    })
}

/// 0-indexed line number of the byte offset
fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count()
}
