use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Byte and line span of one triple-quoted command literal. Offsets are inclusive and point at
/// the first quote of the opening delimiter and the last quote of the closing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScriptSegment {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl ScriptSegment {
    pub fn contains(&self, offset: usize) -> bool {
        self.start_offset <= offset && offset <= self.end_offset
    }
}

/// Structural problems with a process definition. These never abort a scan: they are recorded
/// on the [`ExtractionTarget`] of the offending file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionErrorKind {
    #[error("No script block")]
    NoScriptBlock,
    #[error("No executable content in script block")]
    NoExecutableContent,
}

/// Outcome of locating the command text of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionTarget {
    /// Name from the `process NAME {` declaration
    pub process_id: Option<String>,
    pub source_file: PathBuf,
    pub segments: Vec<ScriptSegment>,
    pub template_file: Option<PathBuf>,
    pub error: Option<ExtractionErrorKind>,
}

impl ExtractionTarget {
    pub fn is_extractable(&self) -> bool {
        self.error.is_none()
    }

    /// File name of the resolved template, if the script is rendered from one
    pub fn template_name(&self) -> Option<String> {
        self.template_file
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }
}
