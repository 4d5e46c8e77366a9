use crate::process_identification::constants::DEFAULT_TEMPLATE_DIR;
use crate::process_identification::script_block::locator::locate_script_block;
use crate::process_identification::script_block::types::{ExtractionErrorKind, ExtractionTarget};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static PROCESS_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bprocess\s+(\w+)\s*\{").expect("valid process regex"));

/// Resolves the file named by a `template` directive.
pub trait TemplateResolver {
    /// Returns the template's path if it exists, otherwise None
    fn resolve(&self, source_file: &Path, template_name: &str) -> Option<PathBuf>;
}

/// Looks templates up on disk in a sub-folder next to the module's source file.
#[derive(Debug, Clone)]
pub struct FsTemplateResolver {
    template_dir: String,
}

impl FsTemplateResolver {
    pub fn new(template_dir: impl Into<String>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }
}

impl Default for FsTemplateResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_DIR)
    }
}

impl TemplateResolver for FsTemplateResolver {
    fn resolve(&self, source_file: &Path, template_name: &str) -> Option<PathBuf> {
        let candidate = source_file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.template_dir)
            .join(template_name);
        candidate.is_file().then_some(candidate)
    }
}

pub fn process_id_of(text: &str) -> Option<String> {
    PROCESS_DECLARATION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Locates the command text of one source file. Structural problems are recorded on the
/// returned target rather than returned as errors.
pub fn extract_target<R: TemplateResolver + ?Sized>(
    source_file: impl Into<PathBuf>,
    text: &str,
    resolver: &R,
) -> ExtractionTarget {
    let source_file = source_file.into();
    let process_id = process_id_of(text);

    let block = match locate_script_block(text) {
        Ok(block) => block,
        Err(kind) => {
            debug!("{}: {}", source_file.display(), kind);
            return ExtractionTarget {
                process_id,
                source_file,
                segments: Vec::new(),
                template_file: None,
                error: Some(kind),
            };
        }
    };

    let template_file = block.template_name.as_deref().and_then(|name| {
        let resolved = resolver.resolve(&source_file, name);
        if resolved.is_none() {
            debug!(
                "{}: template {} not found, ignoring directive",
                source_file.display(),
                name
            );
        }
        resolved
    });

    let error = (block.segments.is_empty() && template_file.is_none())
        .then_some(ExtractionErrorKind::NoExecutableContent);

    ExtractionTarget {
        process_id,
        source_file,
        segments: block.segments,
        template_file,
        error,
    }
}
