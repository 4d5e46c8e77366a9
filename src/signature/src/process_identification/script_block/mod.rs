//! Locates the executable command text embedded in nextflow process definitions.

pub mod batch;
pub mod locator;
pub mod scanner;
pub mod target;
mod types;

pub use batch::extract_targets;
pub use locator::{locate_script_block, ScriptBlock};
pub use target::{extract_target, process_id_of, FsTemplateResolver, TemplateResolver};
pub use types::{ExtractionErrorKind, ExtractionTarget, ScriptSegment};
