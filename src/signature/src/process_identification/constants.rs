/// Sub-folder, relative to a module's source file, holding `template` scripts
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Marker of a finished task in the nextflow log
pub const COMPLETED_STATUS_MARKER: &str = "status: COMPLETED";

/// Backtracking steps a single pattern evaluation may take before it is treated as a non-match
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

pub const DEFAULT_EXTRACTION_CONCURRENCY: usize = 8;

/// Namespace of rules produced from nextflow modules
pub const RULE_ID_PREFIX: &str = "nextflow/core/";

/// Separator of the rule id namespace; the last segment is the process name
pub const RULE_ID_SEPARATOR: char = '/';
