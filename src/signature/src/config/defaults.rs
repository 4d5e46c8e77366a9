use crate::config::Config;
use crate::process_identification::constants::{
    COMPLETED_STATUS_MARKER, DEFAULT_BACKTRACK_LIMIT, DEFAULT_EXTRACTION_CONCURRENCY,
    DEFAULT_TEMPLATE_DIR,
};

pub(super) const DEFAULT_LOG_LEVEL: &str = "info";

impl Default for Config {
    fn default() -> Self {
        Self {
            denylist: Vec::new(),
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            template_dir: DEFAULT_TEMPLATE_DIR.to_string(),
            completion_marker: COMPLETED_STATUS_MARKER.to_string(),
            extraction_concurrency: DEFAULT_EXTRACTION_CONCURRENCY,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}
