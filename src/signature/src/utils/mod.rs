pub mod file_scan;

pub use file_scan::{read_sources, read_text, SourceFinder};
