pub mod matcher;
pub mod pattern;

pub use matcher::SignatureMatcher;
pub use pattern::CompiledPattern;
