pub mod generated;
pub mod rule_store;
pub mod structured_rule;

pub use generated::parse_generated_rule;
pub use rule_store::{
    CompiledRule, DropReason, DroppedRule, RuleFileError, RuleStore, StoreOptions,
};
pub use structured_rule::{
    process_name_of, Fixture, PatternScore, RuleQuality, RuleSource, ScoreValue, StructuredRule,
};
