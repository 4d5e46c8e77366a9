#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use tracer_signature::process_identification::rules::{RuleStore, StoreOptions};
use tracer_signature::process_identification::signature::SignatureMatcher;

pub fn asset(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/assets")
        .join(relative)
}

pub fn read_asset(relative: &str) -> String {
    std::fs::read_to_string(asset(relative)).unwrap()
}

pub fn load_matcher() -> SignatureMatcher {
    let store = RuleStore::from_file(asset("rules.json"), &StoreOptions::default()).unwrap();
    SignatureMatcher::new(Arc::new(store))
}
