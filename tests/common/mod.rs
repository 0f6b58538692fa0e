// Shared helpers for integration tests
#![allow(dead_code)]

use kanji_parts::{DataLoader, KanjiSearch, TableSet};
use std::path::PathBuf;

/// The sample data directory shipped with the crate
pub fn sample_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join("sample")
}

/// Tables loaded from the sample data directory
pub fn sample_tables() -> TableSet {
    DataLoader::new(sample_dir()).load().unwrap().0
}

/// Engine over the sample data
pub fn sample_search() -> KanjiSearch {
    KanjiSearch::from_tables(sample_tables())
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Direct-only tables, no patterns or variants
pub fn direct_only(entries: &[(&str, &[&str])]) -> TableSet {
    let mut tables = TableSet::default();
    for (composite, parts) in entries {
        tables.direct.insert(composite.to_string(), strings(parts));
    }
    tables
}

/// Sorted copy, for comparing result sets while ignoring order
pub fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}
