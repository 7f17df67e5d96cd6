//! Shared test utilities for namespace integration tests
#![allow(dead_code)]

use common::namespace::Namespace;
use tracing_subscriber::EnvFilter;

/// The terminal names the synthetic data set is built from
pub const LEAF_NAMES: [&str; 9] = [
    "Time",
    "Size",
    "Defects",
    "Estimated Time",
    "Estimated Size",
    "Started",
    "Completed",
    "Yield",
    "Node_Type",
];

/// Route library logs to the test harness when RUST_LOG is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Set up a namespace holding the given text values
pub fn setup_test_namespace(entries: &[(&str, &str)]) -> Namespace {
    init_tracing();
    let ns = Namespace::new();
    for (key, value) in entries {
        ns.put(key, *value).unwrap();
    }
    ns
}

/// Deterministic absolute keys, `count` of them, at depths from two to six.
///
/// Entry `i` uses leaf `LEAF_NAMES[i % 9]` under one context per decimal
/// digit of `i / 9`, so every key is distinct.
pub fn synthetic_keys(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let leaf = LEAF_NAMES[i % LEAF_NAMES.len()];
            let prefix: String = (i / LEAF_NAMES.len())
                .to_string()
                .chars()
                .map(|digit| format!("/d{}", digit))
                .collect();
            format!("{}/{}", prefix, leaf)
        })
        .collect()
}
