//! Shared test utilities for the integration suites

#![allow(dead_code)]

use normal_reducer::{Entity, NormalizedCollection};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary
///
/// Set `RUST_LOG=normal=debug` to see dispatch decisions.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// An entity with a `name` field
pub fn named(id: &str, name: &str) -> Entity {
    Entity::new(id).with("name", name)
}

/// A collection of entities whose name is the capitalized id
pub fn collection(ids: &[&str]) -> NormalizedCollection<Entity> {
    NormalizedCollection::from_records(ids.iter().map(|id| named(id, &capitalize(id))))
}

/// The order of `state` as `&str`s
pub fn order(state: &NormalizedCollection<Entity>) -> Vec<&str> {
    state.order().iter().map(|id| id.as_str()).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
