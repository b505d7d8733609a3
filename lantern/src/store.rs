//! The per-entity property store.
//!
//! The store is the single source of truth for an entity; every derived
//! or display value must be recomputable from it. Push frames and pull
//! batches race without any ordering guarantee, so each field carries a
//! revision stamp and application is idempotent per field: the most
//! recently *applied* value wins, independently across properties.

use std::collections::BTreeMap;

use compact_str::{CompactString, ToCompactString};
use lantern_common::Value;

/// Which path applied an update; diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Push,
    Pull,
    Write,
}

#[derive(Debug, Clone, PartialEq)]
struct Field {
    value: Value,
    revision: u64,
}

#[derive(Debug, Default)]
pub struct PropertyStore {
    fields: BTreeMap<CompactString, Field>,
    clock: u64,
}

impl PropertyStore {
    /// Apply one field update and return its new revision.
    pub fn apply(&mut self, name: &str, value: Value, source: UpdateSource) -> u64 {
        self.clock += 1;
        tracing::trace!(property = name, ?source, revision = self.clock, "applying update");

        self.fields
            .insert(name.to_compact_string(), Field { value, revision: self.clock });

        self.clock
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).map(|field| &field.value)
    }

    /// Revision of a field's last applied update; 0 when never applied.
    pub fn revision(&self, name: &str) -> u64 {
        self.fields.get(name).map(|field| field.revision).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), &field.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_applied_wins_per_key() {
        let mut store = PropertyStore::default();

        // pull batch and push frames interleaved, out of order per key
        store.apply("on", Value::Bool(false), UpdateSource::Pull);
        store.apply("level", Value::Number(30.0), UpdateSource::Pull);
        store.apply("on", Value::Bool(true), UpdateSource::Push);
        store.apply("temperature", Value::Text("#ffaa00".into()), UpdateSource::Push);
        store.apply("level", Value::Number(55.0), UpdateSource::Write);

        assert_eq!(store.get("on"), Some(&Value::Bool(true)));
        assert_eq!(store.get("level"), Some(&Value::Number(55.0)));
        assert_eq!(store.get("temperature"), Some(&Value::Text("#ffaa00".into())));

        let snapshot: Vec<(&str, &Value)> = store.iter().collect();
        assert_eq!(snapshot, vec![
            ("level", &Value::Number(55.0)),
            ("on", &Value::Bool(true)),
            ("temperature", &Value::Text("#ffaa00".into())),
        ]);
    }

    #[test]
    fn revisions_are_monotonic_per_field() {
        let mut store = PropertyStore::default();

        assert_eq!(store.revision("on"), 0);

        let first = store.apply("on", Value::Bool(true), UpdateSource::Push);
        let second = store.apply("on", Value::Bool(false), UpdateSource::Pull);

        assert!(second > first);
        assert_eq!(store.revision("on"), second);
    }
}
