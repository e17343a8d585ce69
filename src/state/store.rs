//! Ordered attribute container with "upsert first matching" semantics.
//!
//! The store itself does not enforce unique keys. Uniqueness per
//! `(class, type, sub_type)` is a call-discipline invariant: as long as every
//! writer goes through [`AttributeStore::upsert_first_matching`], at most one
//! attribute exists per key. Values pushed in any other way (there is no
//! other public write path) would break that.

use super::StateNotifier;
use crate::attributes::{AttributeQuery, AttributeValue};
use log::debug;
use tokio::sync::watch;

/// Holds the attributes of one robot in insertion order.
///
/// Mutated only by capabilities of the owning robot; read by anyone.
pub struct AttributeStore {
    attributes: Vec<AttributeValue>,
    notifier: StateNotifier,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            notifier: StateNotifier::new(),
        }
    }

    /// First attribute matching the query, in store order.
    pub fn get_first_matching(&self, query: &AttributeQuery) -> Option<&AttributeValue> {
        self.attributes.iter().find(|a| a.matches(query))
    }

    /// All attributes matching the query, in store order. Each call returns a
    /// fresh snapshot.
    pub fn get_all_matching(&self, query: &AttributeQuery) -> Vec<AttributeValue> {
        self.attributes
            .iter()
            .filter(|a| a.matches(query))
            .cloned()
            .collect()
    }

    /// Replace the first attribute with the same `(class, type, sub_type)` key,
    /// or append if there is none.
    pub fn upsert_first_matching(&mut self, value: AttributeValue) {
        let key = value.key();
        match self.attributes.iter().position(|a| a.matches(&key)) {
            Some(index) => {
                debug!(
                    "Replacing {} {} at slot {}",
                    value.class(),
                    value.type_name(),
                    index
                );
                self.attributes[index] = value;
            }
            None => {
                debug!("Appending {} {}", value.class(), value.type_name());
                self.attributes.push(value);
            }
        }
    }

    /// Signal observers that attributes changed.
    pub fn notify_changed(&self) {
        self.notifier.notify();
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notifier.subscribe()
    }

    /// Number of change notifications emitted so far.
    pub fn version(&self) -> u64 {
        self.notifier.version()
    }

    /// Clone of every stored attribute, in store order.
    pub fn snapshot(&self) -> Vec<AttributeValue> {
        self.attributes.clone()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}
