//! Per-artifact state store
//!
//! A keyed container that lets each artifact (or artifact version) keep
//! transient UI state across remounts without colliding with others.
//!
//! ## Contract
//!
//! - `read(key, initial)` returns the stored value, or `initial` when the key
//!   was never written. Reading never creates an entry.
//! - `write(key, value)` replaces the whole value and notifies the observers
//!   subscribed to that key.
//! - Last write wins; there is no merging.
//!
//! Values are stored as JSON so the store stays serializable; each call site
//! binds its own value type through [`StateKey<T>`].

use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::ArtifactId;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("State '{key}' does not hold a {expected}: {source}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize state '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A typed handle to one entry of the store
pub struct StateKey<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    /// Key with a caller-chosen name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// Key for the whole state of one artifact identity (`counter.v2`)
    pub fn for_artifact(id: &ArtifactId) -> Self {
        Self::new(id.to_string())
    }

    /// Key for one field of an artifact identity (`counter.v2/count`)
    pub fn scoped(id: &ArtifactId, field: &str) -> Self {
        Self::new(format!("{}/{}", id, field))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone())
    }
}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateKey").field(&self.name).finish()
    }
}

/// Handle returned by [`StateStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    key: String,
    observer: Box<dyn FnMut(&str)>,
}

/// Keyed state shared by every mounted artifact
#[derive(Default)]
pub struct StateStore {
    entries: HashMap<String, Value>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, or `initial` without persisting it
    pub fn read<T: DeserializeOwned>(&self, key: &StateKey<T>, initial: T) -> Result<T, StateError> {
        match self.entries.get(key.name()) {
            Some(value) => {
                T::deserialize(value).map_err(|source| StateError::TypeMismatch {
                    key: key.name().to_string(),
                    expected: type_name::<T>(),
                    source,
                })
            }
            None => Ok(initial),
        }
    }

    /// Replaces the value and notifies observers of the key
    pub fn write<T: Serialize>(&mut self, key: &StateKey<T>, value: &T) -> Result<(), StateError> {
        let value = serde_json::to_value(value).map_err(|source| StateError::Serialize {
            key: key.name().to_string(),
            source,
        })?;

        self.entries.insert(key.name().to_string(), value);
        tracing::trace!(key = key.name(), "state written");

        for sub in self.subscriptions.iter_mut().filter(|s| s.key == key.name()) {
            (sub.observer)(&sub.key);
        }

        Ok(())
    }

    /// Registers an observer called after every write to `key`
    pub fn subscribe(
        &mut self,
        key: impl Into<String>,
        observer: impl FnMut(&str) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            key: key.into(),
            observer: Box::new(observer),
        });
        id
    }

    /// Removes an observer; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// True if the key has been written
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tears the store down: drops every entry and observer
    pub fn clear(&mut self) {
        self.entries.clear();
        self.subscriptions.clear();
    }

    /// Sorted copy of all entries
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("entries", &self.entries)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
