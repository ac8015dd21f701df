//! In-memory option store

use std::collections::HashMap;

use parking_lot::RwLock;
use wikisave_core::ConfigStore;

/// [`ConfigStore`] over a string map. Keys are full option keys.
#[derive(Debug, Default)]
pub struct MapConfigStore {
    values: RwLock<HashMap<String, String>>,
}

impl MapConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { values: RwLock::new(values) }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    /// Copy every entry of `other` over this store.
    pub fn merge(&self, other: &MapConfigStore) {
        let incoming = other.values.read().clone();
        self.values.write().extend(incoming);
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl ConfigStore for MapConfigStore {
    fn get(&self, name: &str, default: &str) -> String {
        self.values.read().get(name).cloned().unwrap_or_else(|| default.to_string())
    }
}
