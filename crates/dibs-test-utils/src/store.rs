//! [`RawStore`] builder for the flat key-value namespace.

use std::collections::{BTreeMap, HashMap};

const DEFAULT_REALM: &str = "be/services";

/// Flat raw entries keyed `<realm>/<identifier>/<selector>/<relative-path>`.
#[derive(Debug, Clone)]
pub struct RawStore {
    realm: String,
    identifier: String,
    entries: BTreeMap<String, String>,
}

impl RawStore {
    /// Store under the default realm, with `identifier` as the second segment
    pub fn new(identifier: &str) -> Self {
        Self::with_realm(DEFAULT_REALM, identifier)
    }

    pub fn with_realm(realm: &str, identifier: &str) -> Self {
        Self {
            realm: realm.to_string(),
            identifier: identifier.to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Full raw key for a selector and relative path
    pub fn key(&self, selector: &str, relative_path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.realm, self.identifier, selector, relative_path
        )
    }

    /// Add an entry
    pub fn entry(mut self, selector: &str, relative_path: &str, value: &str) -> Self {
        let key = self.key(selector, relative_path);
        self.entries.insert(key, value.to_string());
        self
    }

    /// Add an entry with a verbatim key
    pub fn raw(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn into_hash_map(self) -> HashMap<String, String> {
        self.entries.into_iter().collect()
    }
}

/// Token table from `(name, value)` pairs
pub fn tokens(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
