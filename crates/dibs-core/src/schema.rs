//! Bucket inheritance schema
//!
//! The schema is supplied by the caller and is read-only here. Each bucket
//! lists its parents; only the first one takes part in chain resolution.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata for a single bucket.
///
/// Fields other than `parents` are accepted in the input and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketMeta {
    /// Parent bucket identifiers, in declaration order
    #[serde(default)]
    pub parents: Vec<String>,
}

impl BucketMeta {
    /// Create metadata with the given parents
    pub fn with_parents<I, S>(parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parents: parents.into_iter().map(Into::into).collect(),
        }
    }

    /// The parent consulted during resolution
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

/// Mapping from bucket identifier to bucket metadata.
///
/// Deserializes from `{"bucket": {"parents": ["parent"]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketSchema {
    buckets: BTreeMap<String, BucketMeta>,
}

impl BucketSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a schema from JSON content
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a schema from TOML content
    ///
    /// ```
    /// use dibs_core::BucketSchema;
    ///
    /// let schema = BucketSchema::from_toml(r#"
    /// [live_web]
    /// parents = ["live"]
    ///
    /// [live]
    /// parents = ["global"]
    /// "#).unwrap();
    ///
    /// assert_eq!(schema.get("live_web").unwrap().first_parent(), Some("live"));
    /// ```
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Add or replace a bucket
    pub fn insert(&mut self, bucket: impl Into<String>, meta: BucketMeta) {
        self.buckets.insert(bucket.into(), meta);
    }

    /// Look up a bucket
    pub fn get(&self, bucket: &str) -> Option<&BucketMeta> {
        self.buckets.get(bucket)
    }

    /// Check whether a bucket is declared
    pub fn contains(&self, bucket: &str) -> bool {
        self.buckets.contains_key(bucket)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for BucketSchema
where
    K: Into<String>,
    V: Into<BucketMeta>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            buckets: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<Vec<String>> for BucketMeta {
    fn from(parents: Vec<String>) -> Self {
        Self { parents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_ignores_extra_metadata() {
        let schema = BucketSchema::from_json(
            r#"{
                "uat_web": {"parents": ["uat", "qa"], "owner": "team-web"},
                "global": {"parents": []}
            }"#,
        )
        .unwrap();

        assert_eq!(schema.len(), 2);
        let meta = schema.get("uat_web").unwrap();
        assert_eq!(meta.parents, vec!["uat", "qa"]);
        assert_eq!(meta.first_parent(), Some("uat"));
    }

    #[test]
    fn test_missing_parents_field_defaults_to_empty() {
        let schema = BucketSchema::from_json(r#"{"orphan": {}}"#).unwrap();
        assert_eq!(schema.get("orphan").unwrap().first_parent(), None);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = BucketSchema::from_json(r#"{"a": {"parents": "global"}}"#);
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_collects_from_pairs() {
        let schema: BucketSchema = [("a", BucketMeta::with_parents(["global"]))]
            .into_iter()
            .collect();
        assert!(schema.contains("a"));
        assert!(!schema.contains("global"));
    }
}
