//! [`SchemaBuilder`] for bucket inheritance fixtures.

use dibs_core::{BucketMeta, BucketSchema};

/// Builds a [`BucketSchema`] one bucket at a time.
///
/// # Example
///
/// ```rust
/// use dibs_test_utils::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .bucket("A", &["B"])
///     .bucket("B", &["global"])
///     .build();
/// assert!(schema.contains("A"));
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: BucketSchema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a bucket with its parents in order
    pub fn bucket(mut self, name: &str, parents: &[&str]) -> Self {
        self.schema
            .insert(name, BucketMeta::with_parents(parents.iter().copied()));
        self
    }

    /// The usual environment layout for one service:
    ///
    /// `uat_<service>` → `uat` → (name jump) → `live_<service>` → `live` → `global`
    pub fn environments(self, service: &str) -> Self {
        self.bucket(&format!("uat_{service}"), &["uat"])
            .bucket("uat", &["live"])
            .bucket(&format!("live_{service}"), &["live"])
            .bucket("live", &["global"])
    }

    pub fn build(self) -> BucketSchema {
        self.schema
    }
}
