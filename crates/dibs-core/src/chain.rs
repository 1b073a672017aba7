//! Bucket chain resolution
//!
//! Walks the inheritance schema from a starting bucket up to the root and
//! emits two selectors per bucket: the service-specific one
//! (`bucket#service`) followed by the generic one (`bucket`). Position in the
//! chain is precedence: the first selector is the most specific.
//!
//! The UAT bucket is special. Its successor is not read from the schema but
//! derived from the *starting* bucket name, swapping the UAT prefix for the
//! live prefix (`uat_web` → `live_web`).

use crate::conventions::Conventions;
use crate::schema::BucketSchema;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One entry of a [`BucketChain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    /// Bucket identifier
    pub bucket: String,

    /// Service qualifier, `None` for the generic selector
    pub service: Option<String>,

    /// Full selector text as it appears in raw keys
    pub text: String,
}

impl Selector {
    /// Generic selector matching `bucket` alone
    pub fn generic(bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        Self {
            text: bucket.clone(),
            bucket,
            service: None,
        }
    }

    /// Service-specific selector `bucket<sep>service`
    pub fn qualified(
        bucket: impl Into<String>,
        service: impl Into<String>,
        conventions: &Conventions,
    ) -> Self {
        let bucket = bucket.into();
        let service = service.into();
        Self {
            text: conventions.qualified_selector(&bucket, &service),
            bucket,
            service: Some(service),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_service_specific(&self) -> bool {
        self.service.is_some()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered selectors, most specific first.
///
/// The rank of a selector is its index: rank `0` beats every other rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketChain {
    selectors: Vec<Selector>,
}

impl BucketChain {
    /// Build a chain from selectors already in precedence order
    pub fn from_selectors(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Selectors in precedence order
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Selectors paired with their rank
    pub fn ranked(&self) -> impl DoubleEndedIterator<Item = (usize, &Selector)> {
        self.selectors.iter().enumerate()
    }

    /// Rank of the selector with the given text, if present
    pub fn rank_of(&self, selector: &str) -> Option<usize> {
        self.selectors.iter().position(|s| s.text == selector)
    }

    /// Selector texts in precedence order
    pub fn to_strings(&self) -> Vec<String> {
        self.selectors.iter().map(|s| s.text.clone()).collect()
    }

    fn push_bucket(&mut self, bucket: &str, service: &str, conventions: &Conventions) {
        self.selectors
            .push(Selector::qualified(bucket, service, conventions));
        self.selectors.push(Selector::generic(bucket));
    }
}

impl<'a> IntoIterator for &'a BucketChain {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

/// Resolve the bucket chain using the default [`Conventions`]
///
/// # Example
///
/// ```
/// use dibs_core::{BucketMeta, BucketSchema, resolve_chain};
///
/// let schema: BucketSchema = [
///     ("A", BucketMeta::with_parents(["B"])),
///     ("B", BucketMeta::with_parents(["global"])),
/// ]
/// .into_iter()
/// .collect();
///
/// let chain = resolve_chain("A", &schema, "svc", false).unwrap();
/// assert_eq!(
///     chain.to_strings(),
///     vec!["A#svc", "A", "B#svc", "B", "global#svc", "global"]
/// );
/// ```
pub fn resolve_chain(
    start_bucket: &str,
    schema: &BucketSchema,
    service: &str,
    is_local: bool,
) -> Result<BucketChain> {
    resolve_chain_with(&Conventions::default(), start_bucket, schema, service, is_local)
}

/// Resolve the bucket chain for `service` starting at `start_bucket`
///
/// # Errors
///
/// - [`Error::UnknownBucket`] if a bucket on the path is not in the schema
/// - [`Error::NoParent`] if a bucket on the path has an empty parent list
/// - [`Error::InvalidUatBucket`] if the UAT bucket is reached from a start
///   bucket without the UAT prefix
/// - [`Error::CyclicChain`] if the path revisits a bucket
pub fn resolve_chain_with(
    conventions: &Conventions,
    start_bucket: &str,
    schema: &BucketSchema,
    service: &str,
    is_local: bool,
) -> Result<BucketChain> {
    let mut chain = BucketChain::default();
    if is_local {
        chain
            .selectors
            .push(Selector::generic(conventions.local_bucket.as_str()));
    }
    chain.push_bucket(start_bucket, service, conventions);

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(start_bucket.to_string());

    let mut current = start_bucket.to_string();
    while current != conventions.root_bucket {
        let next = next_bucket(conventions, start_bucket, &current, schema)?;
        tracing::trace!(from = %current, to = %next, "Following bucket parent");

        if !visited.insert(next.clone()) {
            return Err(Error::CyclicChain {
                bucket: next,
                start_bucket: start_bucket.to_string(),
            });
        }

        chain.push_bucket(&next, service, conventions);
        current = next;
    }

    tracing::debug!(
        start_bucket,
        service,
        is_local,
        selectors = chain.len(),
        "Resolved bucket chain"
    );
    Ok(chain)
}

fn next_bucket(
    conventions: &Conventions,
    start_bucket: &str,
    current: &str,
    schema: &BucketSchema,
) -> Result<String> {
    if current == conventions.uat_bucket {
        let suffix = start_bucket
            .strip_prefix(conventions.uat_prefix.as_str())
            .ok_or_else(|| Error::InvalidUatBucket {
                start_bucket: start_bucket.to_string(),
                prefix: conventions.uat_prefix.clone(),
            })?;
        return Ok(format!("{}{suffix}", conventions.live_prefix));
    }

    let meta = schema.get(current).ok_or_else(|| Error::UnknownBucket {
        bucket: current.to_string(),
    })?;
    meta.first_parent()
        .map(str::to_string)
        .ok_or_else(|| Error::NoParent {
            bucket: current.to_string(),
        })
}
