//! Composition of the three resolution stages
//!
//! [`ConfigResolver`] owns a set of [`Conventions`] and runs
//! chain resolution, extraction and grouping in order. The intermediate
//! results are plain data, so callers that want to inspect or cache the chain
//! or the flat resolved map can call the stages one by one.

use crate::chain::{self, BucketChain};
use crate::conventions::Conventions;
use crate::extract::{self, ConfigValue};
use crate::group::{self, ConfigFile};
use crate::schema::BucketSchema;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Which service and environment to resolve configuration for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Most specific bucket, e.g. `uat_web`
    pub bucket: String,

    /// Service name used for service-specific selectors
    pub service: String,

    /// Prepend the local override selector
    #[serde(default)]
    pub is_local: bool,
}

impl ResolveRequest {
    pub fn new(bucket: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            service: service.into(),
            is_local: false,
        }
    }

    /// Include the local override bucket
    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }
}

/// Runs the resolve → extract → group pipeline with shared conventions
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    conventions: Conventions,
}

impl ConfigResolver {
    /// Create a resolver after validating the conventions
    pub fn new(conventions: Conventions) -> Result<Self> {
        conventions.validate()?;
        Ok(Self { conventions })
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Ordered bucket chain for the request
    pub fn resolve_chain(
        &self,
        request: &ResolveRequest,
        schema: &BucketSchema,
    ) -> Result<BucketChain> {
        chain::resolve_chain_with(
            &self.conventions,
            &request.bucket,
            schema,
            &request.service,
            request.is_local,
        )
    }

    /// Flat map of relative path to winning value
    pub fn extract<I, K, V>(
        &self,
        chain: &BucketChain,
        raw_entries: I,
        tokens: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, ConfigValue>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        extract::extract_with(&self.conventions, chain, raw_entries, tokens)
    }

    /// Files keyed by file name
    pub fn group(
        &self,
        resolved: &BTreeMap<String, ConfigValue>,
    ) -> Result<BTreeMap<String, ConfigFile>> {
        group::group_with(&self.conventions, resolved)
    }

    /// Run all three stages
    pub fn resolve<I, K, V>(
        &self,
        request: &ResolveRequest,
        schema: &BucketSchema,
        raw_entries: I,
        tokens: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, ConfigFile>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let _span = tracing::debug_span!(
            "resolve",
            bucket = %request.bucket,
            service = %request.service
        )
        .entered();

        let chain = self.resolve_chain(request, schema)?;
        let resolved = self.extract(&chain, raw_entries, tokens)?;
        self.group(&resolved)
    }
}
