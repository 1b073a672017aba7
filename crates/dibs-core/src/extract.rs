//! Extraction of bucket-scoped entries from the flat key-value namespace
//!
//! Raw keys have the shape
//! `<realm-prefix>/<identifier>/<selector>/<relative-path>`. Every selector
//! of the chain gets its own matcher; an entry whose key matches contributes a
//! candidate for its relative path, and the candidate from the most specific
//! selector (lowest rank) is kept. Within one bucket this means
//! `bucket#service` beats `bucket`.

use crate::chain::BucketChain;
use crate::conventions::{Conventions, ValueEncoding};
use crate::token::Tokenizer;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// A resolved, encoded config value and the selector it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigValue {
    /// Tokenized value, base64 encoded without padding
    pub value: String,

    /// Text of the winning selector, e.g. `live_web#web`
    pub bucket: String,
}

impl ConfigValue {
    /// Tokenize and encode a raw value
    pub fn encode(
        raw: &str,
        bucket: impl Into<String>,
        tokenizer: &Tokenizer,
        encoding: ValueEncoding,
    ) -> Self {
        Self {
            value: encoding.encode(tokenizer.tokenize(raw)),
            bucket: bucket.into(),
        }
    }

    /// Decode the value with the default encoding
    pub fn decode(&self) -> Result<String> {
        self.decode_with(ValueEncoding::default())
    }

    /// Decode the value with an explicit encoding
    pub fn decode_with(&self, encoding: ValueEncoding) -> Result<String> {
        let bytes = encoding.decode(&self.value).map_err(|e| Error::Decode {
            bucket: self.bucket.clone(),
            message: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| Error::Decode {
            bucket: self.bucket.clone(),
            message: e.to_string(),
        })
    }
}

/// Compiled matcher for one selector of the chain
struct SelectorMatcher<'c> {
    rank: usize,
    selector: &'c str,
    pattern: Regex,
}

impl<'c> SelectorMatcher<'c> {
    fn new(conventions: &Conventions, rank: usize, selector: &'c str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            "^{}/[^/]*/{}/(.*)$",
            regex::escape(&conventions.realm_prefix),
            regex::escape(selector)
        ))?;
        Ok(Self {
            rank,
            selector,
            pattern,
        })
    }

    /// Relative path of `key`, if it belongs to this selector and is non-empty
    fn relative_path<'k>(&self, key: &'k str) -> Option<&'k str> {
        self.pattern
            .captures(key)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|path| !path.is_empty())
    }
}

struct Candidate {
    rank: usize,
    raw_key: String,
    value: ConfigValue,
}

impl Candidate {
    /// Lower rank wins; equal ranks fall back to the greater raw key
    fn beats(&self, other: &Candidate) -> bool {
        (self.rank, Reverse(&self.raw_key)) < (other.rank, Reverse(&other.raw_key))
    }
}

/// Extract with the default [`Conventions`]
///
/// `raw_entries` is anything iterable as key/value string pairs, such as
/// `&HashMap<String, String>` or `&BTreeMap<String, String>`.
pub fn extract<I, K, V>(
    chain: &BucketChain,
    raw_entries: I,
    tokens: &HashMap<String, String>,
) -> Result<BTreeMap<String, ConfigValue>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    extract_with(&Conventions::default(), chain, raw_entries, tokens)
}

/// Resolve one [`ConfigValue`] per relative path from the raw entries
///
/// All selector matchers and the token table are compiled before any entry
/// is read, so a [`Error::Pattern`] aborts the whole extraction.
pub fn extract_with<I, K, V>(
    conventions: &Conventions,
    chain: &BucketChain,
    raw_entries: I,
    tokens: &HashMap<String, String>,
) -> Result<BTreeMap<String, ConfigValue>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let matchers = chain
        .ranked()
        .map(|(rank, selector)| SelectorMatcher::new(conventions, rank, selector.as_str()))
        .collect::<Result<Vec<_>>>()?;
    let tokenizer = Tokenizer::new(tokens)?;

    let mut matched = vec![0usize; matchers.len()];
    let mut candidates: BTreeMap<String, Candidate> = BTreeMap::new();

    for (key, raw) in raw_entries {
        let key = key.as_ref();
        for matcher in &matchers {
            let Some(relative_path) = matcher.relative_path(key) else {
                continue;
            };
            matched[matcher.rank] += 1;

            let candidate = Candidate {
                rank: matcher.rank,
                raw_key: key.to_string(),
                value: ConfigValue::encode(
                    raw.as_ref(),
                    matcher.selector,
                    &tokenizer,
                    conventions.encoding,
                ),
            };
            match candidates.entry(relative_path.to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(mut slot) => {
                    if candidate.beats(slot.get()) {
                        slot.insert(candidate);
                    }
                }
            }
        }
    }

    for matcher in &matchers {
        tracing::trace!(
            selector = matcher.selector,
            rank = matcher.rank,
            entries = matched[matcher.rank],
            "Matched raw entries"
        );
    }

    let resolved: BTreeMap<String, ConfigValue> = candidates
        .into_iter()
        .map(|(path, candidate)| (path, candidate.value))
        .collect();
    tracing::debug!(
        selectors = matchers.len(),
        resolved = resolved.len(),
        "Extracted config values"
    );
    Ok(resolved)
}
