//! `${name}` token substitution
//!
//! Substitution is a single left-to-right pass over placeholders whose name
//! is in the table. Replacement text is never scanned again, and any other
//! `${...}` text is kept verbatim, so an unknown placeholder never hides a
//! known one nested inside it (`${PORT:-${port}}`).

use crate::Result;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Compiled substitution table.
///
/// Built once per extraction and shared by every value.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    tokens: HashMap<String, String>,
    pattern: Option<Regex>,
}

impl Tokenizer {
    /// Compile a matcher for exactly the names in `tokens`
    pub fn new(tokens: &HashMap<String, String>) -> Result<Self> {
        let pattern = if tokens.is_empty() {
            None
        } else {
            // Longer names first so a name is never cut short by its own prefix
            let mut names: Vec<&str> = tokens.keys().map(String::as_str).collect();
            names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
            let alternation = names
                .iter()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"\$\{{({alternation})\}}"))?)
        };

        Ok(Self {
            tokens: tokens.clone(),
            pattern,
        })
    }

    /// Substitute every known placeholder in `raw`
    pub fn tokenize(&self, raw: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return raw.to_string();
        };

        pattern
            .replace_all(raw, |caps: &Captures<'_>| match self.tokens.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Replace every `${name}` in `raw` with `tokens[name]`
///
/// ```
/// use dibs_core::tokenize_config_value;
/// use std::collections::HashMap;
///
/// let tokens = HashMap::from([("h".to_string(), "db1".to_string())]);
/// assert_eq!(tokenize_config_value("host=${h}", &tokens).unwrap(), "host=db1");
/// assert_eq!(tokenize_config_value("${missing}", &tokens).unwrap(), "${missing}");
/// ```
///
/// # Errors
///
/// [`crate::Error::Pattern`] if the table is too large to compile.
pub fn tokenize_config_value(raw: &str, tokens: &HashMap<String, String>) -> Result<String> {
    Ok(Tokenizer::new(tokens)?.tokenize(raw))
}
