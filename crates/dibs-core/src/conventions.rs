//! Naming conventions shared by every pipeline stage
//!
//! The bucket layout relies on a handful of well-known names and separators:
//! the root bucket, the UAT-to-live naming jump, the realm prefix of raw keys,
//! the whole-file marker and the property separator. They default to the
//! production values and can be overridden from TOML:
//!
//! ```toml
//! root_bucket = "global"
//! realm_prefix = "be/services"
//! encoding = "standard-no-pad"
//! ```

use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_root_bucket() -> String {
    "global".to_string()
}

fn default_local_bucket() -> String {
    "local".to_string()
}

fn default_uat_bucket() -> String {
    "uat".to_string()
}

fn default_uat_prefix() -> String {
    "uat_".to_string()
}

fn default_live_prefix() -> String {
    "live_".to_string()
}

fn default_realm_prefix() -> String {
    "be/services".to_string()
}

fn default_file_prefix() -> String {
    "FILES/".to_string()
}

fn default_separator() -> String {
    "#".to_string()
}

/// Base64 alphabet used for resolved config values.
///
/// Both variants omit padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueEncoding {
    /// URL-safe alphabet (`-`, `_`).
    #[default]
    UrlSafeNoPad,

    /// Standard alphabet (`+`, `/`), as read by older deploy agents.
    StandardNoPad,
}

impl ValueEncoding {
    /// Encode raw bytes with this alphabet.
    pub fn encode(&self, input: impl AsRef<[u8]>) -> String {
        match self {
            ValueEncoding::UrlSafeNoPad => URL_SAFE_NO_PAD.encode(input),
            ValueEncoding::StandardNoPad => STANDARD_NO_PAD.encode(input),
        }
    }

    /// Decode a string produced by [`ValueEncoding::encode`].
    pub fn decode(&self, input: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        match self {
            ValueEncoding::UrlSafeNoPad => URL_SAFE_NO_PAD.decode(input),
            ValueEncoding::StandardNoPad => STANDARD_NO_PAD.decode(input),
        }
    }
}

impl fmt::Display for ValueEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueEncoding::UrlSafeNoPad => write!(f, "url-safe-no-pad"),
            ValueEncoding::StandardNoPad => write!(f, "standard-no-pad"),
        }
    }
}

/// Well-known bucket names, key prefixes and separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conventions {
    /// Universal root of every chain
    #[serde(default = "default_root_bucket")]
    pub root_bucket: String,

    /// Synthetic selector prepended for local runs
    #[serde(default = "default_local_bucket")]
    pub local_bucket: String,

    /// Bucket whose successor is derived by name rather than from the schema
    #[serde(default = "default_uat_bucket")]
    pub uat_bucket: String,

    /// Prefix stripped from the start bucket on the UAT jump
    #[serde(default = "default_uat_prefix")]
    pub uat_prefix: String,

    /// Prefix substituted on the UAT jump
    #[serde(default = "default_live_prefix")]
    pub live_prefix: String,

    /// Leading path segments of every raw key
    #[serde(default = "default_realm_prefix")]
    pub realm_prefix: String,

    /// Relative-path prefix marking a whole-file config
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Joins a bucket and a service into a selector
    #[serde(default = "default_separator")]
    pub service_separator: String,

    /// Splits a relative path into file name and property key
    #[serde(default = "default_separator")]
    pub property_separator: String,

    /// Alphabet for encoded values
    #[serde(default)]
    pub encoding: ValueEncoding,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            root_bucket: default_root_bucket(),
            local_bucket: default_local_bucket(),
            uat_bucket: default_uat_bucket(),
            uat_prefix: default_uat_prefix(),
            live_prefix: default_live_prefix(),
            realm_prefix: default_realm_prefix(),
            file_prefix: default_file_prefix(),
            service_separator: default_separator(),
            property_separator: default_separator(),
            encoding: ValueEncoding::default(),
        }
    }
}

impl Conventions {
    /// Parse conventions from TOML content and validate them
    ///
    /// Missing keys take their production defaults, so an empty document
    /// yields [`Conventions::default`].
    ///
    /// # Example
    ///
    /// ```
    /// use dibs_core::{Conventions, ValueEncoding};
    ///
    /// let conventions = Conventions::parse(r#"
    /// realm_prefix = "fe/apps"
    /// encoding = "standard-no-pad"
    /// "#).unwrap();
    ///
    /// assert_eq!(conventions.realm_prefix, "fe/apps");
    /// assert_eq!(conventions.root_bucket, "global");
    /// assert_eq!(conventions.encoding, ValueEncoding::StandardNoPad);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let conventions: Conventions = toml::from_str(content)?;
        conventions.validate()?;
        Ok(conventions)
    }

    /// Reject conventions that would make selectors or paths ambiguous
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("root_bucket", &self.root_bucket),
            ("local_bucket", &self.local_bucket),
            ("uat_bucket", &self.uat_bucket),
            ("uat_prefix", &self.uat_prefix),
            ("live_prefix", &self.live_prefix),
            ("realm_prefix", &self.realm_prefix),
            ("file_prefix", &self.file_prefix),
            ("service_separator", &self.service_separator),
            ("property_separator", &self.property_separator),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::InvalidConventions {
                    message: format!("{name} must not be empty"),
                });
            }
        }

        if self.realm_prefix.starts_with('/') || self.realm_prefix.ends_with('/') {
            return Err(Error::InvalidConventions {
                message: format!(
                    "realm_prefix must not start or end with '/': {}",
                    self.realm_prefix
                ),
            });
        }

        Ok(())
    }

    /// Service-specific selector text for a bucket
    pub fn qualified_selector(&self, bucket: &str, service: &str) -> String {
        format!("{bucket}{}{service}", self.service_separator)
    }
}
