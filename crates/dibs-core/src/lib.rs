//! Layered configuration resolution for multi-environment deployments.
//!
//! A service's configuration is spread over named buckets that inherit from
//! one another (`local`, `uat_myservice`, `live_myservice`, ..., `global`).
//! This crate turns that layout into concrete files in three pure stages:
//!
//! 1. [`chain::resolve_chain`] walks the bucket schema and produces the
//!    ordered [`BucketChain`], most specific selector first.
//! 2. [`extract::extract`] pulls the raw entries for those selectors out of a
//!    flat key-value namespace, substitutes `${name}` tokens, encodes the
//!    values and keeps the most specific value per relative path.
//! 3. [`group::group`] folds the flat relative paths into whole-file and
//!    property-bag [`ConfigFile`]s.
//!
//! [`ConfigResolver`] runs the three stages with a shared set of
//! [`Conventions`].
//!
//! # Example
//!
//! ```
//! use dibs_core::{BucketSchema, ConfigResolver, ResolveRequest};
//! use std::collections::{BTreeMap, HashMap};
//!
//! let schema = BucketSchema::from_json(r#"{
//!     "live_web": { "parents": ["global"] }
//! }"#).unwrap();
//!
//! let mut raw = BTreeMap::new();
//! raw.insert("be/services/web/global/FILES/app.conf".to_string(), "port=${port}".to_string());
//!
//! let mut tokens = HashMap::new();
//! tokens.insert("port".to_string(), "8080".to_string());
//!
//! let request = ResolveRequest::new("live_web", "web");
//! let files = ConfigResolver::default()
//!     .resolve(&request, &schema, &raw, &tokens)
//!     .unwrap();
//!
//! let app = files["app.conf"].contents().unwrap();
//! assert_eq!(app.bucket, "global");
//! assert_eq!(app.decode().unwrap(), "port=8080");
//! ```

pub mod chain;
pub mod conventions;
pub mod error;
pub mod extract;
pub mod group;
pub mod logging;
pub mod pipeline;
pub mod schema;
pub mod token;

pub use chain::{BucketChain, Selector, resolve_chain};
pub use conventions::{Conventions, ValueEncoding};
pub use error::{Error, Result};
pub use extract::{ConfigValue, extract};
pub use group::{ConfigFile, FileKind, group};
pub use pipeline::{ConfigResolver, ResolveRequest};
pub use schema::{BucketMeta, BucketSchema};
pub use token::{Tokenizer, tokenize_config_value};
