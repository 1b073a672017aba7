//! Shared test fixtures for the dibs workspace.
//!
//! Dev-dependency only. Never published.
//!
//! # Modules
//!
//! - [`schema`] — [`SchemaBuilder`] for bucket inheritance fixtures
//! - [`store`] — [`RawStore`] builder for the flat key-value namespace

pub mod schema;
pub mod store;

pub use schema::SchemaBuilder;
pub use store::{RawStore, tokens};
