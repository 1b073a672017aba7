//! Error types for dibs-core

/// Result type for dibs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, extracting or grouping configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bucket on the inheritance path is missing from the schema
    #[error("Bucket not found in schema: {bucket}")]
    UnknownBucket { bucket: String },

    /// A bucket on the inheritance path declares no parent
    #[error("Bucket has no parent: {bucket}")]
    NoParent { bucket: String },

    /// The UAT bucket was reached from a start bucket outside the UAT family
    #[error("Cannot derive live bucket from {start_bucket}: missing prefix {prefix}")]
    InvalidUatBucket { start_bucket: String, prefix: String },

    /// The inheritance path loops back onto a bucket already visited
    #[error("Cyclic bucket chain: {bucket} reached twice starting from {start_bucket}")]
    CyclicChain { bucket: String, start_bucket: String },

    /// A file name received both whole-file and property contributions
    #[error("Conflicting config kinds for {file_name}: already {existing}, got {incoming}")]
    ConflictingFileKind {
        file_name: String,
        existing: crate::group::FileKind,
        incoming: crate::group::FileKind,
    },

    /// An encoded config value could not be decoded
    #[error("Invalid encoded value from {bucket}: {message}")]
    Decode { bucket: String, message: String },

    /// Naming conventions failed validation
    #[error("Invalid conventions: {message}")]
    InvalidConventions { message: String },

    /// A selector could not be turned into a key matcher
    #[error(transparent)]
    Pattern(#[from] regex::Error),

    /// JSON deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
