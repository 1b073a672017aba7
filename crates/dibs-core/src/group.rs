//! Regrouping of resolved values into configuration files
//!
//! A relative path either names a whole file (`FILES/app.conf`) or a property
//! inside a property-bag file (`app.properties#db.host`). Each file name has
//! exactly one kind, decided by the first relative path that mentions it.

use crate::conventions::Conventions;
use crate::extract::ConfigValue;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The two shapes a configuration file can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileKind {
    /// Opaque whole-file blob
    File,
    /// Key/value property bag
    Properties,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::File => write!(f, "FILE"),
            FileKind::Properties => write!(f, "PROPERTIES"),
        }
    }
}

/// A logical configuration file.
///
/// Serializes with a `type` tag:
///
/// ```json
/// {"type": "FILE", "contents": {"value": "...", "bucket": "global"}}
/// {"type": "PROPERTIES", "properties": {"key1": {"value": "...", "bucket": "global"}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ConfigFile {
    /// Whole-file config
    File { contents: ConfigValue },

    /// Property-bag config
    Properties {
        properties: BTreeMap<String, ConfigValue>,
    },
}

impl ConfigFile {
    pub fn kind(&self) -> FileKind {
        match self {
            ConfigFile::File { .. } => FileKind::File,
            ConfigFile::Properties { .. } => FileKind::Properties,
        }
    }

    /// Contents of a whole-file config
    pub fn contents(&self) -> Option<&ConfigValue> {
        match self {
            ConfigFile::File { contents } => Some(contents),
            ConfigFile::Properties { .. } => None,
        }
    }

    /// Properties of a property-bag config
    pub fn properties(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigFile::File { .. } => None,
            ConfigFile::Properties { properties } => Some(properties),
        }
    }
}

/// Where a relative path lands after grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement<'a> {
    File { file_name: &'a str },
    Property { file_name: &'a str, key: &'a str },
}

impl<'a> Placement<'a> {
    fn of(conventions: &Conventions, relative_path: &'a str) -> Self {
        if let Some(file_name) = relative_path.strip_prefix(conventions.file_prefix.as_str()) {
            return Placement::File { file_name };
        }

        match relative_path.split_once(conventions.property_separator.as_str()) {
            Some((file_name, key)) => Placement::Property { file_name, key },
            None => Placement::Property {
                file_name: relative_path,
                key: relative_path,
            },
        }
    }
}

/// Group with the default [`Conventions`]
///
/// ```
/// use dibs_core::{ConfigValue, FileKind, group};
/// use std::collections::BTreeMap;
///
/// let value = ConfigValue { value: "djE".into(), bucket: "global".into() };
/// let resolved = BTreeMap::from([
///     ("FILES/app.conf".to_string(), value.clone()),
///     ("app.properties#key1".to_string(), value.clone()),
/// ]);
///
/// let files = group(&resolved).unwrap();
/// assert_eq!(files["app.conf"].kind(), FileKind::File);
/// assert_eq!(files["app.properties"].properties().unwrap()["key1"], value);
/// ```
pub fn group(resolved: &BTreeMap<String, ConfigValue>) -> Result<BTreeMap<String, ConfigFile>> {
    group_with(&Conventions::default(), resolved)
}

/// Fold resolved relative paths into configuration files keyed by file name
///
/// # Errors
///
/// [`Error::ConflictingFileKind`] if one file name is reached both as a whole
/// file and as a property bag.
pub fn group_with(
    conventions: &Conventions,
    resolved: &BTreeMap<String, ConfigValue>,
) -> Result<BTreeMap<String, ConfigFile>> {
    let mut files: BTreeMap<String, ConfigFile> = BTreeMap::new();

    for (relative_path, value) in resolved {
        match Placement::of(conventions, relative_path) {
            Placement::File { file_name } => {
                let existing = files.get(file_name).map(ConfigFile::kind);
                if let Some(kind) = existing.filter(|kind| *kind != FileKind::File) {
                    return Err(conflict(file_name, kind, FileKind::File));
                }
                files.insert(
                    file_name.to_string(),
                    ConfigFile::File {
                        contents: value.clone(),
                    },
                );
            }
            Placement::Property { file_name, key } => {
                let file = files
                    .entry(file_name.to_string())
                    .or_insert_with(|| ConfigFile::Properties {
                        properties: BTreeMap::new(),
                    });
                match file {
                    ConfigFile::Properties { properties } => {
                        properties.insert(key.to_string(), value.clone());
                    }
                    ConfigFile::File { .. } => {
                        return Err(conflict(
                            file_name,
                            FileKind::File,
                            FileKind::Properties,
                        ));
                    }
                }
            }
        }
    }

    tracing::debug!(
        paths = resolved.len(),
        files = files.len(),
        "Grouped config values into files"
    );
    Ok(files)
}

fn conflict(file_name: &str, existing: FileKind, incoming: FileKind) -> Error {
    tracing::warn!(file_name, %existing, %incoming, "Conflicting config file kinds");
    Error::ConflictingFileKind {
        file_name: file_name.to_string(),
        existing,
        incoming,
    }
}
