//! Resolve data file names to table schemas and partition keys

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::tables::ALL_TABLES;
use super::types::{PartitionKind, TableSchema};
use crate::error::{DataError, DataResult};

/// Game stage an augment table was offered at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    TwoOne,
    ThreeTwo,
    FourTwo,
}

impl Stage {
    pub const ALL: &'static [Stage] = &[Stage::TwoOne, Stage::ThreeTwo, Stage::FourTwo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::TwoOne => "2-1",
            Stage::ThreeTwo => "3-2",
            Stage::FourTwo => "4-2",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}

/// Partition value taken from a file name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionKey {
    Stage(Stage),
    Region(String),
}

impl PartitionKey {
    pub fn kind(&self) -> PartitionKind {
        match self {
            PartitionKey::Stage(_) => PartitionKind::Stage,
            PartitionKey::Region(_) => PartitionKind::Region,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            PartitionKey::Stage(stage) => stage.as_str(),
            PartitionKey::Region(region) => region,
        }
    }
}

/// A data file on disk matched to its schema
#[derive(Debug, Clone)]
pub struct DatasetFile {
    pub path: PathBuf,
    pub schema: &'static TableSchema,
    pub partition: Option<PartitionKey>,
}

impl DatasetFile {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// File name component of a path, for messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Match a path against the known file patterns
pub fn resolve_file(path: &Path) -> DataResult<DatasetFile> {
    let name = display_name(path);

    // Exact names first so `items_s16_split.csv` never falls into a keyed pattern
    for schema in ALL_TABLES.iter().copied().filter(|t| t.partition.is_none()) {
        if name == schema.file.prefix {
            return Ok(DatasetFile {
                path: path.to_path_buf(),
                schema,
                partition: None,
            });
        }
    }

    for schema in ALL_TABLES.iter().copied() {
        let Some(kind) = schema.partition else {
            continue;
        };
        let Some(key) = name
            .strip_prefix(schema.file.prefix)
            .and_then(|rest| rest.strip_suffix(schema.file.suffix))
        else {
            continue;
        };

        let partition = parse_partition(kind, key).ok_or_else(|| DataError::InvalidPartition {
            file: name.clone(),
            key: key.to_string(),
        })?;

        return Ok(DatasetFile {
            path: path.to_path_buf(),
            schema,
            partition: Some(partition),
        });
    }

    Err(DataError::UnknownFile(name))
}

fn parse_partition(kind: PartitionKind, key: &str) -> Option<PartitionKey> {
    match kind {
        PartitionKind::Stage => key.parse().ok().map(PartitionKey::Stage),
        PartitionKind::Region => {
            let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric());
            valid.then(|| PartitionKey::Region(key.to_string()))
        }
    }
}

/// Find all recognised `.csv` files in a directory, sorted by file name
pub fn scan_dir(dir: &Path) -> DataResult<Vec<DatasetFile>> {
    let mut found = Vec::new();

    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "data directory missing, nothing to scan");
        return Ok(found);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        match resolve_file(&path) {
            Ok(file) => found.push(file),
            Err(DataError::UnknownFile(name)) => {
                tracing::debug!(file = %name, "skipping unrecognised file");
            }
            Err(DataError::InvalidPartition { file, key }) => {
                tracing::warn!(file = %file, key = %key, "skipping file with bad partition key");
            }
            Err(e) => return Err(e),
        }
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}
