use std::path::{Path, PathBuf};

use crate::schema::LIST_DELIMITER;
use crate::split::Overflow;

/// Environment variable read for `--data-dir`
pub const DATA_DIR_ENV: &str = "TFT_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const RAW_SUBDIR: &str = "raw";
pub const PROCESSED_SUBDIR: &str = "processed";

/// Resolved runtime settings shared by the commands
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub delimiter: String,
    pub overflow: Overflow,
    /// Replace existing output files
    pub force: bool,
}

impl Settings {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            delimiter: LIST_DELIMITER.to_string(),
            overflow: Overflow::default(),
            force: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Base tables as collected
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join(RAW_SUBDIR)
    }

    /// Derived tables such as `items_s16_split.csv`
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join(PROCESSED_SUBDIR)
    }

    pub fn data_dirs(&self) -> [PathBuf; 2] {
        [self.raw_dir(), self.processed_dir()]
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_DATA_DIR))
    }
}
