use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

/// Failure splitting a single record, without file context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("malformed record: missing column '{column}'")]
    MalformedRecord { column: String },

    #[error("column '{column}' has {found} parts, more than the {arity} allowed")]
    Overflow {
        column: String,
        found: usize,
        arity: usize,
    },

    #[error("split target column '{column}' already exists")]
    DuplicateColumn { column: String },
}

#[derive(Error, Debug)]
pub enum DataError {
    /// Row 0 is the header; data rows count from 1
    #[error("{file}: row {row}: {source}")]
    Row {
        file: String,
        row: u64,
        #[source]
        source: SplitError,
    },

    #[error("{file}: row {row}: invalid UTF-8")]
    Encoding { file: String, row: u64 },

    #[error("{file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{file}: row {row}: {message}")]
    InvalidField {
        file: String,
        row: u64,
        message: String,
    },

    #[error("{file}: missing required header: {column}")]
    MissingHeader { file: String, column: String },

    #[error("Unrecognised data file: {0}")]
    UnknownFile(String),

    #[error("Invalid partition key '{key}' in {file}")]
    InvalidPartition { file: String, key: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Output already exists: {0} (use --force to overwrite)")]
    OutputExists(String),

    #[error("Output directory already exists: {0} (delete it or choose another --label)")]
    DirectoryExists(String),
}

impl DataError {
    /// Wrap a csv error, lifting UTF-8 failures into `Encoding`
    pub fn csv(file: impl Into<String>, err: csv::Error) -> Self {
        let file = file.into();
        if let csv::ErrorKind::Utf8 { pos, .. } = err.kind() {
            // csv counts the header as record 0, matching our row numbering
            let row = pos.as_ref().map(|p| p.record()).unwrap_or(0);
            return DataError::Encoding { file, row };
        }
        DataError::Csv { file, source: err }
    }

    /// True for a missing source column, at any row
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            DataError::Row {
                source: SplitError::MalformedRecord { .. },
                ..
            }
        )
    }
}
