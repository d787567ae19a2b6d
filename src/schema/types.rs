/// Default separator for list-valued fields
pub const LIST_DELIMITER: &str = ";";

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    /// `;`-joined list of text values, stored as text
    List,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text | ColumnType::List => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }
}

/// Fixed-arity split of a list column into `<prefix>_0 .. <prefix>_(arity-1)`
#[derive(Debug, Clone)]
pub struct SplitRule {
    pub column: &'static str,
    pub prefix: &'static str,
    pub arity: usize,
    /// Name of the table the split produces
    pub target: &'static str,
}

/// Out-of-band partition carried in the file name rather than a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    /// Game stage, e.g. `augments_2-1_s16.csv`
    Stage,
    /// Server region, e.g. `matches_EUW.csv`
    Region,
}

impl PartitionKind {
    /// Column name used when the partition is materialised in a database
    pub fn column_name(&self) -> &'static str {
        match self {
            PartitionKind::Stage => "stage",
            PartitionKind::Region => "region",
        }
    }
}

/// File name pattern: `<prefix><key><suffix>` or exactly `<prefix><suffix>`
#[derive(Debug, Clone)]
pub struct FilePattern {
    pub prefix: &'static str,
    pub suffix: &'static str,
}

impl FilePattern {
    pub const fn exact(name: &'static str) -> Self {
        Self {
            prefix: name,
            suffix: "",
        }
    }

    pub const fn keyed(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// Render the pattern with `<key>` standing in for the partition
    pub fn display(&self, partition: Option<PartitionKind>) -> String {
        match partition {
            Some(PartitionKind::Stage) => format!("{}<stage>{}", self.prefix, self.suffix),
            Some(PartitionKind::Region) => format!("{}<REGION>{}", self.prefix, self.suffix),
            None => format!("{}{}", self.prefix, self.suffix),
        }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub file: FilePattern,
    pub columns: &'static [Column],
    /// Columns that together identify a row (not necessarily unique)
    pub key_columns: &'static [&'static str],
    pub partition: Option<PartitionKind>,
    /// Split this table supports, if any
    pub split: Option<SplitRule>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    pub fn file_pattern(&self) -> String {
        self.file.display(self.partition)
    }
}
