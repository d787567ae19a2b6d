use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{DataError, DataResult};
use crate::schema::display_name;

/// Ordered column names shared by every row of a table
pub type Header = Arc<[String]>;

/// One row: ordered mapping from column name to text value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Header,
    values: Vec<String>,
}

impl Record {
    /// Build a record; `values` must line up with `header`
    pub fn new(header: Header, values: Vec<String>) -> Self {
        debug_assert_eq!(header.len(), values.len());
        Self { header, values }
    }

    /// Convenience constructor from `(column, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            header: columns.into(),
            values,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        column_index(&self.header, column)
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.position(column).map(|i| self.values[i].as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

pub fn column_index(header: &[String], column: &str) -> Option<usize> {
    header.iter().position(|c| c == column)
}

/// A fully read CSV table
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub header: Header,
    pub records: Vec<Record>,
}

/// Read a CSV file into memory, keeping row context on failure
pub fn read_table(path: &Path) -> DataResult<Table> {
    let name = display_name(path);
    let file = File::open(path)?;
    read_table_from(name, file)
}

/// Read CSV data from any reader; `name` is used in error messages
pub fn read_table_from<R: std::io::Read>(name: impl Into<String>, reader: R) -> DataResult<Table> {
    let name = name.into();
    let mut rdr = csv::Reader::from_reader(reader);

    let header: Header = rdr
        .headers()
        .map_err(|e| DataError::csv(&name, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect::<Vec<_>>()
        .into();

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        match rdr.read_record(&mut row) {
            Ok(true) => {
                let values = row.iter().map(str::to_string).collect();
                records.push(Record::new(header.clone(), values));
            }
            Ok(false) => break,
            Err(e) => return Err(DataError::csv(&name, e)),
        }
    }

    tracing::debug!(file = %name, rows = records.len(), "read table");

    Ok(Table {
        name,
        header,
        records,
    })
}
