//! Whole-table rewrites of list columns

use std::collections::HashSet;

use crate::error::{DataError, DataResult, SplitError};
use crate::parser::{column_index, join_list, parse_list, Header, Record, Table};

/// Name of the column added by [`add_win_flag`]
pub const WIN_COLUMN: &str = "is_win";

fn missing(table: &Table, column: &str) -> DataError {
    DataError::Row {
        file: table.name.clone(),
        row: 0,
        source: SplitError::MalformedRecord {
            column: column.to_string(),
        },
    }
}

/// Rewrite a list column as the canonical join of its parts
///
/// `" a; ;b;"` becomes `"a;b"`. Other columns are untouched.
pub fn normalize_column(table: &Table, column: &str, delimiter: &str) -> DataResult<Table> {
    let index = column_index(&table.header, column).ok_or_else(|| missing(table, column))?;

    let mut changed = 0usize;
    let records = table
        .records
        .iter()
        .map(|record| {
            let mut values = record.values().to_vec();
            let normalized = join_list(&parse_list(&values[index], delimiter), delimiter);
            if normalized != values[index] {
                changed += 1;
                values[index] = normalized;
            }
            Record::new(table.header.clone(), values)
        })
        .collect();

    tracing::info!(file = %table.name, column, changed, "normalized list column");

    Ok(Table {
        name: table.name.clone(),
        header: table.header.clone(),
        records,
    })
}

/// One output row per list element; rows with an empty list are dropped
///
/// The column keeps its position and is renamed to `value_name` when given.
pub fn explode_column(
    table: &Table,
    column: &str,
    delimiter: &str,
    value_name: Option<&str>,
) -> DataResult<Table> {
    let index = column_index(&table.header, column).ok_or_else(|| missing(table, column))?;

    let header: Header = match value_name {
        Some(name) if name != column => {
            if column_index(&table.header, name).is_some() {
                return Err(DataError::Row {
                    file: table.name.clone(),
                    row: 0,
                    source: SplitError::DuplicateColumn {
                        column: name.to_string(),
                    },
                });
            }
            let mut renamed = table.header.to_vec();
            renamed[index] = name.to_string();
            renamed.into()
        }
        _ => table.header.clone(),
    };

    let mut records = Vec::new();
    for record in &table.records {
        let values = record.values();
        for part in parse_list(&values[index], delimiter) {
            let mut row = values.to_vec();
            row[index] = part.to_string();
            records.push(Record::new(header.clone(), row));
        }
    }

    tracing::info!(
        file = %table.name,
        column,
        input_rows = table.records.len(),
        output_rows = records.len(),
        "exploded list column"
    );

    Ok(Table {
        name: table.name.clone(),
        header,
        records,
    })
}

/// Keep only the named columns, in the given order, renaming as listed
///
/// Each pair is `(source, output name)`.
pub fn select_columns(table: &Table, columns: &[(&str, &str)]) -> DataResult<Table> {
    let indexes = columns
        .iter()
        .map(|(source, _)| {
            column_index(&table.header, source).ok_or_else(|| missing(table, source))
        })
        .collect::<DataResult<Vec<_>>>()?;
    let header: Header = columns.iter().map(|(_, name)| name.to_string()).collect();

    let records = table
        .records
        .iter()
        .map(|record| {
            let values = record.values();
            let row = indexes.iter().map(|&i| values[i].clone()).collect();
            Record::new(header.clone(), row)
        })
        .collect();

    Ok(Table {
        name: table.name.clone(),
        header,
        records,
    })
}

/// Drop rows whose key columns repeat an earlier row; first occurrence wins
pub fn distinct_by(table: &Table, key_columns: &[&str]) -> DataResult<Table> {
    let indexes = key_columns
        .iter()
        .map(|column| column_index(&table.header, column).ok_or_else(|| missing(table, column)))
        .collect::<DataResult<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let records: Vec<Record> = table
        .records
        .iter()
        .filter(|record| {
            let values = record.values();
            let key: Vec<&str> = indexes.iter().map(|&i| values[i].as_str()).collect();
            seen.insert(key)
        })
        .cloned()
        .collect();

    tracing::debug!(
        file = %table.name,
        input_rows = table.records.len(),
        output_rows = records.len(),
        "dropped repeated keys"
    );

    Ok(Table {
        name: table.name.clone(),
        header: table.header.clone(),
        records,
    })
}

/// Append `is_win`: `true` when `placement <= threshold`, otherwise `false`
pub fn add_win_flag(table: &Table, threshold: u8) -> DataResult<Table> {
    let index =
        column_index(&table.header, "placement").ok_or_else(|| missing(table, "placement"))?;
    if column_index(&table.header, WIN_COLUMN).is_some() {
        return Err(DataError::Row {
            file: table.name.clone(),
            row: 0,
            source: SplitError::DuplicateColumn {
                column: WIN_COLUMN.to_string(),
            },
        });
    }

    let mut header = table.header.to_vec();
    header.push(WIN_COLUMN.to_string());
    let header: Header = header.into();

    let records = table
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let cell = record.values()[index].trim();
            let placement: u8 = cell.parse().map_err(|e| DataError::InvalidField {
                file: table.name.clone(),
                row: i as u64 + 1,
                message: format!("placement '{}': {}", cell, e),
            })?;
            let mut values = record.values().to_vec();
            values.push((placement <= threshold).to_string());
            Ok(Record::new(header.clone(), values))
        })
        .collect::<DataResult<Vec<_>>>()?;

    Ok(Table {
        name: table.name.clone(),
        header,
        records,
    })
}
