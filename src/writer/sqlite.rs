use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use super::schema_gen::{generate_create_table, generate_indexes, ROW_COLUMN};
use crate::error::DataError;
use crate::parser::{column_index, read_table, Record};
use crate::schema::{scan_dir, ColumnType, DatasetFile, TableSchema};
use crate::ui::{Phase, Ui};

const BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl SqlValue {
    /// Convert a CSV cell for a column of the given type; empty cells are NULL
    ///
    /// Text is stored as written. Integers may carry surrounding whitespace.
    pub fn from_cell(cell: &str, col_type: ColumnType) -> Result<Self, String> {
        match col_type {
            ColumnType::Integer => {
                let trimmed = cell.trim();
                if trimmed.is_empty() {
                    return Ok(SqlValue::Null);
                }
                trimmed
                    .parse()
                    .map(SqlValue::Integer)
                    .map_err(|e| format!("'{}' is not an integer: {}", trimmed, e))
            }
            ColumnType::Text | ColumnType::List if cell.is_empty() => Ok(SqlValue::Null),
            ColumnType::Text | ColumnType::List => Ok(SqlValue::Text(cell.to_string())),
        }
    }

    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    pub fn new(db_path: &Path) -> Result<Self> {
        // Remove existing database if present
        if db_path.exists() {
            std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        }

        let conn = Connection::open(db_path).context("Failed to create database")?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables for the given schemas
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        tracing::info!(tables = schemas.len(), "creating tables");

        for schema in schemas {
            let sql = generate_create_table(schema);
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        Ok(())
    }

    /// Import one CSV file into its table
    pub fn import_file(&mut self, file: &DatasetFile, ui: &mut impl Ui) -> Result<u64> {
        let schema = file.schema;
        let table = read_table(&file.path)?;

        // Position of each schema column in this file
        let positions = schema
            .columns
            .iter()
            .map(|col| {
                column_index(&table.header, col.name)
                    .map(|idx| (idx, col.col_type))
                    .ok_or_else(|| DataError::MissingHeader {
                        file: table.name.clone(),
                        column: col.name.to_string(),
                    })
            })
            .collect::<Result<Vec<(usize, ColumnType)>, _>>()?;

        let mut columns = vec![ROW_COLUMN.to_string()];
        if let Some(kind) = schema.partition {
            columns.push(kind.column_name().to_string());
        }
        columns.extend(schema.column_names().map(str::to_string));

        let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            schema.name,
            columns.join(", "),
            placeholders.join(", ")
        );

        let partition_value = file.partition.as_ref().map(|p| p.value().to_string());
        let total = table.records.len() as u64;
        let tx = self.conn.transaction()?;
        let mut count: u64 = 0;

        for batch in table.records.chunks(BATCH_SIZE) {
            let mut rows = Vec::with_capacity(batch.len());
            for (offset, record) in batch.iter().enumerate() {
                let row_num = count + offset as u64 + 1;
                let mut values = vec![SqlValue::Integer(row_num as i64)];
                if let Some(partition) = &partition_value {
                    values.push(SqlValue::Text(partition.clone()));
                }
                values.extend(convert_record(record, &positions).map_err(|message| {
                    DataError::InvalidField {
                        file: table.name.clone(),
                        row: row_num,
                        message,
                    }
                })?);
                rows.push(values);
            }

            insert_batch(&tx, &insert_sql, &rows)
                .with_context(|| format!("Failed to insert rows from {}", table.name))?;
            count += rows.len() as u64;
            ui.set_progress(count, total, table.name.clone());
        }

        tx.commit()?;
        tracing::info!(file = %table.name, table = schema.name, rows = count, "imported");

        Ok(count)
    }

    /// Finalize the database
    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

fn convert_record(
    record: &Record,
    positions: &[(usize, ColumnType)],
) -> Result<Vec<SqlValue>, String> {
    positions
        .iter()
        .map(|(idx, col_type)| SqlValue::from_cell(&record.values()[*idx], *col_type))
        .collect()
}

/// Insert a batch of rows into the database
fn insert_batch(tx: &rusqlite::Transaction, sql: &str, batch: &[Vec<SqlValue>]) -> Result<()> {
    let mut stmt = tx.prepare_cached(sql)?;

    for row in batch {
        for (idx, value) in row.iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        stmt.raw_execute()?;
    }

    Ok(())
}

/// Load every recognised file under `dirs` whose dataset is selected
pub fn load_into_sqlite(
    dirs: &[&Path],
    output_db: &Path,
    datasets: &[&'static TableSchema],
    ui: &mut impl Ui,
) -> Result<u64> {
    let mut files: Vec<DatasetFile> = Vec::new();
    for dir in dirs {
        files.extend(
            scan_dir(dir)?
                .into_iter()
                .filter(|f| datasets.iter().any(|d| d.name == f.schema.name)),
        );
    }

    // Only create tables that have at least one file
    let schemas: Vec<&TableSchema> = datasets
        .iter()
        .copied()
        .filter(|d| files.iter().any(|f| f.schema.name == d.name))
        .collect();

    let mut writer = SqliteWriter::new(output_db)?;
    writer.create_tables(&schemas)?;

    ui.set_phase(Phase::Loading);
    let mut total_records: u64 = 0;

    for file in &files {
        let count = writer
            .import_file(file, ui)
            .with_context(|| format!("Failed to import {}", file.file_name()))?;
        ui.log(format!("{}: {} records", file.file_name(), count));
        total_records += count;
    }

    ui.clear_progress();
    writer.finalize()?;

    Ok(total_records)
}
