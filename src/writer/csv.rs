use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{DataError, DataResult};
use crate::parser::{Record, Table};
use crate::schema::display_name;

/// Refuse to replace an existing file unless `force` is set
pub fn ensure_writable(path: &Path, force: bool) -> DataResult<()> {
    if path.exists() && !force {
        return Err(DataError::OutputExists(path.display().to_string()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write header and records as CSV to any writer
pub fn write_records<W: Write>(
    writer: W,
    name: &str,
    header: &[String],
    records: &[Record],
) -> DataResult<u64> {
    let mut wtr = csv::Writer::from_writer(writer);
    let csv_err = |e| DataError::csv(name, e);

    wtr.write_record(header).map_err(csv_err)?;
    for record in records {
        wtr.write_record(record.values()).map_err(csv_err)?;
    }

    wtr.flush()?;
    Ok(records.len() as u64)
}

/// Write a table to `path`
pub fn write_table(path: &Path, table: &Table, force: bool) -> DataResult<u64> {
    ensure_writable(path, force)?;
    let file = File::create(path)?;
    let count = write_records(file, &display_name(path), &table.header, &table.records)?;
    tracing::debug!(file = %path.display(), rows = count, "wrote table");
    Ok(count)
}
