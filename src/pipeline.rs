//! File-level commands: split, process, normalize, explode, canonical

use std::fs;
use std::path::{Path, PathBuf};

use crate::canonical::build_tables;
use crate::config::Settings;
use crate::error::{DataError, DataResult};
use crate::parser::{read_table, Table};
use crate::schema::{display_name, get_table, scan_dir, PartitionKey, TableSchema, MATCHES};
use crate::split::{split_records, SplitPlan, SplitSpec};
use crate::transform::{explode_column, normalize_column};
use crate::ui::{Phase, Ui};
use crate::validate::validate_headers;
use crate::writer::{ensure_writable, write_table};

#[derive(Debug, Clone)]
pub struct SplitSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: u64,
    pub header: Vec<String>,
}

/// Split one column of a CSV file into fixed positional columns
pub fn split_file(
    input: &Path,
    output: &Path,
    spec: &SplitSpec,
    force: bool,
    ui: &mut impl Ui,
) -> DataResult<SplitSummary> {
    ensure_writable(output, force)?;

    ui.set_phase(Phase::Reading);
    let table = read_table(input)?;

    ui.set_phase(Phase::Splitting);
    let plan = SplitPlan::new(&table.header, spec.clone()).map_err(|source| DataError::Row {
        file: table.name.clone(),
        row: 0,
        source,
    })?;
    let records = split_records(&plan, &table.records, &table.name)?;

    let split = Table {
        name: display_name(output),
        header: plan.output_header().clone(),
        records,
    };
    let rows = write_table(output, &split, force)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        column = %spec.column,
        arity = spec.arity,
        rows,
        "split column"
    );
    ui.log(format!("{} -> {}: {} rows", table.name, split.name, rows));

    Ok(SplitSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        rows,
        header: split.header.to_vec(),
    })
}

/// Write the split variant of every selected base table
///
/// Reads `raw/<table>` and writes `processed/<split table>`. Base tables
/// without a split rule are ignored; missing inputs are skipped.
pub fn process_dataset(
    settings: &Settings,
    tables: &[&'static TableSchema],
    ui: &mut impl Ui,
) -> DataResult<Vec<SplitSummary>> {
    let mut summaries = Vec::new();

    for schema in tables {
        let Some(rule) = &schema.split else {
            continue;
        };
        let target = get_table(rule.target).ok_or_else(|| {
            DataError::Validation(format!("unknown split target: {}", rule.target))
        })?;

        let input = settings.raw_dir().join(schema.file.prefix);
        let output = settings.processed_dir().join(target.file.prefix);

        if !input.exists() {
            tracing::warn!(file = %input.display(), "input not found, skipping");
            ui.log(format!("{}: skipped (file not found)", schema.name));
            continue;
        }

        let spec = SplitSpec::from_rule(rule)
            .with_delimiter(settings.delimiter.clone())
            .with_overflow(settings.overflow);

        summaries.push(split_file(&input, &output, &spec, settings.force, ui)?);
    }

    Ok(summaries)
}

/// Rewrite a list column canonically; returns rows written
pub fn normalize_file(
    input: &Path,
    output: &Path,
    column: &str,
    delimiter: &str,
    force: bool,
    ui: &mut impl Ui,
) -> DataResult<u64> {
    ensure_writable(output, force)?;
    ui.set_phase(Phase::Reading);
    let table = read_table(input)?;

    ui.set_phase(Phase::Transforming);
    let normalized = normalize_column(&table, column, delimiter)?;
    let rows = write_table(output, &normalized, force)?;

    ui.log(format!("{}: normalized '{}' in {} rows", table.name, column, rows));
    Ok(rows)
}

/// Write one row per list element; returns rows written
pub fn explode_file(
    input: &Path,
    output: &Path,
    column: &str,
    delimiter: &str,
    value_name: Option<&str>,
    force: bool,
    ui: &mut impl Ui,
) -> DataResult<u64> {
    ensure_writable(output, force)?;
    ui.set_phase(Phase::Reading);
    let table = read_table(input)?;

    ui.set_phase(Phase::Transforming);
    let exploded = explode_column(&table, column, delimiter, value_name)?;
    let rows = write_table(output, &exploded, force)?;

    ui.log(format!(
        "{}: {} rows exploded into {}",
        table.name,
        table.records.len(),
        rows
    ));
    Ok(rows)
}

#[derive(Debug, Clone)]
pub struct CanonicalSummary {
    pub output_dir: PathBuf,
    /// Written files and their row counts
    pub files: Vec<(PathBuf, u64)>,
}

/// Create `processed/<label>`; the directory must not exist yet
pub fn resolve_canonical_dir(processed_dir: &Path, label: &str) -> DataResult<PathBuf> {
    let valid = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(DataError::Validation(format!("invalid output label: '{}'", label)));
    }

    let dir = processed_dir.join(label);
    if dir.exists() {
        return Err(DataError::DirectoryExists(dir.display().to_string()));
    }
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Build participants, units and traits tables from every `raw/matches_<REGION>.csv`
///
/// All inputs are read and transformed before the output directory is created,
/// so a bad input leaves nothing behind.
pub fn build_canonical_tables(
    settings: &Settings,
    label: &str,
    win_threshold: u8,
    ui: &mut impl Ui,
) -> DataResult<CanonicalSummary> {
    ui.set_phase(Phase::Reading);
    let raw_dir = settings.raw_dir();
    let inputs: Vec<_> = scan_dir(&raw_dir)?
        .into_iter()
        .filter(|file| file.schema.name == MATCHES.name)
        .collect();
    if inputs.is_empty() {
        return Err(DataError::Validation(format!(
            "no matches_<REGION>.csv files in {}",
            raw_dir.display()
        )));
    }

    let mut built = Vec::with_capacity(inputs.len());
    for (i, file) in inputs.iter().enumerate() {
        let Some(PartitionKey::Region(region)) = &file.partition else {
            continue;
        };
        ui.set_phase(Phase::Reading);
        ui.set_progress(i as u64, inputs.len() as u64, file.file_name());
        let table = read_table(&file.path)?;
        validate_headers(&table.header, &MATCHES, &table.name)?;

        ui.set_phase(Phase::Transforming);
        built.push(build_tables(&table, region, win_threshold, &settings.delimiter)?);
    }
    ui.clear_progress();

    let output_dir = resolve_canonical_dir(&settings.processed_dir(), label)?;
    let mut files = Vec::new();
    for tables in &built {
        for table in tables.tables() {
            let path = output_dir.join(&table.name);
            let rows = write_table(&path, table, false)?;
            ui.log(format!("{}: {} rows", table.name, rows));
            files.push((path, rows));
        }
    }

    tracing::info!(
        output = %output_dir.display(),
        inputs = built.len(),
        files = files.len(),
        "wrote canonical tables"
    );

    Ok(CanonicalSummary { output_dir, files })
}
