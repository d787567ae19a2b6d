/*!
# Table Validation

Checks the documented invariants of each table:

- every schema column is present in the header (extra columns are allowed)
- every row parses into its typed form (numbers, tier and rarity labels)
- reference tables have unique keys; match files may repeat
  `(match_id, puuid, unit)` because a player can field duplicates
- pool odds for each level sum to 100
- each match has the expected number of distinct players
*/

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::error::{DataError, DataResult};
use crate::model::*;
use crate::parser::{read_table, Table};
use crate::schema::{scan_dir, DatasetFile, TableSchema};
use crate::ui::{Phase, Ui};

/// Players per match in a standard lobby
pub const DEFAULT_EXPECTED_PARTICIPANTS: usize = 8;

/// Pool odds for a level must add up to this
pub const POOL_ODDS_TOTAL: u64 = 100;

/// Placements outside this range are reported as warnings
pub const PLACEMENT_RANGE: std::ops::RangeInclusive<u8> = 1..=8;

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub expected_participants: usize,
    /// Treat participant count mismatches as errors
    pub strict: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            expected_participants: DEFAULT_EXPECTED_PARTICIPANTS,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub file: String,
    pub dataset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    pub rows: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.files.iter().all(FileReport::is_ok)
    }

    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warnings.len()).sum()
    }
}

// ================================================================================================
// Header Validation
// ================================================================================================

/// Every schema column must appear in the header, in any order
pub fn validate_headers(header: &[String], schema: &TableSchema, file: &str) -> DataResult<()> {
    for column in schema.column_names() {
        if !header.iter().any(|h| h == column) {
            return Err(DataError::MissingHeader {
                file: file.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

// ================================================================================================
// Content Checks
// ================================================================================================

/// Each level's five cost percentages must sum to 100; levels must be unique
pub fn validate_pool_odds(rows: &[PoolOddsRow]) -> DataResult<()> {
    let problems = pool_odds_problems(rows);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(DataError::Validation(problems.join("; ")))
    }
}

fn pool_odds_problems(rows: &[PoolOddsRow]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = BTreeSet::new();

    for row in rows {
        if !seen.insert(row.level) {
            problems.push(format!("level {} appears more than once", row.level));
        }
        let total = row.total();
        if total != POOL_ODDS_TOTAL {
            problems.push(format!(
                "level {}: odds {:?} sum to {}, expected {}",
                row.level,
                row.odds(),
                total,
                POOL_ODDS_TOTAL
            ));
        }
    }

    problems
}

/// Count distinct players per match
///
/// Returns the matches whose count differs from `expected`, or an error
/// listing them when `strict` is set.
pub fn validate_participant_counts(
    rows: &[MatchUnitRow],
    expected: usize,
    strict: bool,
) -> DataResult<BTreeMap<String, usize>> {
    let mut players: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for row in rows {
        players.entry(&row.match_id).or_default().insert(&row.puuid);
    }

    let mismatched: BTreeMap<String, usize> = players
        .into_iter()
        .filter(|(_, p)| p.len() != expected)
        .map(|(m, p)| (m.to_string(), p.len()))
        .collect();

    if strict && !mismatched.is_empty() {
        return Err(DataError::Validation(format!(
            "participant count mismatch for matches: {:?} (expected {})",
            mismatched, expected
        )));
    }

    Ok(mismatched)
}

/// Key columns of reference tables must be unique
fn duplicate_keys(table: &Table, schema: &TableSchema) -> Vec<String> {
    let mut seen: HashMap<Vec<&str>, usize> = HashMap::new();
    let mut problems = Vec::new();

    for (i, record) in table.records.iter().enumerate() {
        let key: Vec<&str> = schema
            .key_columns
            .iter()
            .map(|c| record.get(c).unwrap_or(""))
            .collect();
        match seen.get(&key).copied() {
            Some(first) => problems.push(format!(
                "row {}: duplicate key {:?} (first seen at row {})",
                i + 1,
                key,
                first
            )),
            None => {
                seen.insert(key, i + 1);
            }
        }
    }

    problems
}

// ================================================================================================
// File Validation
// ================================================================================================

/// Validate one recognised data file
pub fn validate_file(file: &DatasetFile, opts: &ValidateOptions) -> DataResult<FileReport> {
    let schema = file.schema;
    let mut report = FileReport {
        file: file.file_name(),
        dataset: schema.name.to_string(),
        partition: file.partition.as_ref().map(|p| p.value().to_string()),
        ..Default::default()
    };

    let table = match read_table(&file.path) {
        Ok(table) => table,
        Err(DataError::Io(e)) => return Err(DataError::Io(e)),
        Err(e) => {
            report.errors.push(e.to_string());
            return Ok(report);
        }
    };
    report.rows = table.records.len();

    if let Err(e) = validate_headers(&table.header, schema, &table.name) {
        report.errors.push(e.to_string());
        return Ok(report);
    }

    if schema.partition.is_none() {
        report.errors.extend(duplicate_keys(&table, schema));
    }

    let checked = match schema.name {
        "champions" => parse_rows::<ChampionRow>(&table).map(|_| ()),
        "items" => parse_rows::<ItemRow>(&table).map(|rows| {
            for row in rows.iter().filter(|r| r.comp.len() > 2) {
                report.warnings.push(format!(
                    "{}: {} components, only 2 are kept when split",
                    row.name,
                    row.comp.len()
                ));
            }
        }),
        "items_split" => parse_rows::<ItemSplitRow>(&table).map(|_| ()),
        "traits" => parse_rows::<TraitRow>(&table).map(|rows| {
            for row in rows.iter().filter(|r| r.num_for_tier.len() > 4) {
                report.warnings.push(format!(
                    "{}: {} breakpoints, only 4 are kept when split",
                    row.name,
                    row.num_for_tier.len()
                ));
            }
        }),
        "traits_split" => parse_rows::<TraitSplitRow>(&table).map(|_| ()),
        "pool_odds" => parse_rows::<PoolOddsRow>(&table).map(|rows| {
            report.errors.extend(pool_odds_problems(&rows));
        }),
        "augments" => parse_rows::<AugmentRow>(&table).map(|_| ()),
        "matches" => parse_rows::<MatchUnitRow>(&table).and_then(|rows| {
            for row in rows.iter().filter(|r| !PLACEMENT_RANGE.contains(&r.placement)) {
                report.warnings.push(format!(
                    "match {} player {}: placement {} outside {:?}",
                    row.match_id, row.puuid, row.placement, PLACEMENT_RANGE
                ));
            }
            match validate_participant_counts(&rows, opts.expected_participants, opts.strict) {
                Ok(mismatched) => {
                    for (match_id, count) in mismatched {
                        report.warnings.push(format!(
                            "match {}: {} players, expected {}",
                            match_id, count, opts.expected_participants
                        ));
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }),
        other => {
            tracing::debug!(dataset = other, "no content checks for dataset");
            Ok(())
        }
    };

    if let Err(e) = checked {
        report.errors.push(e.to_string());
    }

    Ok(report)
}

/// Validate every recognised file under the given directories
pub fn validate_dirs(
    dirs: &[&Path],
    datasets: &[&'static TableSchema],
    opts: &ValidateOptions,
    ui: &mut impl Ui,
) -> DataResult<ValidationReport> {
    let mut files = Vec::new();
    for dir in dirs {
        files.extend(
            scan_dir(dir)?
                .into_iter()
                .filter(|f| datasets.iter().any(|d| d.name == f.schema.name)),
        );
    }

    ui.set_phase(Phase::Validating);
    let mut report = ValidationReport::default();
    let total = files.len() as u64;

    for (i, file) in files.iter().enumerate() {
        ui.set_progress(i as u64, total, file.file_name());
        let file_report = validate_file(file, opts)?;

        if file_report.is_ok() {
            tracing::info!(file = %file_report.file, rows = file_report.rows, "valid");
        } else {
            tracing::warn!(
                file = %file_report.file,
                errors = file_report.errors.len(),
                "validation failed"
            );
        }
        ui.log(format!(
            "{}: {} rows, {} errors, {} warnings",
            file_report.file,
            file_report.rows,
            file_report.errors.len(),
            file_report.warnings.len()
        ));

        report.files.push(file_report);
    }

    ui.clear_progress();
    Ok(report)
}
