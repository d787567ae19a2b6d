//! Field splitter: expand one delimited column into N positional columns
//!
//! `comp = "Chain Vest;Chain Vest"` with prefix `comp` and arity 2 becomes
//! `comp_0 = "Chain Vest", comp_1 = "Chain Vest"`. The new columns take the
//! source column's position; everything else is copied untouched.

use rayon::prelude::*;

use crate::error::{DataError, DataResult, SplitError};
use crate::parser::{column_index, parse_list, Header, Record};
use crate::schema::{SplitRule, LIST_DELIMITER};

/// Rows below this count are split on the calling thread
const PARALLEL_THRESHOLD: usize = 1024;

/// What to do when a value has more parts than target columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Keep the first N parts and log a warning
    #[default]
    Truncate,
    /// Fail the record
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSpec {
    pub column: String,
    pub delimiter: String,
    pub prefix: String,
    pub arity: usize,
    pub overflow: Overflow,
}

impl SplitSpec {
    pub fn new(column: impl Into<String>, prefix: impl Into<String>, arity: usize) -> Self {
        Self {
            column: column.into(),
            delimiter: LIST_DELIMITER.to_string(),
            prefix: prefix.into(),
            arity,
            overflow: Overflow::default(),
        }
    }

    pub fn from_rule(rule: &SplitRule) -> Self {
        Self::new(rule.column, rule.prefix, rule.arity)
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// `<prefix>_0 .. <prefix>_(arity-1)`
    pub fn target_columns(&self) -> Vec<String> {
        (0..self.arity)
            .map(|i| format!("{}_{}", self.prefix, i))
            .collect()
    }
}

/// A split resolved against one header, reusable for every row under it
#[derive(Debug, Clone)]
pub struct SplitPlan {
    spec: SplitSpec,
    input: Header,
    source: usize,
    output: Header,
}

impl SplitPlan {
    pub fn new(header: &Header, spec: SplitSpec) -> Result<Self, SplitError> {
        let source = column_index(header, &spec.column).ok_or_else(|| {
            SplitError::MalformedRecord {
                column: spec.column.clone(),
            }
        })?;

        let targets = spec.target_columns();
        for target in &targets {
            let clashes = header
                .iter()
                .enumerate()
                .any(|(i, c)| i != source && c == target);
            if clashes {
                return Err(SplitError::DuplicateColumn {
                    column: target.clone(),
                });
            }
        }

        let mut output = Vec::with_capacity(header.len() - 1 + spec.arity);
        output.extend(header[..source].iter().cloned());
        output.extend(targets);
        output.extend(header[source + 1..].iter().cloned());

        Ok(Self {
            spec,
            input: header.clone(),
            source,
            output: output.into(),
        })
    }

    pub fn spec(&self) -> &SplitSpec {
        &self.spec
    }

    pub fn output_header(&self) -> &Header {
        &self.output
    }

    /// Split one row's values, laid out like the plan's input header
    pub fn split_values(&self, values: &[String]) -> Result<Vec<String>, SplitError> {
        let raw = values
            .get(self.source)
            .ok_or_else(|| SplitError::MalformedRecord {
                column: self.spec.column.clone(),
            })?;

        let parts = parse_list(raw, &self.spec.delimiter);
        if parts.len() > self.spec.arity {
            match self.spec.overflow {
                Overflow::Reject => {
                    return Err(SplitError::Overflow {
                        column: self.spec.column.clone(),
                        found: parts.len(),
                        arity: self.spec.arity,
                    });
                }
                Overflow::Truncate => {
                    tracing::warn!(
                        column = %self.spec.column,
                        found = parts.len(),
                        arity = self.spec.arity,
                        value = %raw,
                        "dropping list values beyond split arity"
                    );
                }
            }
        }

        let mut out = Vec::with_capacity(self.output.len());
        out.extend(values[..self.source].iter().cloned());
        out.extend(
            (0..self.spec.arity).map(|i| parts.get(i).map(|p| p.to_string()).unwrap_or_default()),
        );
        out.extend(values[self.source + 1..].iter().cloned());
        Ok(out)
    }

    /// Split a record; records with a different header are re-planned
    pub fn apply(&self, record: &Record) -> Result<Record, SplitError> {
        if record.header() != &self.input {
            return split_record(record, &self.spec);
        }
        let values = self.split_values(record.values())?;
        Ok(Record::new(self.output.clone(), values))
    }
}

/// Split a single record
pub fn split_record(record: &Record, spec: &SplitSpec) -> Result<Record, SplitError> {
    let plan = SplitPlan::new(record.header(), spec.clone())?;
    let values = plan.split_values(record.values())?;
    Ok(Record::new(plan.output, values))
}

/// Split every record of a table, preserving input order
///
/// Errors name `file` and the 1-based data row that failed.
pub fn split_records(plan: &SplitPlan, records: &[Record], file: &str) -> DataResult<Vec<Record>> {
    let split_one = |(index, record): (usize, &Record)| {
        plan.apply(record).map_err(|source| DataError::Row {
            file: file.to_string(),
            row: index as u64 + 1,
            source,
        })
    };

    if records.len() >= PARALLEL_THRESHOLD {
        records.par_iter().enumerate().map(split_one).collect()
    } else {
        records.iter().enumerate().map(split_one).collect()
    }
}
