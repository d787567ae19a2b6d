use crate::error::{DataError, DataResult};
use crate::schema::{get_table, TableSchema, ALL_TABLES};

/// Resolves which datasets to process based on include/exclude filters
///
/// Including a split dataset (e.g. `items_split`) pulls in its base table,
/// since the split file is produced from it.
pub fn resolve_datasets(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> DataResult<Vec<&'static TableSchema>> {
    match (include, exclude) {
        (Some(_), Some(_)) => Err(DataError::Validation(
            "Cannot use both --include and --exclude at the same time".to_string(),
        )),
        (Some(include_list), None) => {
            let mut selected: Vec<&'static TableSchema> = Vec::new();
            for name in &include_list {
                let table = lookup(name)?;
                for base in ALL_TABLES
                    .iter()
                    .copied()
                    .filter(|t| t.split.as_ref().map(|r| r.target) == Some(table.name))
                {
                    push_unique(&mut selected, base);
                }
                push_unique(&mut selected, table);
            }

            tracing::debug!(datasets = ?names(&selected), "including datasets");
            Ok(ordered(&selected))
        }
        (None, Some(exclude_list)) => {
            let excluded = exclude_list
                .iter()
                .map(|name| lookup(name))
                .collect::<DataResult<Vec<_>>>()?;

            let tables: Vec<_> = ALL_TABLES
                .iter()
                .copied()
                .filter(|t| !excluded.iter().any(|e| e.name == t.name))
                .collect();

            tracing::debug!(datasets = ?names(&tables), "datasets after exclusions");
            Ok(tables)
        }
        (None, None) => Ok(ALL_TABLES.to_vec()),
    }
}

fn lookup(name: &str) -> DataResult<&'static TableSchema> {
    get_table(name.trim())
        .ok_or_else(|| DataError::Validation(format!("Unknown dataset: {}", name)))
}

fn push_unique(selected: &mut Vec<&'static TableSchema>, table: &'static TableSchema) {
    if !selected.iter().any(|t| t.name == table.name) {
        selected.push(table);
    }
}

/// Registry order, so base tables always precede their split tables
fn ordered(selected: &[&'static TableSchema]) -> Vec<&'static TableSchema> {
    ALL_TABLES
        .iter()
        .copied()
        .filter(|t| selected.iter().any(|s| s.name == t.name))
        .collect()
}

fn names(tables: &[&TableSchema]) -> Vec<&'static str> {
    tables.iter().map(|t| t.name).collect()
}
