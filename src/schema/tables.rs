//! Table schema definitions for every Set 16 statistics file

use super::types::*;

// =============================================================================
// Reference Tables
// =============================================================================

pub static CHAMPIONS: TableSchema = TableSchema {
    name: "champions",
    file: FilePattern::exact("champions_s16.csv"),
    columns: &[
        Column::required("champion_id", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::required("cost", ColumnType::Integer),
        Column::new("role", ColumnType::Text),
        Column::new("traits", ColumnType::List),
    ],
    key_columns: &["champion_id"],
    partition: None,
    split: None,
};

pub static ITEMS: TableSchema = TableSchema {
    name: "items",
    file: FilePattern::exact("items_s16.csv"),
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::new("comp", ColumnType::List),
        Column::new("category", ColumnType::Text),
        Column::new("description", ColumnType::Text),
    ],
    key_columns: &["name"],
    partition: None,
    split: Some(SplitRule {
        column: "comp",
        prefix: "comp",
        arity: 2,
        target: "items_split",
    }),
};

pub static ITEMS_SPLIT: TableSchema = TableSchema {
    name: "items_split",
    file: FilePattern::exact("items_s16_split.csv"),
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::new("comp_0", ColumnType::Text),
        Column::new("comp_1", ColumnType::Text),
        Column::new("category", ColumnType::Text),
        Column::new("description", ColumnType::Text),
    ],
    key_columns: &["name"],
    partition: None,
    split: None,
};

pub static TRAITS: TableSchema = TableSchema {
    name: "traits",
    file: FilePattern::exact("traits_s16.csv"),
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::new("match_name", ColumnType::Text),
        Column::new("rank", ColumnType::Text),
        Column::new("num_for_tier", ColumnType::List),
    ],
    key_columns: &["name"],
    partition: None,
    split: Some(SplitRule {
        column: "num_for_tier",
        prefix: "tier",
        arity: 4,
        target: "traits_split",
    }),
};

pub static TRAITS_SPLIT: TableSchema = TableSchema {
    name: "traits_split",
    file: FilePattern::exact("traits_s16_split.csv"),
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::new("match_name", ColumnType::Text),
        Column::new("rank", ColumnType::Text),
        Column::new("tier_0", ColumnType::Integer),
        Column::new("tier_1", ColumnType::Integer),
        Column::new("tier_2", ColumnType::Integer),
        Column::new("tier_3", ColumnType::Integer),
    ],
    key_columns: &["name"],
    partition: None,
    split: None,
};

pub static POOL_ODDS: TableSchema = TableSchema {
    name: "pool_odds",
    file: FilePattern::exact("pool_odd_s16.csv"),
    columns: &[
        Column::required("level", ColumnType::Integer),
        Column::required("cost_1", ColumnType::Integer),
        Column::required("cost_2", ColumnType::Integer),
        Column::required("cost_3", ColumnType::Integer),
        Column::required("cost_4", ColumnType::Integer),
        Column::required("cost_5", ColumnType::Integer),
    ],
    key_columns: &["level"],
    partition: None,
    split: None,
};

// =============================================================================
// Partitioned Tables (key carried by file name)
// =============================================================================

pub static AUGMENTS: TableSchema = TableSchema {
    name: "augments",
    file: FilePattern::keyed("augments_", "_s16.csv"),
    columns: &[
        Column::required("augment_id", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::new("tier", ColumnType::Text),
        Column::new("rarity", ColumnType::Text),
        Column::new("types", ColumnType::List),
    ],
    key_columns: &["augment_id"],
    partition: Some(PartitionKind::Stage),
    split: None,
};

pub static MATCHES: TableSchema = TableSchema {
    name: "matches",
    file: FilePattern::keyed("matches_", ".csv"),
    columns: &[
        Column::required("match_id", ColumnType::Text),
        Column::required("puuid", ColumnType::Text),
        Column::required("placement", ColumnType::Integer),
        Column::new("level", ColumnType::Integer),
        Column::required("unit", ColumnType::Text),
        Column::new("star", ColumnType::Integer),
        Column::new("items", ColumnType::List),
        Column::new("traits", ColumnType::List),
    ],
    key_columns: &["match_id", "puuid", "unit"],
    partition: Some(PartitionKind::Region),
    split: None,
};

// =============================================================================
// Registry
// =============================================================================

/// All known tables; split tables follow their base table
pub static ALL_TABLES: &[&TableSchema] = &[
    &CHAMPIONS,
    &ITEMS,
    &ITEMS_SPLIT,
    &TRAITS,
    &TRAITS_SPLIT,
    &POOL_ODDS,
    &AUGMENTS,
    &MATCHES,
];

/// Get a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

/// Tables that carry a split rule
pub fn splittable_tables() -> impl Iterator<Item = &'static TableSchema> {
    ALL_TABLES.iter().copied().filter(|t| t.split.is_some())
}
