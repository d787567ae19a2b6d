//! Typed rows for each table
//!
//! List columns deserialize into `Vec`s, label columns into the ordered
//! enums from [`crate::schema::ranks`]. Empty label cells become `None`.

use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{DataError, DataResult};
use crate::parser::{parse_list, Table};
use crate::schema::{AugmentTier, PowerTier, Rarity, LIST_DELIMITER};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChampionRow {
    pub champion_id: String,
    pub name: String,
    pub cost: u8,
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemRow {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub comp: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemSplitRow {
    pub name: String,
    pub comp_0: String,
    pub comp_1: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraitRow {
    pub name: String,
    #[serde(default)]
    pub match_name: String,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub rank: Option<PowerTier>,
    #[serde(default, deserialize_with = "deserialize_number_list")]
    pub num_for_tier: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraitSplitRow {
    pub name: String,
    #[serde(default)]
    pub match_name: String,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub rank: Option<PowerTier>,
    pub tier_0: Option<u32>,
    pub tier_1: Option<u32>,
    pub tier_2: Option<u32>,
    pub tier_3: Option<u32>,
}

impl TraitSplitRow {
    pub fn breakpoints(&self) -> Vec<u32> {
        [self.tier_0, self.tier_1, self.tier_2, self.tier_3]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PoolOddsRow {
    pub level: u8,
    pub cost_1: u32,
    pub cost_2: u32,
    pub cost_3: u32,
    pub cost_4: u32,
    pub cost_5: u32,
}

impl PoolOddsRow {
    pub fn odds(&self) -> [u32; 5] {
        [self.cost_1, self.cost_2, self.cost_3, self.cost_4, self.cost_5]
    }

    /// Widened so that out-of-range cells cannot wrap back to 100
    pub fn total(&self) -> u64 {
        self.odds().iter().map(|&c| u64::from(c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AugmentRow {
    pub augment_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub tier: Option<AugmentTier>,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub rarity: Option<Rarity>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchUnitRow {
    pub match_id: String,
    pub puuid: String,
    pub placement: u8,
    pub level: Option<u8>,
    pub unit: String,
    pub star: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub items: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub traits: Vec<String>,
}

/// Deserialize every record of a table, naming the row that fails
pub fn parse_rows<T: DeserializeOwned>(table: &Table) -> DataResult<Vec<T>> {
    let header = StringRecord::from(table.header.to_vec());

    table
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            StringRecord::from(record.values().to_vec())
                .deserialize(Some(&header))
                .map_err(|e| DataError::InvalidField {
                    file: table.name.clone(),
                    row: i as u64 + 1,
                    message: field_error_message(&e),
                })
        })
        .collect()
}

fn field_error_message(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

// ================================================================================================
// Custom Serde Functions
// ================================================================================================

fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(parse_list(&s, LIST_DELIMITER)
        .into_iter()
        .map(str::to_string)
        .collect())
}

fn deserialize_number_list<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_list(&s, LIST_DELIMITER)
        .into_iter()
        .map(|part| {
            part.parse::<u32>()
                .map_err(|e| serde::de::Error::custom(format!("'{}': {}", part, e)))
        })
        .collect()
}

fn deserialize_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Ok(None);
    }
    s.parse().map(Some).map_err(serde::de::Error::custom)
}
