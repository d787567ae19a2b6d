//! Analysis tables derived from match exports
//!
//! Each `matches_<REGION>.csv` yields three tables:
//! - `participants_<REGION>.csv`: one row per player, with `is_win`
//! - `units_<REGION>.csv`: one row per unit, items in `item_0..item_2`
//! - `traits_<REGION>.csv`: one row per active trait of a player

use crate::error::{DataError, DataResult};
use crate::parser::Table;
use crate::split::{split_records, SplitPlan, SplitSpec};
use crate::transform::{add_win_flag, distinct_by, explode_column, normalize_column, select_columns};

/// Placements up to and including this one count as a win
pub const DEFAULT_WIN_THRESHOLD: u8 = 4;

/// Subdirectory of `processed/` written by default
pub const DEFAULT_LABEL: &str = "canonical";

/// A unit holds at most three items
pub const ITEM_SLOTS: usize = 3;

const PARTICIPANT_COLUMNS: &[(&str, &str)] = &[
    ("match_id", "match_id"),
    ("puuid", "puuid"),
    ("placement", "placement"),
    ("level", "level"),
];

const UNIT_COLUMNS: &[(&str, &str)] = &[
    ("match_id", "match_id"),
    ("puuid", "puuid"),
    ("unit", "unit_name"),
    ("star", "unit_tier"),
    ("items", "items"),
];

const TRAIT_COLUMNS: &[(&str, &str)] = &[
    ("match_id", "match_id"),
    ("puuid", "puuid"),
    ("traits", "trait"),
];

#[derive(Debug, Clone)]
pub struct CanonicalTables {
    pub participants: Table,
    pub units: Table,
    pub traits: Table,
}

impl CanonicalTables {
    pub fn tables(&self) -> [&Table; 3] {
        [&self.participants, &self.units, &self.traits]
    }
}

/// Build the three tables for one region's match rows
pub fn build_tables(
    matches: &Table,
    region: &str,
    win_threshold: u8,
    delimiter: &str,
) -> DataResult<CanonicalTables> {
    let participants = select_columns(matches, PARTICIPANT_COLUMNS)?;
    let participants = distinct_by(&participants, &["match_id", "puuid"])?;
    let mut participants = add_win_flag(&participants, win_threshold)?;
    participants.name = format!("participants_{}.csv", region);

    let units = select_columns(matches, UNIT_COLUMNS)?;
    let units = normalize_column(&units, "items", delimiter)?;
    let spec = SplitSpec::new("items", "item", ITEM_SLOTS).with_delimiter(delimiter);
    let plan = SplitPlan::new(&units.header, spec).map_err(|source| DataError::Row {
        file: units.name.clone(),
        row: 0,
        source,
    })?;
    let units = Table {
        name: format!("units_{}.csv", region),
        header: plan.output_header().clone(),
        records: split_records(&plan, &units.records, &units.name)?,
    };

    let traits = select_columns(matches, TRAIT_COLUMNS)?;
    let traits = explode_column(&traits, "trait", delimiter, None)?;
    let mut traits = distinct_by(&traits, &["match_id", "puuid", "trait"])?;
    traits.name = format!("traits_{}.csv", region);

    tracing::info!(
        file = %matches.name,
        participants = participants.records.len(),
        units = units.records.len(),
        traits = traits.records.len(),
        "built canonical tables"
    );

    Ok(CanonicalTables {
        participants,
        units,
        traits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::read_table_from;

    fn matches_table() -> Table {
        let data = "match_id,puuid,placement,level,unit,star,items,traits\n\
                    NA1_1,p1,1,9,Jinx,3,Infinity Edge;;Last Whisper,Gunner;Rebel\n\
                    NA1_1,p1,1,9,Leona,2,,Bastion;Rebel\n\
                    NA1_1,p2,6,7,Jinx,1,Spear;Tear;Rod;Bow,\n";
        read_table_from("matches_NA1.csv", data.as_bytes()).unwrap()
    }

    #[test]
    fn test_participants_one_row_per_player() {
        let tables = build_tables(&matches_table(), "NA1", DEFAULT_WIN_THRESHOLD, ";").unwrap();
        let participants = &tables.participants;

        assert_eq!(participants.name, "participants_NA1.csv");
        assert_eq!(
            participants.header.to_vec(),
            vec!["match_id", "puuid", "placement", "level", "is_win"]
        );
        assert_eq!(participants.records.len(), 2);
        assert_eq!(participants.records[0].get("is_win"), Some("true"));
        assert_eq!(participants.records[1].get("is_win"), Some("false"));
    }

    #[test]
    fn test_units_have_three_item_slots() {
        let tables = build_tables(&matches_table(), "NA1", DEFAULT_WIN_THRESHOLD, ";").unwrap();
        let units = &tables.units;

        assert_eq!(
            units.header.to_vec(),
            vec!["match_id", "puuid", "unit_name", "unit_tier", "item_0", "item_1", "item_2"]
        );
        assert_eq!(units.records.len(), 3);
        assert_eq!(units.records[0].get("item_1"), Some("Last Whisper"));
        assert_eq!(units.records[0].get("item_2"), Some(""));
        assert_eq!(units.records[1].get("item_0"), Some(""));
        // a fourth item is dropped
        assert_eq!(units.records[2].get("item_2"), Some("Rod"));
    }

    #[test]
    fn test_traits_are_distinct_per_player() {
        let tables = build_tables(&matches_table(), "NA1", DEFAULT_WIN_THRESHOLD, ";").unwrap();
        let traits: Vec<_> = tables
            .traits
            .records
            .iter()
            .map(|r| (r.get("puuid").unwrap_or(""), r.get("trait").unwrap_or("")))
            .collect();

        assert_eq!(traits, vec![("p1", "Gunner"), ("p1", "Rebel"), ("p1", "Bastion")]);
    }

    #[test]
    fn test_missing_match_column_is_malformed() {
        let data = "match_id,puuid,placement,unit,star,items,traits\nNA1_1,p1,1,Jinx,3,,\n";
        let table = read_table_from("matches_NA1.csv", data.as_bytes()).unwrap();
        let err = build_tables(&table, "NA1", DEFAULT_WIN_THRESHOLD, ";").unwrap_err();
        assert!(err.is_malformed_record(), "{}", err);
    }
}
