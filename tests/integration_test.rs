//! End-to-end tests over a small Set 16 data directory.
//!
//! These tests:
//! 1. Write raw CSV fixtures into a temporary `data/raw`
//! 2. Run the split, validation and SQLite load pipelines
//! 3. Compare the outputs against the inputs

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

use tft_s16_tables::canonical::DEFAULT_WIN_THRESHOLD;
use tft_s16_tables::config::Settings;
use tft_s16_tables::filter::resolve_datasets;
use tft_s16_tables::parser::{join_list, parse_list, read_table, Record};
use tft_s16_tables::pipeline::{build_canonical_tables, explode_file, process_dataset, split_file};
use tft_s16_tables::schema::ALL_TABLES;
use tft_s16_tables::ui::{Phase, RecordingUi, SilentUi};
use tft_s16_tables::validate::{validate_dirs, ValidateOptions};
use tft_s16_tables::writer::load_into_sqlite;
use tft_s16_tables::{split_record, DataError, Overflow, SplitSpec};

// =============================================================================
// Fixtures
// =============================================================================

/// Random seed for reproducible generated rows
const RANDOM_SEED: u64 = 42;

const CHAMPIONS: &str = "\
champion_id,name,cost,role,traits
TFT16_Jinx,Jinx,4,Marksman,Gunner;Rebel
TFT16_Leona,Leona,1,Tank,Bastion
";

const ITEMS: &str = "\
name,comp,category,description
Guardian Angel,Chain Vest;Chain Vest,completed,\"Prevents death once, then heals\"
Bloodthirster,Bandit's Blade,completed,Omnivamp
B.F. Sword,,component,Attack damage
";

const TRAITS: &str = "\
name,match_name,rank,num_for_tier
Bruiser,bruiser,A,2;4;6
Annihilator,annihilator,S,1
Bastion,bastion,B,2;4;6;8
Loner,loner,D,
";

const POOL_ODDS: &str = "\
level,cost_1,cost_2,cost_3,cost_4,cost_5
3,75,25,0,0,0
9,15,20,25,30,10
";

const AUGMENTS: &str = "\
augment_id,name,tier,rarity,types
a1,Cybernetic Uplink,A,Gold,econ
a2,Pandora's Items,B,Silver,items;reroll
";

struct DataDir {
    _dir: TempDir,
    settings: Settings,
}

impl DataDir {
    fn new() -> Self {
        let dir = tempdir().expect("Failed to create temp dir");
        let settings = Settings::new(dir.path().join("data"));
        fs::create_dir_all(settings.raw_dir()).unwrap();

        let data = Self {
            _dir: dir,
            settings,
        };
        data.write_raw("champions_s16.csv", CHAMPIONS);
        data.write_raw("items_s16.csv", ITEMS);
        data.write_raw("traits_s16.csv", TRAITS);
        data.write_raw("pool_odd_s16.csv", POOL_ODDS);
        data.write_raw("augments_2-1_s16.csv", AUGMENTS);
        data.write_raw("augments_4-2_s16.csv", AUGMENTS);
        data.write_raw("matches_EUW1.csv", &match_rows("EUW1", 2, 8));
        data
    }

    fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.settings.raw_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn raw(&self, name: &str) -> PathBuf {
        self.settings.raw_dir().join(name)
    }

    fn processed(&self, name: &str) -> PathBuf {
        self.settings.processed_dir().join(name)
    }

    fn dirs(&self) -> [PathBuf; 2] {
        self.settings.data_dirs()
    }
}

/// Match rows: every player fields two units, the first player a duplicate
fn match_rows(region: &str, matches: usize, players: usize) -> String {
    let mut out = String::from("match_id,puuid,placement,level,unit,star,items,traits\n");
    for m in 0..matches {
        for p in 0..players {
            let match_id = format!("{}_{}", region, m);
            out.push_str(&format!(
                "{},p{},{},8,Jinx,2,Infinity Edge;Last Whisper,Gunner;Rebel\n",
                match_id,
                p,
                p + 1
            ));
            let second = if p == 0 { "Jinx" } else { "Leona" };
            out.push_str(&format!("{},p{},{},8,{},1,,Bastion\n", match_id, p, p + 1, second));
        }
    }
    out
}

fn header_of(path: &Path) -> Vec<String> {
    read_table(path).unwrap().header.to_vec()
}

// =============================================================================
// Split Pipeline
// =============================================================================

#[test]
fn test_process_writes_split_tables() {
    let data = DataDir::new();
    let tables = resolve_datasets(None, None).unwrap();
    let mut ui = SilentUi::new();

    let summaries = process_dataset(&data.settings, &tables, &mut ui).unwrap();
    assert_eq!(summaries.len(), 2);

    let items = read_table(&data.processed("items_s16_split.csv")).unwrap();
    assert_eq!(
        header_of(&data.processed("items_s16_split.csv")),
        vec!["name", "comp_0", "comp_1", "category", "description"]
    );
    assert_eq!(items.records[0].get("comp_0"), Some("Chain Vest"));
    assert_eq!(items.records[0].get("comp_1"), Some("Chain Vest"));
    assert_eq!(items.records[1].get("comp_0"), Some("Bandit's Blade"));
    assert_eq!(items.records[1].get("comp_1"), Some(""));
    assert_eq!(items.records[2].get("comp_0"), Some(""));
    assert_eq!(
        items.records[0].get("description"),
        Some("Prevents death once, then heals")
    );

    let traits = read_table(&data.processed("traits_s16_split.csv")).unwrap();
    assert_eq!(
        traits.header.iter().filter(|c| c.starts_with("tier_")).count(),
        4
    );
    let bruiser = &traits.records[0];
    assert_eq!(bruiser.get("tier_0"), Some("2"));
    assert_eq!(bruiser.get("tier_2"), Some("6"));
    assert_eq!(bruiser.get("tier_3"), Some(""));
    assert_eq!(traits.records[3].get("tier_0"), Some(""));
}

#[test]
fn test_untouched_columns_are_identical() {
    let data = DataDir::new();
    let mut ui = SilentUi::new();
    process_dataset(&data.settings, &resolve_datasets(None, None).unwrap(), &mut ui).unwrap();

    let raw = read_table(&data.raw("items_s16.csv")).unwrap();
    let split = read_table(&data.processed("items_s16_split.csv")).unwrap();

    assert_eq!(raw.records.len(), split.records.len());
    for (before, after) in raw.records.iter().zip(&split.records) {
        for column in ["name", "category", "description"] {
            assert_eq!(before.get(column), after.get(column), "column {}", column);
        }
    }
}

#[test]
fn test_process_refuses_to_overwrite() {
    let data = DataDir::new();
    let tables = resolve_datasets(Some(vec!["items".to_string()]), None).unwrap();
    let mut ui = SilentUi::new();

    process_dataset(&data.settings, &tables, &mut ui).unwrap();
    let err = process_dataset(&data.settings, &tables, &mut ui).unwrap_err();
    assert!(matches!(err, DataError::OutputExists(_)));

    let forced = data.settings.clone().with_force(true);
    process_dataset(&forced, &tables, &mut ui).unwrap();
}

#[test]
fn test_process_skips_missing_inputs() {
    let data = DataDir::new();
    fs::remove_file(data.raw("traits_s16.csv")).unwrap();
    let mut ui = RecordingUi::default();

    let tables = resolve_datasets(None, None).unwrap();
    let summaries = process_dataset(&data.settings, &tables, &mut ui).unwrap();
    assert_eq!(summaries.len(), 1);
    assert!(ui.logs.iter().any(|l| l.contains("traits: skipped")));
    assert!(ui.phases.contains(&Phase::Splitting));
}

#[test]
fn test_resplitting_split_file_is_malformed() {
    let data = DataDir::new();
    let mut ui = SilentUi::new();
    process_dataset(&data.settings, &resolve_datasets(None, None).unwrap(), &mut ui).unwrap();

    let spec = SplitSpec::new("comp", "comp", 2);
    let err = split_file(
        &data.processed("items_s16_split.csv"),
        &data.processed("items_again.csv"),
        &spec,
        false,
        &mut ui,
    )
    .unwrap_err();

    assert!(err.is_malformed_record(), "{}", err);
    assert!(!data.processed("items_again.csv").exists());
}

#[test]
fn test_overflow_reject_names_row() {
    let data = DataDir::new();
    let input = data.write_raw("traits_wide.csv", "name,num_for_tier\nA,1;2\nB,1;2;3;4;5\n");
    let spec = SplitSpec::new("num_for_tier", "tier", 4).with_overflow(Overflow::Reject);

    let output = data.processed("traits_wide_split.csv");
    let err = split_file(&input, &output, &spec, false, &mut SilentUi::new()).unwrap_err();
    assert!(matches!(err, DataError::Row { row: 2, .. }), "{}", err);

    let spec = spec.with_overflow(Overflow::Truncate);
    let summary = split_file(&input, &output, &spec, false, &mut SilentUi::new()).unwrap();
    assert_eq!(summary.rows, 2);
    let table = read_table(&summary.output).unwrap();
    assert_eq!(table.records[1].get("tier_3"), Some("4"));
}

#[test]
fn test_explode_match_items() {
    let data = DataDir::new();
    let output = data.processed("match_items_EUW1.csv");
    let rows = explode_file(
        &data.raw("matches_EUW1.csv"),
        &output,
        "items",
        ";",
        Some("item"),
        false,
        &mut SilentUi::new(),
    )
    .unwrap();

    // 2 matches x 8 players x 2 items on the first unit, none on the second
    assert_eq!(rows, 32);
    let table = read_table(&output).unwrap();
    assert!(table.header.iter().any(|c| c == "item"));
    assert!(!table.header.iter().any(|c| c == "region"));
}

// =============================================================================
// Generated Rows
// =============================================================================

#[test]
fn test_item_split_rejoins_to_original() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(RANDOM_SEED);
    let components = [
        "Chain Vest",
        "B.F. Sword",
        "Bandit's Blade",
        "Tear of the Goddess",
        "Sparring Gloves",
    ];
    let spec = SplitSpec::new("comp", "comp", 2);

    for i in 0..200 {
        let count = rng.gen_range(0..=2);
        let parts: Vec<&str> = (0..count)
            .map(|_| *components.choose(&mut rng).unwrap())
            .collect();
        let comp = parts.join(";");

        let record = Record::from_pairs([("name", format!("item{}", i)), ("comp", comp.clone())]);
        let split = split_record(&record, &spec).unwrap();

        let parts = [split.get("comp_0").unwrap(), split.get("comp_1").unwrap()];
        let rejoined = join_list(&parts, ";");
        assert_eq!(rejoined, comp);
        assert_eq!(split.len(), 3);
    }
}

#[test]
fn test_trait_split_arity_is_fixed() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(RANDOM_SEED);
    let spec = SplitSpec::new("num_for_tier", "tier", 4);

    for _ in 0..200 {
        let count = rng.gen_range(0..=4);
        let breakpoints: Vec<String> =
            (0..count).map(|_| rng.gen_range(1..=10).to_string()).collect();
        let value = breakpoints.join(";");

        let record = Record::from_pairs([("name", "Trait"), ("num_for_tier", value.as_str())]);
        let split = split_record(&record, &spec).unwrap();

        let tiers: Vec<&str> = (0..4).map(|i| split.get(&format!("tier_{}", i)).unwrap()).collect();
        assert_eq!(tiers.len(), 4);
        let filled: Vec<_> = tiers.into_iter().filter(|t| !t.is_empty()).collect();
        assert_eq!(parse_list(&value, ";"), filled);
    }
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_clean_directory() {
    let data = DataDir::new();
    let mut ui = SilentUi::new();
    process_dataset(&data.settings, &resolve_datasets(None, None).unwrap(), &mut ui).unwrap();

    let [raw, processed] = data.dirs();
    let report = validate_dirs(
        &[raw.as_path(), processed.as_path()],
        ALL_TABLES,
        &ValidateOptions::default(),
        &mut ui,
    )
    .unwrap();

    assert!(report.is_ok(), "{:?}", report);
    assert_eq!(report.files.len(), 9);
    let augments: Vec<_> = report.files.iter().filter(|f| f.dataset == "augments").collect();
    assert_eq!(augments.len(), 2);
    assert_eq!(augments[0].partition.as_deref(), Some("2-1"));
}

#[test]
fn test_validate_reports_bad_pool_odds_and_short_match() {
    let data = DataDir::new();
    data.write_raw(
        "pool_odd_s16.csv",
        "level,cost_1,cost_2,cost_3,cost_4,cost_5\n9,15,20,25,30,15\n",
    );
    data.write_raw("matches_NA1.csv", &match_rows("NA1", 1, 7));

    let [raw, processed] = data.dirs();
    let dirs = [raw.as_path(), processed.as_path()];
    let mut ui = SilentUi::new();

    let report = validate_dirs(&dirs, ALL_TABLES, &ValidateOptions::default(), &mut ui).unwrap();
    assert!(!report.is_ok());

    let odds = report.files.iter().find(|f| f.dataset == "pool_odds").unwrap();
    assert!(odds.errors.iter().any(|e| e.contains("sum to 105")), "{:?}", odds.errors);

    let na = report.files.iter().find(|f| f.file == "matches_NA1.csv").unwrap();
    assert!(na.is_ok());
    assert!(na.warnings.iter().any(|w| w.contains("7 players")), "{:?}", na.warnings);

    let strict = ValidateOptions {
        strict: true,
        ..Default::default()
    };
    let report = validate_dirs(&dirs, ALL_TABLES, &strict, &mut ui).unwrap();
    let na = report.files.iter().find(|f| f.file == "matches_NA1.csv").unwrap();
    assert!(!na.is_ok());
}

#[test]
fn test_validate_reports_unknown_label() {
    let data = DataDir::new();
    data.write_raw(
        "augments_3-2_s16.csv",
        "augment_id,name,tier,rarity,types\na9,Built Different,S,Platinum,combat\n",
    );

    let [raw, _] = data.dirs();
    let opts = ValidateOptions::default();
    let report = validate_dirs(&[raw.as_path()], ALL_TABLES, &opts, &mut SilentUi::new()).unwrap();
    let file = report.files.iter().find(|f| f.file == "augments_3-2_s16.csv").unwrap();
    assert!(file.errors.iter().any(|e| e.contains("Platinum")), "{:?}", file.errors);
}

// =============================================================================
// SQLite Load
// =============================================================================

#[test]
fn test_load_into_sqlite() {
    let data = DataDir::new();
    let mut ui = SilentUi::new();
    process_dataset(&data.settings, &resolve_datasets(None, None).unwrap(), &mut ui).unwrap();

    let db_path = data.settings.data_dir.join("stats.db");
    let [raw, processed] = data.dirs();
    let dirs = [raw.as_path(), processed.as_path()];
    let count = load_into_sqlite(&dirs, &db_path, ALL_TABLES, &mut ui).unwrap();

    // 2 + 3 + 3 + 4 + 4 + 2 + 2 + 2 + 32
    assert_eq!(count, 54);

    let conn = Connection::open(&db_path).unwrap();

    let stages: Vec<String> = conn
        .prepare("SELECT DISTINCT stage FROM augments ORDER BY stage")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(stages, vec!["2-1", "4-2"]);

    let region_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM matches WHERE region = 'EUW1'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(region_rows, 32);

    let comp_1: Option<String> = conn
        .query_row(
            "SELECT comp_1 FROM items_split WHERE name = 'Bloodthirster'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(comp_1, None);

    let tier_2: Option<i64> = conn
        .query_row("SELECT tier_2 FROM traits_split WHERE name = 'Bruiser'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tier_2, Some(6));
}

#[test]
fn test_load_only_included_datasets() {
    let data = DataDir::new();
    let db_path = data.settings.data_dir.join("odds.db");
    let tables = resolve_datasets(Some(vec!["pool_odds".to_string()]), None).unwrap();

    let [raw, processed] = data.dirs();
    let dirs = [raw.as_path(), processed.as_path()];
    let count = load_into_sqlite(&dirs, &db_path, &tables, &mut SilentUi::new()).unwrap();
    assert_eq!(count, 2);

    let conn = Connection::open(&db_path).unwrap();
    let tables: i64 = conn
        .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tables, 1);
}

// =============================================================================
// Canonical Tables
// =============================================================================

#[test]
fn test_build_canonical_tables() {
    let data = DataDir::new();
    data.write_raw("matches_NA1.csv", &match_rows("NA1", 1, 8));

    let mut ui = SilentUi::new();
    let summary =
        build_canonical_tables(&data.settings, "canonical", DEFAULT_WIN_THRESHOLD, &mut ui)
            .unwrap();

    assert_eq!(summary.output_dir, data.processed("canonical"));
    assert_eq!(summary.files.len(), 6);

    let participants = read_table(&summary.output_dir.join("participants_EUW1.csv")).unwrap();
    assert_eq!(participants.records.len(), 16);
    let wins = participants
        .records
        .iter()
        .filter(|r| r.get("is_win") == Some("true"))
        .count();
    assert_eq!(wins, 8);

    let units = read_table(&summary.output_dir.join("units_NA1.csv")).unwrap();
    assert_eq!(units.records.len(), 16);
    assert!(!units.header.iter().any(|c| c == "items" || c == "traits"));
    assert_eq!(units.records[0].get("item_0"), Some("Infinity Edge"));
    assert_eq!(units.records[0].get("item_2"), Some(""));
    assert_eq!(units.records[1].get("unit_tier"), Some("1"));

    let traits = read_table(&summary.output_dir.join("traits_NA1.csv")).unwrap();
    assert_eq!(traits.records.len(), 24);
}

#[test]
fn test_canonical_output_is_never_reused() {
    let data = DataDir::new();
    let mut ui = SilentUi::new();

    build_canonical_tables(&data.settings, "canonical", DEFAULT_WIN_THRESHOLD, &mut ui).unwrap();
    let err = build_canonical_tables(&data.settings, "canonical", DEFAULT_WIN_THRESHOLD, &mut ui)
        .unwrap_err();
    assert!(matches!(err, DataError::DirectoryExists(_)), "{}", err);

    let summary = build_canonical_tables(&data.settings, "top2", 2, &mut ui).unwrap();
    let participants = read_table(&summary.output_dir.join("participants_EUW1.csv")).unwrap();
    let wins = participants
        .records
        .iter()
        .filter(|r| r.get("is_win") == Some("true"))
        .count();
    assert_eq!(wins, 4);
}

#[test]
fn test_canonical_without_matches_creates_nothing() {
    let data = DataDir::new();
    fs::remove_file(data.raw("matches_EUW1.csv")).unwrap();

    let err = build_canonical_tables(
        &data.settings,
        "canonical",
        DEFAULT_WIN_THRESHOLD,
        &mut SilentUi::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DataError::Validation(_)), "{}", err);
    assert!(!data.processed("canonical").exists());
}
