//! Tests for loading unit data from disk.
//!
//! Covers the bundled data file and hand-written documents in temp dirs.

use std::fs;
use std::path::Path;

use battlehex_cli::data_loader::{load_game_data, DataLoadError};
use battlehex_cli::{CliError, DuelScenario};
use battlehex_core::error::GameError;
use battlehex_core::registry::VariantRegistry;
use battlehex_test_utils::fixtures::{sample_game_data, SAMPLE_GAME_DATA};

/// Load the bundled unit data from the assets directory.
fn bundled_data() -> battlehex_core::data::GameData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/data/units.ron");
    load_game_data(&path).expect("bundled data loads")
}

fn write_temp(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("units.ron");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn bundled_data_is_valid() {
    let data = bundled_data();
    assert!(data.validate(&VariantRegistry::with_defaults()).is_empty());
    assert_eq!(data.field.empty_icon, "_");
}

#[test]
fn bundled_data_matches_fixture() {
    assert_eq!(bundled_data(), sample_game_data());
}

#[test]
fn temp_file_round_trip() {
    let (_dir, path) = write_temp(SAMPLE_GAME_DATA);
    let data = load_game_data(&path).unwrap();
    assert_eq!(data.units.len(), 2);
}

#[test]
fn missing_field_names_key_and_field() {
    let (_dir, path) = write_temp(
        r#"GameData(units: {
            "archer": UnitData(name: "Archer", type: "shooter", health: 8, attack: 3,
                defense: 1, damage_min: 1, damage_max: 3, speed: 2),
        })"#,
    );

    let err = load_game_data(&path).unwrap_err();
    assert!(matches!(
        err,
        DataLoadError::Game(GameError::MissingConfiguration { ref key, field: Some(ref field) })
            if key == "archer" && field == "icon"
    ));
}

#[test]
fn syntax_error_names_file() {
    let (_dir, path) = write_temp("GameData(units: {");
    let err = load_game_data(&path).unwrap_err();
    assert!(err.to_string().contains("units.ron"));
}

#[test]
fn bundled_duel_runs_to_completion() {
    let data = bundled_data();
    let registry = VariantRegistry::with_defaults();
    let (report, _) = DuelScenario::default().play(&data, &registry, 7).unwrap();

    assert!(report.winner.is_some());
    assert!(matches!(
        report.winner_name.as_deref(),
        Some("Pikeman" | "Archer")
    ));
}

#[test]
fn scenario_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("duel.ron");
    let source = r#"DuelScenario(size: 8, left: "archer", right_pos: 7)"#;
    fs::write(&path, source).unwrap();

    let scenario = DuelScenario::load(&path).unwrap();
    assert_eq!(scenario.size, 8);
    assert_eq!(scenario.left, "archer");

    let broken = dir.path().join("broken.ron");
    fs::write(&broken, "DuelScenario(size: ").unwrap();
    assert!(matches!(
        DuelScenario::load(&broken),
        Err(CliError::Scenario { .. })
    ));
}
