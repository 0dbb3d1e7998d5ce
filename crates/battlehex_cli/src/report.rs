//! Battle report export.
//!
//! Reports are written as RON when the path ends in `.ron` and as JSON
//! otherwise.

use std::fs;
use std::path::Path;

use battlehex_core::battle::BattleReport;

use crate::error::CliError;

/// Serialise `report` in the format picked by the file extension.
///
/// # Errors
///
/// [`CliError::Report`] if serialisation fails.
pub fn encode_report(report: &BattleReport, path: &Path) -> Result<String, CliError> {
    let is_ron = path.extension().is_some_and(|ext| ext == "ron");
    let encoded = if is_ron {
        ron::ser::to_string_pretty(report, ron::ser::PrettyConfig::default())
            .map_err(|e| e.to_string())
    } else {
        serde_json::to_string_pretty(report).map_err(|e| e.to_string())
    };

    encoded.map_err(|message| CliError::Report {
        path: path.to_path_buf(),
        message,
    })
}

/// Write `report` to `path`.
///
/// # Errors
///
/// [`CliError::Report`] if serialisation or the write fails.
pub fn write_report(report: &BattleReport, path: &Path) -> Result<(), CliError> {
    let encoded = encode_report(report, path)?;
    fs::write(path, encoded).map_err(|e| CliError::Report {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), events = report.events.len(), "Battle report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlehex_core::events::BattleEvent;
    use battlehex_core::unit::UnitId;

    fn report() -> BattleReport {
        BattleReport {
            winner: Some(UnitId::new(2)),
            winner_name: Some("Archer".to_string()),
            turns: 7,
            events: vec![BattleEvent::Finished {
                winner: Some(UnitId::new(2)),
                turns: 7,
            }],
        }
    }

    #[test]
    fn test_json_by_default() {
        let text = encode_report(&report(), Path::new("out.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["turns"], 7);
        assert_eq!(value["winner_name"], "Archer");
    }

    #[test]
    fn test_ron_by_extension() {
        let text = encode_report(&report(), Path::new("out.ron")).unwrap();
        let parsed: BattleReport = ron::from_str(&text).unwrap();
        assert_eq!(parsed, report());
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("battle.json");
        write_report(&report(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"Archer\""));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("battle.json");
        assert!(matches!(
            write_report(&report(), &path),
            Err(CliError::Report { .. })
        ));
    }
}
