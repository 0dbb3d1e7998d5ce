//! Duel setup shared by the `run` and `verify` commands.

use std::fs;
use std::path::Path;

use battlehex_core::battle::{BattleConfig, BattleManager, BattleReport};
use battlehex_core::battlefield::Battlefield;
use battlehex_core::data::GameData;
use battlehex_core::events::EventLog;
use battlehex_core::position::Position;
use battlehex_core::registry::{UnitFactory, VariantRegistry};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Two units facing each other on a linear field.
///
/// Missing fields in a scenario file take their [`Default`] values:
///
/// ```ron
/// DuelScenario(size: 12, left: "archer", right_pos: 11)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelScenario {
    /// Battlefield length in cells.
    pub size: usize,
    /// Unit-type key of the first unit.
    pub left: String,
    /// Starting cell of the first unit.
    pub left_pos: i32,
    /// Unit-type key of the second unit.
    pub right: String,
    /// Starting cell of the second unit.
    pub right_pos: i32,
    /// Round limit.
    pub max_turns: u64,
}

impl Default for DuelScenario {
    fn default() -> Self {
        Self {
            size: 23,
            left: "pikeman".to_string(),
            left_pos: 0,
            right: "archer".to_string(),
            right_pos: 22,
            max_turns: BattleConfig::default().max_turns,
        }
    }
}

impl DuelScenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// [`CliError::Scenario`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let scenario_error = |message: String| CliError::Scenario {
            path: path.to_path_buf(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| scenario_error(e.to_string()))?;
        ron::from_str(&content).map_err(|e| scenario_error(e.to_string()))
    }

    /// Build the battle: create both units and place them.
    ///
    /// # Errors
    ///
    /// Data, registry and placement errors from the core. These abort
    /// setup before any round is played.
    pub fn build(
        &self,
        data: &GameData,
        registry: &VariantRegistry,
    ) -> Result<BattleManager, CliError> {
        let mut factory = UnitFactory::new(data, registry);
        let left = factory.create(&self.left, Position::new(self.left_pos))?;
        let right = factory.create(&self.right, Position::new(self.right_pos))?;

        let config = BattleConfig {
            max_turns: self.max_turns,
        };
        let mut battle = BattleManager::with_config(Battlefield::new(self.size), config);
        battle.add_unit(left)?;
        battle.add_unit(right)?;
        Ok(battle)
    }

    /// Build and play the duel silently with a seeded RNG.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build), plus turn loop failures.
    pub fn play(
        &self,
        data: &GameData,
        registry: &VariantRegistry,
        seed: u64,
    ) -> Result<(BattleReport, u64), CliError> {
        let mut battle = self.build(data, registry)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut log = EventLog::new();
        battle.run_with_observer(Vec::new(), &mut rng, &mut log)?;
        Ok((battle.report(log.into_events()), battle.state_hash()))
    }
}

/// Outcome of replaying one seed several times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Final state hash of every run.
    pub hashes: Vec<u64>,
    /// Whether every run matched the first one.
    pub deterministic: bool,
}

/// Play the same seeded duel `runs` times and compare the results.
///
/// # Errors
///
/// The first setup or turn loop failure.
pub fn verify_determinism(
    scenario: &DuelScenario,
    data: &GameData,
    registry: &VariantRegistry,
    seed: u64,
    runs: u32,
) -> Result<VerifyOutcome, CliError> {
    let mut hashes = Vec::new();
    let mut first: Option<BattleReport> = None;
    let mut reports_match = true;

    for run in 0..runs {
        let (report, hash) = scenario.play(data, registry, seed)?;
        tracing::debug!(run, hash = %format!("{hash:016x}"), turns = report.turns, "Verification run finished");
        hashes.push(hash);

        match &first {
            Some(expected) => reports_match &= *expected == report,
            None => first = Some(report),
        }
    }

    let deterministic = reports_match && hashes.windows(2).all(|w| w[0] == w[1]);
    Ok(VerifyOutcome {
        hashes,
        deterministic,
    })
}
