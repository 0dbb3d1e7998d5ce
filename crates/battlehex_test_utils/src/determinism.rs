//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a battle produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! A battle is a pure function of its roster, its battlefield and the RNG
//! seed. Sources of non-determinism include:
//!
//! - **Unseeded randomness**: every damage roll must come from the RNG the
//!   caller passes in, never from `thread_rng()`.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Turn order and target choice only ever walk the roster `Vec`.
//!
//! - **Unstable sorts**: speed ties must keep roster order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use battlehex_core::battle::BattleManager;
use battlehex_core::events::EventLog;
use rand_chacha::ChaCha8Rng;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of rounds played per run.
    pub rounds: u64,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>, rounds: u64) -> Self {
        Self {
            is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
            hashes,
            rounds,
        }
    }

    /// Distinct hashes, sorted. A deterministic battle has exactly one.
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic: {} distinct outcomes over {} runs \
                 of {} rounds ({:?})",
                unique.len(),
                self.hashes.len(),
                self.rounds,
                self.hashes
            );
        }
    }
}

/// A battle paired with the RNG that drives it.
pub type SeededBattle = (BattleManager, ChaCha8Rng);

/// Play a seeded battle for `rounds` rounds (or until it ends) and hash
/// the final state together with the full event stream.
///
/// # Panics
///
/// Panics if the turn loop reports an error.
#[must_use]
pub fn play_and_hash(setup: &SeededBattle, rounds: u64) -> u64 {
    let (mut battle, mut rng) = setup.clone();
    let mut log = EventLog::new();
    for _ in 0..rounds {
        if battle.is_over() {
            break;
        }
        battle
            .play_round(&mut rng, &mut log)
            .expect("turn loop stays consistent");
    }

    let mut hasher = DefaultHasher::new();
    battle.state_hash().hash(&mut hasher);
    format!("{:?}", log.events()).hash(&mut hasher);
    hasher.finish()
}

/// Replay a seeded battle `runs` times and verify every run ends the same.
///
/// # Example
///
/// ```
/// use battlehex_test_utils::determinism::verify_battle_determinism;
/// use battlehex_test_utils::fixtures::{seeded_rng, standard_duel};
///
/// let result = verify_battle_determinism(|| (standard_duel(), seeded_rng(7)), 3, 100);
/// result.assert_deterministic();
/// ```
pub fn verify_battle_determinism<F>(setup: F, runs: usize, max_rounds: u64) -> DeterminismResult
where
    F: Fn() -> SeededBattle,
{
    let hashes = (0..runs)
        .map(|_| play_and_hash(&setup(), max_rounds))
        .collect();
    DeterminismResult::from_hashes(hashes, max_rounds)
}

/// Run `runs` copies of a battle on scoped threads and collect the hashes.
///
/// # Panics
///
/// Panics if a battle thread panics.
pub fn run_parallel_battles<F>(setup: F, runs: usize, max_rounds: u64) -> DeterminismResult
where
    F: Fn() -> SeededBattle + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..runs)
            .map(|_| s.spawn(|| play_and_hash(&setup(), max_rounds)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("battle thread panicked"))
            .collect()
    });
    DeterminismResult::from_hashes(hashes, max_rounds)
}

/// Play two copies of a battle round by round, finding the first round
/// after which their states differ.
///
/// # Returns
///
/// `None` if the battles stay identical, `Some(round)` if they diverge
/// (round 0 means the setups already differ).
///
/// # Panics
///
/// Panics if the turn loop reports an error.
pub fn find_first_divergence<F>(setup: F, max_rounds: u64) -> Option<u64>
where
    F: Fn() -> SeededBattle,
{
    let (mut a, mut rng_a) = setup();
    let (mut b, mut rng_b) = setup();
    let mut log = EventLog::new();

    if a.state_hash() != b.state_hash() {
        return Some(0);
    }

    for round in 1..=max_rounds {
        if a.is_over() && b.is_over() {
            break;
        }
        a.play_round(&mut rng_a, &mut log)
            .expect("turn loop stays consistent");
        b.play_round(&mut rng_b, &mut log)
            .expect("turn loop stays consistent");

        if a.state_hash() != b.state_hash() {
            return Some(round);
        }
    }

    None
}
