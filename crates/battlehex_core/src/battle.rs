//! Turn-based battle loop.
//!
//! [`BattleManager`] owns the [`Battlefield`] and the roster of units and
//! plays full rounds until at most one unit is left standing.
//!
//! # Round Order
//!
//! Each round:
//! 1. **Ordering** - living units sorted by speed, fastest first; ties keep
//!    roster (join) order
//! 2. **Actions** - each unit that is still alive picks the nearest enemy
//!    (ties go to the earliest roster entry) and then:
//!    - attacks it if it can from where it stands, or
//!    - moves to a cell it can attack from this turn, or
//!    - steps straight toward it as far as its speed and free cells allow
//! 3. **Victory** - checked after every action; once one unit is left the
//!    round stops early
//!
//! # Determinism
//!
//! The only source of randomness is the damage roll, drawn from the RNG the
//! caller passes in. The same roster, battlefield and seeded RNG always
//! produce the same battle.
//!
//! # Example
//!
//! ```
//! use battlehex_core::battle::BattleManager;
//! use battlehex_core::battlefield::Battlefield;
//! use battlehex_core::position::Position;
//! use battlehex_core::unit::{Behavior, CombatStats, Unit, UnitId};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let stats = CombatStats { max_health: 5, ..CombatStats::default() };
//! let a = Unit::new(UnitId::new(1), "Alpha", stats, Behavior::Melee, Position::new(0));
//! let b = Unit::new(UnitId::new(2), "Bravo", stats, Behavior::Melee, Position::new(4));
//!
//! let mut battle = BattleManager::new(Battlefield::new(5));
//! let report = battle.run([a, b], &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
//! assert!(report.winner.is_some());
//! ```

use std::cmp::Reverse;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battlefield::Battlefield;
use crate::error::{GameError, Result};
use crate::events::{
    BattleEvent, BattleObserver, EventLog, FieldSnapshot, HealthSnapshot, RosterEntry, TurnAction,
};
use crate::position::Position;
use crate::unit::{Unit, UnitId};

/// Round limit used by [`BattleConfig::default`].
pub const DEFAULT_MAX_TURNS: u64 = 10_000;

/// Battle loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Rounds played before the battle is called off without a winner.
    pub max_turns: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// Outcome of [`BattleManager::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Last unit standing.
    pub winner: Option<UnitId>,
    /// Display name of the winner.
    pub winner_name: Option<String>,
    /// Rounds played.
    pub turns: u64,
    /// Everything that happened, in order.
    pub events: Vec<BattleEvent>,
}

/// Drives a battle between the units on one battlefield.
#[derive(Debug, Clone)]
pub struct BattleManager {
    battlefield: Battlefield,
    /// Participants in join order.
    units: Vec<Unit>,
    /// Completed rounds.
    turn: u64,
    over: bool,
    winner: Option<UnitId>,
    started: bool,
    config: BattleConfig,
}

impl BattleManager {
    /// Create a manager for `battlefield` with default settings.
    #[must_use]
    pub fn new(battlefield: Battlefield) -> Self {
        Self::with_config(battlefield, BattleConfig::default())
    }

    /// Create a manager with explicit settings.
    #[must_use]
    pub fn with_config(battlefield: Battlefield, config: BattleConfig) -> Self {
        Self {
            battlefield,
            units: Vec::new(),
            turn: 0,
            over: false,
            winner: None,
            started: false,
            config,
        }
    }

    /// Completed rounds.
    #[must_use]
    pub const fn current_turn(&self) -> u64 {
        self.turn
    }

    /// Whether the battle has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.over
    }

    /// Winner, once decided.
    #[must_use]
    pub const fn winner(&self) -> Option<UnitId> {
        self.winner
    }

    /// Loop settings.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// The battlefield.
    #[must_use]
    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    /// Participants in join order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a participant.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id() == id)
    }

    /// Participants still alive, in roster order.
    pub fn alive_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_alive())
    }

    /// Place `unit` on the battlefield and add it to the roster.
    ///
    /// # Errors
    ///
    /// [`GameError::DuplicateUnit`] if the roster already holds a unit with
    /// the same id. Propagates [`GameError::OutOfBounds`],
    /// [`GameError::OccupiedCell`] and [`GameError::DeadUnit`] from the
    /// battlefield.
    pub fn add_unit(&mut self, unit: Unit) -> Result<()> {
        if self.unit(unit.id()).is_some() {
            return Err(GameError::DuplicateUnit(unit.id()));
        }
        self.battlefield.add(&unit)?;
        tracing::debug!(unit = %unit.id(), name = unit.name(), position = %unit.position(), "Unit joined");
        self.units.push(unit);
        Ok(())
    }

    /// Register `units` and play rounds until the battle ends.
    ///
    /// # Errors
    ///
    /// Placement errors from [`add_unit`](Self::add_unit), or
    /// [`GameError::InvalidState`] if the turn loop breaks an invariant.
    pub fn run<I, R>(&mut self, units: I, rng: &mut R) -> Result<BattleReport>
    where
        I: IntoIterator<Item = Unit>,
        R: Rng + ?Sized,
    {
        let mut log = EventLog::new();
        self.run_with_observer(units, rng, &mut log)?;
        Ok(self.report(log.into_events()))
    }

    /// Summarise the battle so far together with its recorded `events`.
    #[must_use]
    pub fn report(&self, events: Vec<BattleEvent>) -> BattleReport {
        BattleReport {
            winner: self.winner,
            winner_name: self
                .winner
                .and_then(|id| self.unit(id))
                .map(|u| u.name().to_string()),
            turns: self.turn,
            events,
        }
    }

    /// Like [`run`](Self::run), streaming events to `observer` instead of
    /// collecting them. Returns the winner.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with_observer<I, R, O>(
        &mut self,
        units: I,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<Option<UnitId>>
    where
        I: IntoIterator<Item = Unit>,
        R: Rng + ?Sized,
        O: BattleObserver + ?Sized,
    {
        for unit in units {
            self.add_unit(unit)?;
        }

        self.start(observer);
        while !self.over {
            if self.turn >= self.config.max_turns {
                tracing::warn!(
                    turns = self.turn,
                    "Turn limit reached, ending battle without a winner"
                );
                self.finish(None, observer);
                break;
            }
            self.play_round(rng, observer)?;
        }

        Ok(self.winner)
    }

    /// Play one full round.
    ///
    /// Does nothing once the battle is over.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] if a pre-validated move is rejected.
    pub fn play_round<R, O>(&mut self, rng: &mut R, observer: &mut O) -> Result<()>
    where
        R: Rng + ?Sized,
        O: BattleObserver + ?Sized,
    {
        if self.over {
            return Ok(());
        }
        self.start(observer);

        let turn = self.turn + 1;
        observer.on_event(&BattleEvent::TurnStarted { turn });

        let order = self.turn_order();
        tracing::trace!(turn, ?order, "Round order");

        for idx in order {
            if !self.units[idx].is_alive() {
                continue;
            }

            let action = self.take_turn(idx, rng)?;
            self.report_action(turn, idx, action, observer);

            if self.check_victory() {
                break;
            }
        }
        if !self.over {
            self.check_victory();
        }

        self.turn = turn;

        #[cfg(feature = "debug-validation")]
        self.battlefield.check_invariants()?;

        observer.on_event(&BattleEvent::TurnEnded {
            turn,
            snapshot: self.snapshot(),
        });

        if self.over {
            self.finish(self.winner, observer);
        }
        Ok(())
    }

    /// Current occupancy and roster health.
    #[must_use]
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            cells: self.battlefield.cells().to_vec(),
            units: self.units.iter().map(HealthSnapshot::from).collect(),
        }
    }

    /// Hash of the battle state, for determinism checks.
    ///
    /// Two managers in identical states produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.turn.hash(&mut hasher);
        self.over.hash(&mut hasher);
        self.winner.hash(&mut hasher);

        self.units.len().hash(&mut hasher);
        for unit in &self.units {
            unit.id().hash(&mut hasher);
            unit.health().hash(&mut hasher);
            unit.is_alive().hash(&mut hasher);
            unit.position().hash(&mut hasher);
            unit.ammo().hash(&mut hasher);
        }

        self.battlefield.cells().hash(&mut hasher);
        hasher.finish()
    }

    fn start<O: BattleObserver + ?Sized>(&mut self, observer: &mut O) {
        if self.started {
            return;
        }
        self.started = true;

        tracing::info!(
            units = self.units.len(),
            size = self.battlefield.size(),
            "Battle started"
        );
        observer.on_event(&BattleEvent::Started {
            roster: self.units.iter().map(RosterEntry::from).collect(),
            snapshot: self.snapshot(),
        });
    }

    fn finish<O: BattleObserver + ?Sized>(&mut self, winner: Option<UnitId>, observer: &mut O) {
        self.over = true;
        self.winner = winner;

        match winner.and_then(|id| self.unit(id)) {
            Some(unit) => tracing::info!(winner = unit.name(), turns = self.turn, "Battle won"),
            None => tracing::info!(turns = self.turn, "Battle ended without a winner"),
        }
        observer.on_event(&BattleEvent::Finished {
            winner,
            turns: self.turn,
        });
    }

    /// Roster indices of living units, fastest first. The sort is stable.
    fn turn_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.units.len())
            .filter(|&i| self.units[i].is_alive())
            .collect();
        order.sort_by_key(|&i| Reverse(self.units[i].speed()));
        order
    }

    /// Nearest living enemy of the unit at `idx`; ties go to the earliest
    /// roster entry.
    fn nearest_enemy(&self, idx: usize) -> Option<usize> {
        let origin = self.units[idx].position();
        self.units
            .iter()
            .enumerate()
            .filter(|&(i, u)| i != idx && u.is_alive())
            .min_by_key(|(_, u)| origin.distance(u.position()))
            .map(|(i, _)| i)
    }

    fn take_turn<R: Rng + ?Sized>(&mut self, idx: usize, rng: &mut R) -> Result<TurnAction> {
        let Some(target_idx) = self.nearest_enemy(idx) else {
            return Ok(TurnAction::Idle);
        };

        if self.units[idx].can_attack(&self.units[target_idx]) {
            let (attacker, target) = pair_mut(&mut self.units, idx, target_idx);
            let outcome = attacker.attack(target, &mut self.battlefield, rng);
            return Ok(TurnAction::Attack {
                target: target.id(),
                damage: outcome.damage,
                ranged: outcome.ranged,
                killed: outcome.killed,
            });
        }

        let unit = &self.units[idx];
        let target = &self.units[target_idx];
        let destination = unit
            .find_attack_position(target, &self.battlefield)
            .or_else(|| self.approach_cell(unit, target));

        match destination {
            Some(to) => self.move_unit(idx, to),
            None => Ok(TurnAction::Idle),
        }
    }

    /// Farthest free cell straight toward `target`, within `unit`'s speed.
    fn approach_cell(&self, unit: &Unit, target: &Unit) -> Option<Position> {
        let origin = unit.position();
        let direction = origin.direction_to(target.position());
        let max_steps = unit.speed().min(self.battlefield.size() as u32) as i32;

        (1..=max_steps)
            .rev()
            .map(|steps| origin + direction * steps)
            .find(|&cell| self.battlefield.is_position_available(cell))
    }

    fn move_unit(&mut self, idx: usize, to: Position) -> Result<TurnAction> {
        let unit = &mut self.units[idx];
        let from = unit.position();
        let distance = self.battlefield.move_unit(unit, to).map_err(|e| {
            GameError::InvalidState(format!("turn loop issued a rejected move: {e}"))
        })?;
        Ok(TurnAction::Move { from, to, distance })
    }

    fn report_action<O: BattleObserver + ?Sized>(
        &self,
        turn: u64,
        idx: usize,
        action: TurnAction,
        observer: &mut O,
    ) {
        let unit = self.units[idx].id();
        match action {
            TurnAction::Idle => {
                tracing::debug!(turn, %unit, "Unit idles");
            }
            TurnAction::Attack {
                target,
                damage,
                ranged,
                killed,
            } => {
                tracing::debug!(turn, %unit, %target, damage, ranged, "Unit attacks");
                observer.on_event(&BattleEvent::Attacked {
                    unit,
                    target,
                    damage,
                    ranged,
                });
                if killed {
                    observer.on_event(&BattleEvent::Died { unit: target });
                }
            }
            TurnAction::Move { from, to, distance } => {
                tracing::debug!(turn, %unit, %from, %to, distance, "Unit moves");
                observer.on_event(&BattleEvent::Moved {
                    unit,
                    from,
                    to,
                    distance,
                });
            }
        }
    }

    /// Ends the battle once at most one unit is alive.
    fn check_victory(&mut self) -> bool {
        let (first, more) = {
            let mut alive = self.alive_units();
            (alive.next().map(Unit::id), alive.next().is_some())
        };
        if more {
            return false;
        }

        self.over = true;
        self.winner = first;
        true
    }
}

/// Mutable references to two distinct roster entries.
fn pair_mut(units: &mut [Unit], a: usize, b: usize) -> (&mut Unit, &mut Unit) {
    debug_assert_ne!(a, b, "a unit cannot target itself");
    if a < b {
        let (low, high) = units.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = units.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}
