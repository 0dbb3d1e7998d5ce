//! Console rendering of battle events.
//!
//! [`ConsoleRenderer`] is a [`BattleObserver`] that prints a battle as it
//! happens:
//!
//! ```text
//! ================== BATTLE START ==================
//! Pikeman (P) at (0)
//! Archer (A) at (22)
//! |P|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|A|
//! ==================================================
//! TURN 1
//! Pikeman moves 2 cells
//! ...
//! ```

use std::collections::HashMap;
use std::io::{self, Write};

use battlehex_core::events::{BattleEvent, BattleObserver, FieldSnapshot, RosterEntry};
use battlehex_core::unit::UnitId;

/// Width of banners and separators.
const RULE_WIDTH: usize = 50;

/// Cells in a health bar.
pub const HP_BAR_LENGTH: usize = 10;

/// Draw `|a|b|_|` from per-cell icons.
#[must_use]
pub fn render_field<'a>(
    cells: impl IntoIterator<Item = Option<&'a str>>,
    empty_icon: &str,
) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push_str(cell.unwrap_or(empty_icon));
        line.push('|');
    }
    line
}

/// Health bar of `length` cells, filled in proportion to `current / max`
/// (rounded down).
///
/// ```
/// use battlehex_cli::renderer::hp_bar;
///
/// assert_eq!(hp_bar(5, 10, 10), "▮▮▮▮▮▯▯▯▯▯");
/// assert_eq!(hp_bar(0, 8, 4), "▯▯▯▯");
/// ```
#[must_use]
pub fn hp_bar(current: u32, max: u32, length: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        let ratio = u64::from(current.min(max)) * length as u64 / u64::from(max);
        usize::try_from(ratio).unwrap_or(length)
    };
    "▮".repeat(filled) + &"▯".repeat(length - filled)
}

/// Centre `title` in a banner of `=`.
fn banner(title: &str) -> String {
    format!("{:=^width$}", format!(" {title} "), width = RULE_WIDTH)
}

/// Prints battle events as text.
///
/// Write failures cannot be returned through [`BattleObserver`], so the
/// first one is kept and handed back by [`finish`](Self::finish); output
/// stops after it.
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
    out: W,
    empty_icon: String,
    roster: HashMap<UnitId, RosterEntry>,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Create a renderer writing to `out`, drawing empty cells with `empty_icon`.
    pub fn new(out: W, empty_icon: impl Into<String>) -> Self {
        Self {
            out,
            empty_icon: empty_icon.into(),
            roster: HashMap::new(),
            error: None,
        }
    }

    /// Flush and return the writer.
    ///
    /// # Errors
    ///
    /// The first write error hit while rendering, or a flush failure.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn name(&self, unit: UnitId) -> String {
        self.roster
            .get(&unit)
            .map_or_else(|| format!("Unit {unit}"), |entry| entry.name.clone())
    }

    fn icon(&self, cell: Option<UnitId>) -> Option<&str> {
        let entry = self.roster.get(&cell?)?;
        Some(entry.icon.as_str())
    }

    fn field_line(&self, snapshot: &FieldSnapshot) -> String {
        let icons = snapshot.cells.iter().map(|&cell| self.icon(cell));
        render_field(icons, &self.empty_icon)
    }

    fn render(&mut self, event: &BattleEvent) -> io::Result<()> {
        match event {
            BattleEvent::Started { roster, snapshot } => {
                self.roster = roster.iter().map(|e| (e.unit, e.clone())).collect();
                writeln!(self.out, "{}", banner("BATTLE START"))?;
                for entry in roster {
                    writeln!(
                        self.out,
                        "{} ({}) at {}",
                        entry.name, entry.icon, entry.position
                    )?;
                }
                let field = self.field_line(snapshot);
                writeln!(self.out, "{field}")?;
                writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
            }
            BattleEvent::TurnStarted { turn } => {
                writeln!(self.out, "TURN {turn}")?;
            }
            BattleEvent::Moved { unit, distance, .. } => {
                let cells = if *distance == 1 { "cell" } else { "cells" };
                let name = self.name(*unit);
                writeln!(self.out, "{name} moves {distance} {cells}")?;
            }
            BattleEvent::Attacked {
                unit,
                target,
                damage,
                ranged,
            } => {
                let verb = if *ranged { "shoots" } else { "attacks" };
                let (attacker, defender) = (self.name(*unit), self.name(*target));
                writeln!(self.out, "{attacker} {verb} {defender} for {damage} damage")?;
            }
            BattleEvent::Died { unit } => {
                let name = self.name(*unit);
                writeln!(self.out, "{name} falls")?;
            }
            BattleEvent::TurnEnded { snapshot, .. } => {
                let field = self.field_line(snapshot);
                writeln!(self.out, "{field}")?;
                for unit in &snapshot.units {
                    writeln!(
                        self.out,
                        "{}: {} ({}/{})",
                        unit.name,
                        hp_bar(unit.current, unit.max, HP_BAR_LENGTH),
                        unit.current,
                        unit.max
                    )?;
                }
                writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
            }
            BattleEvent::Finished { winner, turns } => {
                writeln!(self.out, "{}", banner("BATTLE OVER"))?;
                match winner {
                    Some(id) => {
                        let name = self.name(*id);
                        writeln!(self.out, "Winner: {name}")?;
                    }
                    None => writeln!(self.out, "No winner")?,
                }
                writeln!(self.out, "Turns: {turns}")?;
                writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
            }
        }
        Ok(())
    }
}

impl<W: Write> BattleObserver for ConsoleRenderer<W> {
    fn on_event(&mut self, event: &BattleEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.render(event) {
            tracing::warn!(error = %e, "Battle output failed, rendering stopped");
            self.error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlehex_core::events::HealthSnapshot;
    use battlehex_core::position::Position;
    use battlehex_core::unit::UnitVariant;

    fn entry(id: u32, name: &str, icon: &str, x: i32) -> RosterEntry {
        RosterEntry {
            unit: UnitId::new(id),
            name: name.to_string(),
            icon: icon.to_string(),
            variant: UnitVariant::Infantry,
            position: Position::new(x),
            health: 10,
        }
    }

    fn rendered(events: &[BattleEvent]) -> String {
        let mut renderer = ConsoleRenderer::new(Vec::new(), "_");
        for event in events {
            renderer.on_event(event);
        }
        String::from_utf8(renderer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_render_field() {
        let line = render_field([None, Some("P"), None, Some("A")], "_");
        assert_eq!(line, "|_|P|_|A|");
        assert_eq!(render_field(std::iter::empty(), "_"), "|");
    }

    #[test]
    fn test_hp_bar_rounds_down() {
        assert_eq!(hp_bar(10, 10, 10), "▮▮▮▮▮▮▮▮▮▮");
        assert_eq!(hp_bar(7, 8, 10), "▮▮▮▮▮▮▮▮▯▯");
        assert_eq!(hp_bar(1, 8, 10), "▮▯▯▯▯▯▯▯▯▯");
        assert_eq!(hp_bar(3, 0, 5), "▯▯▯▯▯");
    }

    #[test]
    fn test_banner_width() {
        let line = banner("BATTLE START");
        assert_eq!(line.chars().count(), RULE_WIDTH);
        assert!(line.contains(" BATTLE START "));
    }

    #[test]
    fn test_full_battle_output() {
        let roster = vec![entry(1, "Pikeman", "P", 0), entry(2, "Archer", "A", 3)];
        let snapshot = FieldSnapshot {
            cells: vec![Some(UnitId::new(1)), None, None, Some(UnitId::new(2))],
            units: vec![
                HealthSnapshot {
                    unit: UnitId::new(1),
                    name: "Pikeman".to_string(),
                    current: 10,
                    max: 10,
                    alive: true,
                },
                HealthSnapshot {
                    unit: UnitId::new(2),
                    name: "Archer".to_string(),
                    current: 4,
                    max: 8,
                    alive: true,
                },
            ],
        };

        let text = rendered(&[
            BattleEvent::Started {
                roster,
                snapshot: snapshot.clone(),
            },
            BattleEvent::TurnStarted { turn: 1 },
            BattleEvent::Moved {
                unit: UnitId::new(1),
                from: Position::new(0),
                to: Position::new(2),
                distance: 2,
            },
            BattleEvent::Attacked {
                unit: UnitId::new(2),
                target: UnitId::new(1),
                damage: 3,
                ranged: true,
            },
            BattleEvent::TurnEnded { turn: 1, snapshot },
            BattleEvent::Finished {
                winner: Some(UnitId::new(2)),
                turns: 1,
            },
        ]);

        assert!(text.contains("Pikeman (P) at (0)"));
        assert!(text.contains("|P|_|_|A|"));
        assert!(text.contains("TURN 1"));
        assert!(text.contains("Pikeman moves 2 cells"));
        assert!(text.contains("Archer shoots Pikeman for 3 damage"));
        assert!(text.contains("Archer: ▮▮▮▮▮▯▯▯▯▯ (4/8)"));
        assert!(text.contains("Winner: Archer"));
    }

    #[test]
    fn test_unknown_unit_falls_back_to_id() {
        let text = rendered(&[BattleEvent::Died {
            unit: UnitId::new(9),
        }]);
        assert_eq!(text, "Unit #9 falls\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_finish_hands_back_writer_or_first_error() {
        let mut renderer = ConsoleRenderer::new(Vec::new(), "_");
        renderer.on_event(&BattleEvent::TurnStarted { turn: 3 });
        let out = renderer.finish().unwrap();
        assert!(String::from_utf8(out).unwrap().contains("TURN 3"));

        let mut broken = ConsoleRenderer::new(BrokenPipe, "_");
        broken.on_event(&BattleEvent::TurnStarted { turn: 1 });
        broken.on_event(&BattleEvent::TurnStarted { turn: 2 });
        let err = broken.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
