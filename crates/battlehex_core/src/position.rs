//! Cell coordinates on the linear battlefield.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A cell coordinate on the battlefield axis.
///
/// Positions are plain values: moving a unit produces a new `Position`
/// rather than mutating the old one.
///
/// ```
/// use battlehex_core::position::Position;
///
/// let p = Position::new(4);
/// assert_eq!(p + 3, Position::new(7));
/// assert_eq!(p.direction_to(Position::new(1)), -1);
/// assert_eq!(p.distance(Position::new(1)), 3);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Index along the battlefield.
    pub x: i32,
}

impl Position {
    /// Create a position at cell `x`.
    #[must_use]
    pub const fn new(x: i32) -> Self {
        Self { x }
    }

    /// Unit step (`-1` or `+1`) pointing from `self` toward `target`.
    ///
    /// Equal positions resolve to `+1`.
    #[must_use]
    pub const fn direction_to(self, target: Self) -> i32 {
        if target.x < self.x {
            -1
        } else {
            1
        }
    }

    /// Number of cells between two positions.
    #[must_use]
    pub const fn distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x)
    }

    /// Position shifted by `steps` cells (negative steps go down the axis).
    #[must_use]
    pub const fn offset(self, steps: i32) -> Self {
        Self::new(self.x + steps)
    }
}

impl Add<i32> for Position {
    type Output = Self;

    fn add(self, rhs: i32) -> Self::Output {
        self.offset(rhs)
    }
}

impl Sub<i32> for Position {
    type Output = Self;

    fn sub(self, rhs: i32) -> Self::Output {
        self.offset(-rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.x)
    }
}
