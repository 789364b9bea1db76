//! Lane - the four fixed traffic directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JunctionError;

/// One of the four fixed traffic directions.
///
/// Declaration order is the cycle order: the automatic cycle visits lanes in
/// this sequence and wraps around. The set is fixed at compile time; lane
/// names parse case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    North,
    East,
    South,
    West,
}

impl Lane {
    /// All lanes in cycle order.
    pub const ALL: [Lane; 4] = [Lane::North, Lane::East, Lane::South, Lane::West];

    /// The canonical lane name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::North => "North",
            Lane::East => "East",
            Lane::South => "South",
            Lane::West => "West",
        }
    }

    /// Parse a lane from its exact canonical name.
    pub fn parse(name: &str) -> Result<Lane, JunctionError> {
        match name {
            "North" => Ok(Lane::North),
            "East" => Ok(Lane::East),
            "South" => Ok(Lane::South),
            "West" => Ok(Lane::West),
            _ => Err(JunctionError::InvalidLane(name.to_string())),
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = JunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lane::parse(s)
    }
}
