use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SchedulerError;

/// The four approach directions around the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Parses a one-letter direction. Input is case-insensitive; the
    /// canonical form is upper-case.
    pub fn parse(text: &str) -> Result<Self, SchedulerError> {
        match text.to_ascii_uppercase().as_str() {
            "N" => Ok(Direction::North),
            "E" => Ok(Direction::East),
            "S" => Ok(Direction::South),
            "W" => Ok(Direction::West),
            _ => Err(SchedulerError::Parse(text.to_string())),
        }
    }

    /// The canonical single letter used in lane labels.
    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
