use thiserror::Error;

use crate::notes::{Clef, Note, NoteFilter, NoteRange};

/// Rejected drill configuration. The previous configuration stays in effect.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base speed must be positive and finite, got {0}")]
    BaseSpeed(f32),
    #[error("growth rate must be non-negative and finite, got {0}")]
    GrowthRate(f32),
    #[error("deadline distance must be positive and finite, got {0}")]
    DeadlineDistance(f32),
    #[error("spawn delay must be non-negative and finite, got {0}")]
    SpawnDelay(f32),
    #[error("reveal duration must be non-negative and finite, got {0}")]
    RevealDuration(f32),
    #[error("max lives must be at least 1")]
    ZeroMaxLives,
    #[error("extra life interval must be at least 1")]
    ZeroExtraLifeInterval,
    #[error("failed to parse drill config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteParseError {
    #[error("empty note name")]
    Empty,
    #[error("unknown note letter {0:?}")]
    Letter(char),
    #[error("invalid octave in {0:?}")]
    Octave(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteGenError {
    #[error("note range is inverted: {min} is above {max}")]
    InvertedRange { min: Note, max: Note },
    #[error("no notes in {range} match the {filter} filter on the {clef} clef")]
    EmptyPool {
        range: NoteRange,
        filter: NoteFilter,
        clef: Clef,
    },
    #[error("note {0} is outside the playable octaves")]
    OutOfBounds(Note),
}
