//! Staff Invaders - a timed note-recognition drill
//!
//! Core modules:
//! - `sim`: Deterministic drill engine (phases, judging, progression)
//! - `notes`: Note names, clefs, ranges, and the seeded note generator
//! - `config`: Drill tuning with up-front validation
//! - `clock`: Host-side frame clock (timestamps to tick deltas)
//! - `highscores`: Leaderboard fed by `SessionOver`

pub mod clock;
pub mod config;
pub mod error;
pub mod highscores;
pub mod notes;
pub mod sim;

pub use clock::FrameClock;
pub use config::DrillConfig;
pub use error::{ConfigError, NoteGenError, NoteParseError};
pub use highscores::HighScores;
pub use notes::{Clef, Letter, Note, NoteFilter, NoteGenerator, NoteGeneratorConfig, NoteRange};
pub use sim::{Drill, DrillEvent, Outcome, Phase, Question, QuestionSource, Session, Verdict};

/// Drill tuning constants (reference values)
pub mod consts {
    /// Starting scroll speed (staff units per second)
    pub const BASE_SPEED: f32 = 50.0;
    /// Speed multiplier growth per level (25%)
    pub const SPEED_GROWTH_PER_LEVEL: f32 = 0.25;

    /// Staff dimensions - notes spawn at the right edge and travel left
    pub const STAFF_WIDTH: f32 = 430.0;
    /// Danger zone sits this far in from the left edge of the staff
    pub const DANGER_ZONE_OFFSET: f32 = 120.0;
    /// Distance a note travels from spawn to the danger zone
    pub const DEADLINE_DISTANCE: f32 = STAFF_WIDTH - DANGER_ZONE_OFFSET;

    /// Pause between one note resolving and the next spawning (seconds)
    pub const SPAWN_DELAY: f32 = 0.3;
    /// How long the correct answer stays on screen (seconds)
    pub const REVEAL_DURATION: f32 = 1.5;
    /// How long the correct/incorrect flash lingers after a note clears (seconds)
    pub const FEEDBACK_DURATION: f32 = 0.3;

    /// Lives at session start, and the cap for extra lives
    pub const MAX_LIVES: u8 = 3;
    /// One extra life every N correct answers (while under the cap)
    pub const EXTRA_LIFE_INTERVAL: u64 = 15;
    /// Score at which background music kicks in
    pub const MUSIC_UNLOCK_SCORE: u64 = 10;
    /// Correct answers per level
    pub const SCORE_PER_LEVEL: u64 = 10;

    /// Host frame rate used by the demo (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest delta a single frame may contribute (prevents huge jumps after stalls)
    pub const MAX_FRAME_DELTA: f32 = 0.1;
}
