//! Drill state and core types
//!
//! `Phase` is the single source of truth for where the current note is in its
//! spawn/answer/reveal cycle. `Session` is only ever replaced wholesale by the
//! progression step.

use serde::{Deserialize, Serialize};

use super::Question;
use crate::config::DrillConfig;

/// Where the current note is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No note on the staff, spawn countdown running
    #[default]
    AwaitingSpawn,
    /// Note travelling toward the danger zone, answers accepted
    Active,
    /// Correct answer on display after a miss or wrong answer
    Revealing,
}

/// How a note was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
    /// Reached the danger zone unanswered
    Missed,
}

impl Outcome {
    pub fn costs_life(self) -> bool {
        !matches!(self, Outcome::Correct)
    }
}

/// Correct/incorrect flash shown on the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl From<Outcome> for Feedback {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Correct => Feedback::Correct,
            Outcome::Incorrect | Outcome::Missed => Feedback::Incorrect,
        }
    }
}

/// Score, lives, level, and speed for one play-through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub lives: u8,
    /// Always `score / 10 + 1`
    pub level: u32,
    /// Current scroll speed (units per second)
    pub speed: f32,
}

impl Session {
    pub fn new(config: &DrillConfig) -> Self {
        Self {
            score: 0,
            lives: config.max_lives,
            level: 1,
            speed: config.base_speed,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.lives == 0
    }
}

/// The note currently on the staff
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveItem<T> {
    pub question: T,
    /// Distance left before the danger zone; never negative
    pub distance_remaining: f32,
    /// Drill clock (seconds of unpaused time) at spawn
    pub spawned_at: f64,
}

/// Advisory signal for the host: audio cues, rendering, score persistence.
/// Events never feed back into drill state.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillEvent<T: Question> {
    ItemSpawned(T),
    ItemMissed,
    RevealStarted(T::Answer),
    RevealEnded,
    LevelUp { level: u32, speed: f32 },
    LifeGained { lives: u8 },
    MusicUnlocked { score: u64 },
    SessionOver { final_score: u64 },
}

/// Read-only view for the host after each call
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub phase: Phase,
    pub session: Session,
    pub active: Option<ActiveItem<T>>,
    pub feedback: Option<Feedback>,
    pub paused: bool,
    pub over: bool,
}

impl<T: Question> Snapshot<T> {
    /// Answer for the note on the staff, if any
    pub fn active_answer(&self) -> Option<T::Answer> {
        self.active.as_ref().map(|item| item.question.answer())
    }

    /// Answer to highlight while revealing
    pub fn revealed_answer(&self) -> Option<T::Answer> {
        match self.phase {
            Phase::Revealing => self.active_answer(),
            _ => None,
        }
    }

    /// Answers are only accepted while a note is travelling
    pub fn can_answer(&self) -> bool {
        self.phase == Phase::Active && !self.paused && !self.over
    }
}
