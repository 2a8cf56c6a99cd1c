//! Deterministic drill engine
//!
//! All timing, judging, and scoring logic lives here. This module must stay pure:
//! - Time only advances through `Drill::tick`
//! - No RNG (questions come from a `QuestionSource`)
//! - No rendering, audio, or storage dependencies

use std::fmt;

pub mod judge;
pub mod progression;
pub mod state;
pub mod tick;
pub mod tracker;

pub use judge::{AnswerReport, ProcessingGuard, Verdict, judge};
pub use progression::{Progress, apply, level_for_score, reconfigure, speed_for_level};
pub use state::{ActiveItem, DrillEvent, Feedback, Outcome, Phase, Session, Snapshot};
pub use tick::{AnswerOf, Drill};
pub use tracker::{Countdown, advance, deadline_reached};

/// Something the player has to identify before the deadline
pub trait Question: Clone + fmt::Debug + PartialEq {
    /// What the player submits; judged by exact equality
    type Answer: Clone + fmt::Debug + PartialEq;

    fn answer(&self) -> Self::Answer;
}

/// Hands the drill a fresh question on every spawn
pub trait QuestionSource {
    type Question: Question;

    fn next_question(&mut self) -> Self::Question;
}
