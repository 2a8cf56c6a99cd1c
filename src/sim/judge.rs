//! Answer judging and the processing guard
//!
//! The guard brackets a whole outcome transaction (comparison plus
//! progression). While it is held the timeout path stands down, so a note
//! can be resolved at most once even when a deadline and an answer race.

use super::Question;
use super::state::{DrillEvent, Outcome};

/// Reentrancy flag for one outcome transaction
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingGuard {
    held: bool,
}

impl ProcessingGuard {
    /// Take the guard; false if a transaction is already in flight
    pub fn acquire(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        true
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// Exact comparison of a submitted answer with the note in flight
pub fn judge<T: Question>(question: &T, candidate: &T::Answer) -> Outcome {
    if question.answer() == *candidate {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

/// Result of `Drill::submit_answer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Judged(Outcome),
    /// Not accepting answers right now (wrong phase, paused, or mid-judgment)
    Ignored,
}

impl Verdict {
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Verdict::Judged(outcome) => Some(outcome),
            Verdict::Ignored => None,
        }
    }

    pub fn is_ignored(self) -> bool {
        self == Verdict::Ignored
    }
}

/// Verdict plus every event the answer triggered
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerReport<T: Question> {
    pub verdict: Verdict,
    pub events: Vec<DrillEvent<T>>,
}

impl<T: Question> AnswerReport<T> {
    pub fn ignored() -> Self {
        Self {
            verdict: Verdict::Ignored,
            events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{Letter, Note};

    #[test]
    fn test_guard_is_exclusive() {
        let mut guard = ProcessingGuard::default();
        assert!(guard.acquire());
        assert!(guard.is_held());
        assert!(!guard.acquire());
        guard.release();
        assert!(!guard.is_held());
        assert!(guard.acquire());
    }

    #[test]
    fn test_judge_matches_letter_only() {
        let note = Note::new(Letter::G, 4);
        assert_eq!(judge(&note, &Letter::G), Outcome::Correct);
        assert_eq!(judge(&note, &Letter::A), Outcome::Incorrect);
        assert_eq!(judge(&Note::new(Letter::G, 5), &Letter::G), Outcome::Correct);
    }

    #[test]
    fn test_verdict_helpers() {
        assert_eq!(Verdict::Judged(Outcome::Correct).outcome(), Some(Outcome::Correct));
        assert!(Verdict::Ignored.is_ignored());
        assert_eq!(Verdict::Ignored.outcome(), None);
    }
}
