//! Score, level, speed, and lives progression
//!
//! `apply` is a pure function of the current session and one outcome. The
//! flags it returns are cues for the host; they never change drill state.

use super::state::{Outcome, Session};
use crate::config::DrillConfig;
use crate::consts::SCORE_PER_LEVEL;

/// Session after one outcome, plus the cues it triggered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub session: Session,
    pub level_up: bool,
    pub life_gained: bool,
    pub music_unlocked: bool,
    /// Lives ran out on this outcome
    pub depleted: bool,
}

/// Level for a score: one level per `SCORE_PER_LEVEL` correct answers, starting at 1
pub fn level_for_score(score: u64) -> u32 {
    u32::try_from(score / SCORE_PER_LEVEL).map_or(u32::MAX, |l| l.saturating_add(1))
}

/// `base_speed * (1 + growth_rate)^(level - 1)`, saturating at `f32::MAX`
pub fn speed_for_level(base_speed: f32, growth_rate: f32, level: u32) -> f32 {
    let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
    (base_speed * (1.0 + growth_rate).powi(exponent)).min(f32::MAX)
}

/// Apply one judged outcome.
///
/// On `Correct` the checks run on the post-increment score in a fixed order:
/// level/speed, then extra life, then the music cue. A level-up and an extra
/// life may land on the same answer.
pub fn apply(session: &Session, outcome: Outcome, config: &DrillConfig) -> Progress {
    let mut next = *session;
    let mut progress = Progress {
        session: next,
        level_up: false,
        life_gained: false,
        music_unlocked: false,
        depleted: false,
    };

    match outcome {
        Outcome::Correct => {
            next.score = session.score.saturating_add(1);

            let level = level_for_score(next.score);
            if level != session.level {
                next.level = level;
                next.speed = speed_for_level(config.base_speed, config.growth_rate, level);
                progress.level_up = true;
            }

            if next.score % config.extra_life_interval == 0 && next.lives < config.max_lives {
                next.lives += 1;
                progress.life_gained = true;
            }

            progress.music_unlocked = config.music_unlock_score == Some(next.score);
        }
        Outcome::Incorrect | Outcome::Missed => {
            next.lives = session.lives.saturating_sub(1);
            progress.depleted = next.lives == 0;
        }
    }

    progress.session = next;
    progress
}

/// Carry a session over to new settings: speed at the current level, lives capped
pub fn reconfigure(session: &Session, config: &DrillConfig) -> Session {
    Session {
        speed: speed_for_level(config.base_speed, config.growth_rate, session.level),
        lives: session.lives.min(config.max_lives),
        ..*session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> DrillConfig {
        DrillConfig {
            extra_life_interval: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(9), 1);
        assert_eq!(level_for_score(10), 2);
        assert_eq!(level_for_score(25), 3);
    }

    #[test]
    fn test_speed_for_level() {
        assert_eq!(speed_for_level(50.0, 0.25, 1), 50.0);
        assert_eq!(speed_for_level(50.0, 0.25, 2), 62.5);
        assert!((speed_for_level(50.0, 0.25, 3) - 78.125).abs() < 1e-4);
    }

    #[test]
    fn test_speed_saturates() {
        let below = speed_for_level(50.0, 1e18, 3);
        assert!(below.is_finite() && below < f32::MAX);
        assert_eq!(speed_for_level(50.0, 1e18, 4), f32::MAX);
        assert_eq!(speed_for_level(50.0, 1e18, 40), f32::MAX);
    }

    #[test]
    fn test_correct_increments_score() {
        let config = config();
        let session = Session::new(&config);
        let progress = apply(&session, Outcome::Correct, &config);
        assert_eq!(progress.session.score, 1);
        assert_eq!(progress.session.level, 1);
        assert!(!progress.level_up);
        assert!(!progress.depleted);
    }

    #[test]
    fn test_level_up_recomputes_speed() {
        let config = config();
        let session = Session {
            score: 9,
            ..Session::new(&config)
        };
        let progress = apply(&session, Outcome::Correct, &config);
        assert!(progress.level_up);
        assert_eq!(progress.session.level, 2);
        assert_eq!(progress.session.speed, config.base_speed * 1.25);
    }

    #[test]
    fn test_level_up_and_extra_life_together() {
        let config = config();
        let session = Session {
            score: 19,
            lives: 1,
            level: 2,
            speed: 62.5,
        };
        let progress = apply(&session, Outcome::Correct, &config);
        assert!(progress.level_up);
        assert!(progress.life_gained);
        assert_eq!(progress.session.level, 3);
        assert_eq!(progress.session.lives, 2);
    }

    #[test]
    fn test_no_extra_life_at_cap() {
        let config = config();
        let session = Session {
            score: 9,
            ..Session::new(&config)
        };
        let progress = apply(&session, Outcome::Correct, &config);
        assert!(!progress.life_gained);
        assert_eq!(progress.session.lives, config.max_lives);
    }

    #[test]
    fn test_music_unlock_fires_once() {
        let config = config();
        let mut session = Session::new(&config);
        let mut unlocks = 0;
        for _ in 0..30 {
            let progress = apply(&session, Outcome::Correct, &config);
            if progress.music_unlocked {
                unlocks += 1;
                assert_eq!(progress.session.score, 10);
            }
            session = progress.session;
        }
        assert_eq!(unlocks, 1);
    }

    #[test]
    fn test_misses_deplete_lives() {
        let config = config();
        let mut session = Session::new(&config);
        for expected in (0..config.max_lives).rev() {
            let progress = apply(&session, Outcome::Missed, &config);
            assert_eq!(progress.session.lives, expected);
            assert_eq!(progress.depleted, expected == 0);
            session = progress.session;
        }
        // Already empty stays empty
        let progress = apply(&session, Outcome::Incorrect, &config);
        assert_eq!(progress.session.lives, 0);
        assert_eq!(progress.session.score, 0);
    }

    #[test]
    fn test_reconfigure_keeps_score_and_level() {
        let session = Session {
            score: 23,
            lives: 3,
            level: 3,
            speed: 78.125,
        };
        let config = DrillConfig {
            base_speed: 40.0,
            growth_rate: 0.5,
            max_lives: 2,
            ..Default::default()
        };
        let next = reconfigure(&session, &config);
        assert_eq!(next.score, 23);
        assert_eq!(next.level, 3);
        assert_eq!(next.speed, 90.0);
        assert_eq!(next.lives, 2);
    }

    fn outcome_strategy() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            3 => Just(Outcome::Correct),
            1 => Just(Outcome::Incorrect),
            1 => Just(Outcome::Missed),
        ]
    }

    proptest! {
        #[test]
        fn prop_level_tracks_score(outcomes in prop::collection::vec(outcome_strategy(), 0..200)) {
            let config = config();
            let mut session = Session::new(&config);
            for outcome in outcomes {
                session = apply(&session, outcome, &config).session;
                prop_assert_eq!(session.level as u64, session.score / 10 + 1);
            }
        }

        #[test]
        fn prop_lives_stay_in_bounds(
            outcomes in prop::collection::vec(outcome_strategy(), 0..200),
            max_lives in 1u8..6,
            interval in 1u64..20,
        ) {
            let config = DrillConfig { max_lives, extra_life_interval: interval, ..Default::default() };
            let mut session = Session::new(&config);
            for outcome in outcomes {
                session = apply(&session, outcome, &config).session;
                prop_assert!(session.lives <= max_lives);
            }
        }

        #[test]
        fn prop_speed_increases_with_level(
            base in 1.0f32..500.0,
            growth in 0.05f32..1.0,
            l1 in 1u32..30,
            gap in 1u32..10,
        ) {
            let slow = speed_for_level(base, growth, l1);
            let fast = speed_for_level(base, growth, l1 + gap);
            prop_assert!(slow < fast);
        }
    }
}
