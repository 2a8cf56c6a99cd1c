//! Drill engine: phase machine, spawn scheduling, and the reveal window
//!
//! Driven entirely by the host: `tick` for the per-frame clock and
//! `submit_answer` for input. Each call is one transaction. The next session
//! is computed in full by `progression::apply` and published in a single
//! assignment, so neither path ever sees a half-applied outcome.

use super::judge::{AnswerReport, ProcessingGuard, Verdict, judge};
use super::progression::{self, Progress};
use super::state::{ActiveItem, DrillEvent, Feedback, Outcome, Phase, Session, Snapshot};
use super::tracker::Countdown;
use super::{Question, QuestionSource};
use crate::config::DrillConfig;
use crate::consts::FEEDBACK_DURATION;
use crate::error::ConfigError;

/// The answer type a drill over `S` accepts
pub type AnswerOf<S> = <<S as QuestionSource>::Question as Question>::Answer;

type Events<S> = Vec<DrillEvent<<S as QuestionSource>::Question>>;

/// One play-through of the timed recognition drill
#[derive(Debug)]
pub struct Drill<S: QuestionSource> {
    config: DrillConfig,
    source: S,
    session: Session,
    phase: Phase,
    /// Present while Active or Revealing
    active: Option<ActiveItem<S::Question>>,
    spawn_timer: Option<Countdown>,
    reveal_timer: Option<Countdown>,
    feedback: Option<Feedback>,
    feedback_timer: Option<Countdown>,
    guard: ProcessingGuard,
    paused: bool,
    /// Next tick is a fresh time baseline
    rebase: bool,
    over: bool,
    /// Unpaused seconds since session start
    clock: f64,
}

impl<S: QuestionSource> Drill<S> {
    /// Validate `config` and start a session awaiting its first spawn
    pub fn new(config: DrillConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Session::new(&config);
        let mut drill = Self {
            config,
            source,
            session,
            phase: Phase::AwaitingSpawn,
            active: None,
            spawn_timer: None,
            reveal_timer: None,
            feedback: None,
            feedback_timer: None,
            guard: ProcessingGuard::default(),
            paused: false,
            rebase: false,
            over: false,
            clock: 0.0,
        };
        drill.enter_awaiting_spawn();
        log::info!(
            "Drill started: {} lives, speed {:.1}",
            drill.session.lives,
            drill.session.speed
        );
        Ok(drill)
    }

    /// Advance the drill clock by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> Events<S> {
        let mut events = Vec::new();
        if self.paused || self.over {
            return events;
        }

        let dt = self.effective_dt(dt);
        self.clock += dt as f64;

        match self.phase {
            Phase::AwaitingSpawn => {
                self.tick_feedback(dt);
                let due = self.spawn_timer.as_mut().is_some_and(|t| t.advance(dt));
                if due {
                    self.spawn(&mut events);
                }
            }
            Phase::Active => self.tick_active(dt, &mut events),
            Phase::Revealing => {
                let done = self.reveal_timer.as_mut().is_some_and(|t| t.advance(dt));
                if done {
                    self.end_reveal(&mut events);
                }
            }
        }

        events
    }

    /// Judge an answer for the note in flight.
    ///
    /// Ignored unless a note is Active and no other outcome is being applied.
    pub fn submit_answer(&mut self, answer: AnswerOf<S>) -> AnswerReport<S::Question> {
        if self.paused || self.over || self.phase != Phase::Active {
            log::debug!("Ignoring answer {:?} ({:?})", answer, self.phase);
            return AnswerReport::ignored();
        }
        if !self.guard.acquire() {
            log::debug!("Ignoring answer {:?} (judgment in progress)", answer);
            return AnswerReport::ignored();
        }

        let Some(item) = &self.active else {
            self.guard.release();
            return AnswerReport::ignored();
        };
        let outcome = judge(&item.question, &answer);
        log::debug!("Answer {:?} for {:?}: {:?}", answer, item.question, outcome);

        let mut events = Vec::new();
        self.resolve(outcome, &mut events);
        self.guard.release();

        AnswerReport {
            verdict: Verdict::Judged(outcome),
            events,
        }
    }

    /// Freeze the note, the spawn delay, and the reveal window together.
    /// Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        log::debug!("Drill paused at {:.2}s", self.clock);
        true
    }

    /// Returns false if not paused. The next tick is applied with zero delta.
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.rebase = true;
        log::debug!("Drill resumed at {:.2}s", self.clock);
        true
    }

    /// Swap in a new configuration; on error the current one stays in effect
    pub fn configure(&mut self, config: DrillConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("Rejected drill config: {}", err);
            return Err(err);
        }
        self.session = progression::reconfigure(&self.session, &config);
        self.config = config;
        log::info!(
            "Drill reconfigured: speed {:.1}, {} max lives, reveal {}",
            self.session.speed,
            self.config.max_lives,
            if self.config.reveal_enabled { "on" } else { "off" }
        );
        Ok(())
    }

    /// Throw away the session and start over with the current config
    pub fn restart(&mut self) {
        self.session = Session::new(&self.config);
        self.active = None;
        self.feedback = None;
        self.guard = ProcessingGuard::default();
        self.paused = false;
        self.rebase = true;
        self.over = false;
        self.clock = 0.0;
        self.enter_awaiting_spawn();
        log::info!("Drill restarted");
    }

    pub fn snapshot(&self) -> Snapshot<S::Question> {
        Snapshot {
            phase: self.phase,
            session: self.session,
            active: self.active.clone(),
            feedback: self.feedback,
            paused: self.paused,
            over: self.over,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn active(&self) -> Option<&ActiveItem<S::Question>> {
        self.active.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Unpaused seconds since the session started
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn effective_dt(&mut self, dt: f32) -> f32 {
        if self.rebase {
            self.rebase = false;
            return 0.0;
        }
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid tick delta {}", dt);
            return 0.0;
        }
        dt
    }

    fn tick_feedback(&mut self, dt: f32) {
        let cleared = self.feedback_timer.as_mut().is_some_and(|t| t.advance(dt));
        if cleared {
            self.feedback = None;
            self.feedback_timer = None;
        }
    }

    fn tick_active(&mut self, dt: f32, events: &mut Events<S>) {
        let speed = self.session.speed;
        let Some(item) = self.active.as_mut() else {
            log::warn!("Active phase without a note; re-arming spawn");
            self.enter_awaiting_spawn();
            return;
        };
        if !item.advance(speed, dt) {
            return;
        }

        // An answer being judged owns this note
        if !self.guard.acquire() {
            return;
        }
        log::debug!("Note missed at {:.2}s", self.clock);
        events.push(DrillEvent::ItemMissed);
        self.resolve(Outcome::Missed, events);
        self.guard.release();
    }

    fn spawn(&mut self, events: &mut Events<S>) {
        let question = self.source.next_question();
        log::debug!("Spawned {:?} at {:.2}s", question, self.clock);

        self.active = Some(ActiveItem::new(
            question.clone(),
            self.config.deadline_distance,
            self.clock,
        ));
        self.phase = Phase::Active;
        self.spawn_timer = None;
        self.feedback = None;
        self.feedback_timer = None;
        events.push(DrillEvent::ItemSpawned(question));
    }

    /// Publish one outcome: session, feedback, and the next phase
    fn resolve(&mut self, outcome: Outcome, events: &mut Events<S>) {
        let progress = progression::apply(&self.session, outcome, &self.config);
        self.session = progress.session;
        self.feedback = Some(outcome.into());
        self.push_progress_events(&progress, events);

        if outcome.costs_life() && self.config.reveal_enabled {
            // Game over, if any, waits for the reveal to finish
            self.phase = Phase::Revealing;
            self.spawn_timer = None;
            self.reveal_timer = Some(Countdown::new(self.config.reveal_duration));
            if let Some(item) = &self.active {
                events.push(DrillEvent::RevealStarted(item.question.answer()));
            }
            return;
        }

        self.enter_awaiting_spawn();
        if progress.depleted {
            self.finish(events);
        }
    }

    fn push_progress_events(&self, progress: &Progress, events: &mut Events<S>) {
        let session = &progress.session;
        if progress.level_up {
            log::info!("Level {} (speed {:.1})", session.level, session.speed);
            events.push(DrillEvent::LevelUp {
                level: session.level,
                speed: session.speed,
            });
        }
        if progress.life_gained {
            log::info!("Extra life at score {} ({} lives)", session.score, session.lives);
            events.push(DrillEvent::LifeGained {
                lives: session.lives,
            });
        }
        if progress.music_unlocked {
            events.push(DrillEvent::MusicUnlocked {
                score: session.score,
            });
        }
    }

    fn end_reveal(&mut self, events: &mut Events<S>) {
        self.feedback = None;
        events.push(DrillEvent::RevealEnded);
        self.enter_awaiting_spawn();
        if self.session.is_depleted() {
            self.finish(events);
        }
    }

    fn enter_awaiting_spawn(&mut self) {
        self.phase = Phase::AwaitingSpawn;
        self.active = None;
        self.reveal_timer = None;
        self.spawn_timer = Some(Countdown::new(self.config.spawn_delay));
        self.feedback_timer = self.feedback.map(|_| Countdown::new(FEEDBACK_DURATION));
    }

    fn finish(&mut self, events: &mut Events<S>) {
        self.over = true;
        self.spawn_timer = None;
        log::info!(
            "Session over: score {}, level {}",
            self.session.score,
            self.session.level
        );
        events.push(DrillEvent::SessionOver {
            final_score: self.session.score,
        });
    }
}
