//! Staff Invaders headless demo
//!
//! Drives a drill at 60 Hz with a simulated player until the session ends,
//! then records the score. Usage: `staff-invaders [seed]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use staff_invaders::consts::FRAME_DT;
use staff_invaders::notes::RangePreset;
use staff_invaders::{
    Drill, DrillConfig, DrillEvent, FrameClock, HighScores, Letter, Note, NoteGenerator,
    NoteGeneratorConfig, Verdict,
};

/// Give up after this many frames (30 simulated minutes)
const MAX_FRAMES: u64 = 60 * 60 * 30;
/// Pause the drill for a couple of seconds at this frame
const PAUSE_AT_FRAME: u64 = 600;
const PAUSE_FRAMES: u64 = 120;

/// Simulated player: answers after a random reaction time, sometimes wrong
struct AutoPlayer {
    rng: Pcg32,
    accuracy: f64,
    /// Drill-clock time at which to answer the current note
    answer_at: Option<f64>,
}

impl AutoPlayer {
    fn new(seed: u64, accuracy: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            accuracy,
            answer_at: None,
        }
    }

    /// Decide whether to answer now; returns the letter to submit
    fn poll(&mut self, answer: Letter, spawned_at: f64, now: f64) -> Option<Letter> {
        let due = *self
            .answer_at
            .get_or_insert_with(|| spawned_at + self.rng.random_range(0.8..7.0));
        if now < due {
            return None;
        }
        self.answer_at = None;

        if self.rng.random_bool(self.accuracy) {
            Some(answer)
        } else {
            let offset = self.rng.random_range(1..Letter::ALL.len());
            Some(Letter::ALL[(answer.index() as usize + offset) % Letter::ALL.len()])
        }
    }

    fn forget(&mut self) {
        self.answer_at = None;
    }
}

fn log_event(event: &DrillEvent<Note>) {
    match event {
        DrillEvent::ItemSpawned(note) => log::debug!("Note {}", note),
        DrillEvent::ItemMissed => log::info!("Missed!"),
        DrillEvent::RevealStarted(letter) => log::info!("Answer was {}", letter),
        DrillEvent::RevealEnded => {}
        DrillEvent::LevelUp { level, speed } => {
            log::info!("Level {} - speed {:.1}", level, speed)
        }
        DrillEvent::LifeGained { lives } => log::info!("Extra life ({} lives)", lives),
        DrillEvent::MusicUnlocked { score } => log::info!("Music on at score {}", score),
        DrillEvent::SessionOver { final_score } => log::info!("Game over: {}", final_score),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(err) => {
                log::error!("Invalid seed {:?}: {}", arg, err);
                std::process::exit(2);
            }
        },
        None => 42,
    };
    log::info!("Staff Invaders (headless) starting, seed {}", seed);

    let generator = match NoteGenerator::new(&NoteGeneratorConfig::from_preset(
        RangePreset::Intermediate,
        seed,
    )) {
        Ok(generator) => generator,
        Err(err) => {
            log::error!("Note generator: {}", err);
            std::process::exit(1);
        }
    };
    let mut drill = match Drill::new(DrillConfig::default(), generator) {
        Ok(drill) => drill,
        Err(err) => {
            log::error!("Drill config: {}", err);
            std::process::exit(1);
        }
    };

    let mut player = AutoPlayer::new(seed, 0.9);
    let mut clock = FrameClock::default();
    let mut high_scores = HighScores::new();
    let mut final_session = None;

    for frame in 0..MAX_FRAMES {
        let now = frame as f64 * FRAME_DT as f64;

        if frame == PAUSE_AT_FRAME {
            drill.pause();
            log::info!("Paused");
        }
        if frame == PAUSE_AT_FRAME + PAUSE_FRAMES {
            drill.resume();
            clock.rebase();
            log::info!("Resumed");
        }

        let dt = clock.frame(now);
        let mut events = drill.tick(dt);

        let snapshot = drill.snapshot();
        if snapshot.can_answer() {
            if let (Some(item), Some(answer)) = (&snapshot.active, snapshot.active_answer()) {
                if let Some(letter) = player.poll(answer, item.spawned_at, drill.clock()) {
                    let report = drill.submit_answer(letter);
                    if let Verdict::Judged(outcome) = report.verdict {
                        log::debug!("{} -> {:?}", letter, outcome);
                    }
                    events.extend(report.events);
                }
            }
        } else if !snapshot.paused {
            player.forget();
        }

        for event in &events {
            log_event(event);
            if let DrillEvent::SessionOver { .. } = event {
                final_session = Some(*drill.session());
            }
        }
        if final_session.is_some() {
            break;
        }
    }

    match final_session {
        Some(session) => {
            let timestamp = drill.clock() * 1000.0;
            high_scores.record_session(&session, timestamp);
            log::info!(
                "Final score {} at level {} after {:.1}s",
                session.score,
                session.level,
                drill.clock()
            );
            match high_scores.to_json() {
                Ok(json) => log::info!("Leaderboard: {}", json),
                Err(err) => log::warn!("Failed to serialize leaderboard: {}", err),
            }
        }
        None => log::info!(
            "Stopped after {} frames with score {}",
            MAX_FRAMES,
            drill.session().score
        ),
    }
}
