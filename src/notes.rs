//! Note names, clefs, ranges, and the seeded note generator
//!
//! The generator is the drill's default `QuestionSource`: it picks natural
//! notes from a configured range, optionally restricted to the lines or the
//! spaces of a clef, and the player answers with the letter name.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{NoteGenError, NoteParseError};
use crate::sim::{Question, QuestionSource};

/// Highest octave number a note may carry
pub const MAX_OCTAVE: u8 = 9;

/// Re-rolls allowed when trying to avoid repeating the previous note
const REPEAT_REROLLS: u32 = 10;

/// Natural note letters, in scale order starting from C
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position within the octave (C = 0 .. B = 6)
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Letter {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let first = chars.next().ok_or(NoteParseError::Empty)?;
        let letter = Letter::from_char(first).ok_or(NoteParseError::Letter(first))?;
        match chars.next() {
            None => Ok(letter),
            Some(extra) => Err(NoteParseError::Letter(extra)),
        }
    }
}

/// A natural note in scientific pitch notation (e.g. G4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub letter: Letter,
    pub octave: u8,
}

impl Note {
    pub const fn new(letter: Letter, octave: u8) -> Self {
        Self { letter, octave }
    }

    /// Diatonic step count from C0, used for ordering and range checks
    pub fn step(self) -> u32 {
        self.octave as u32 * 7 + self.letter.index() as u32
    }

    fn from_step(step: u32) -> Self {
        Self {
            letter: Letter::ALL[(step % 7) as usize],
            octave: (step / 7) as u8,
        }
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.step().cmp(&other.step())
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.octave)
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(NoteParseError::Empty)?;
        let letter = Letter::from_char(first).ok_or(NoteParseError::Letter(first))?;
        let octave: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| NoteParseError::Octave(s.to_string()))?;
        if octave > MAX_OCTAVE {
            return Err(NoteParseError::Octave(s.to_string()));
        }
        Ok(Note::new(letter, octave))
    }
}

/// The player identifies a note by its letter name alone
impl Question for Note {
    type Answer = Letter;

    fn answer(&self) -> Letter {
        self.letter
    }
}

/// Staff clef
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Clef {
    #[default]
    Treble,
    Bass,
    Alto,
    Grand,
}

const TREBLE_LINES: [Note; 5] = [
    Note::new(Letter::E, 4),
    Note::new(Letter::G, 4),
    Note::new(Letter::B, 4),
    Note::new(Letter::D, 5),
    Note::new(Letter::F, 5),
];
const TREBLE_SPACES: [Note; 4] = [
    Note::new(Letter::F, 4),
    Note::new(Letter::A, 4),
    Note::new(Letter::C, 5),
    Note::new(Letter::E, 5),
];
const BASS_LINES: [Note; 5] = [
    Note::new(Letter::G, 2),
    Note::new(Letter::B, 2),
    Note::new(Letter::D, 3),
    Note::new(Letter::F, 3),
    Note::new(Letter::A, 3),
];
const BASS_SPACES: [Note; 4] = [
    Note::new(Letter::A, 2),
    Note::new(Letter::C, 3),
    Note::new(Letter::E, 3),
    Note::new(Letter::G, 3),
];
const ALTO_LINES: [Note; 5] = [
    Note::new(Letter::F, 3),
    Note::new(Letter::A, 3),
    Note::new(Letter::C, 4),
    Note::new(Letter::E, 4),
    Note::new(Letter::G, 4),
];
const ALTO_SPACES: [Note; 4] = [
    Note::new(Letter::G, 3),
    Note::new(Letter::B, 3),
    Note::new(Letter::D, 4),
    Note::new(Letter::F, 4),
];

impl Clef {
    pub fn as_str(&self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
            Clef::Alto => "alto",
            Clef::Grand => "grand",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "treble" | "g" => Some(Clef::Treble),
            "bass" | "f" => Some(Clef::Bass),
            "alto" | "c" => Some(Clef::Alto),
            "grand" => Some(Clef::Grand),
            _ => None,
        }
    }

    /// Notes sitting on the five staff lines (grand staff uses the treble staff)
    pub fn line_notes(&self) -> &'static [Note] {
        match self {
            Clef::Treble | Clef::Grand => &TREBLE_LINES,
            Clef::Bass => &BASS_LINES,
            Clef::Alto => &ALTO_LINES,
        }
    }

    /// Notes sitting in the four staff spaces
    pub fn space_notes(&self) -> &'static [Note] {
        match self {
            Clef::Treble | Clef::Grand => &TREBLE_SPACES,
            Clef::Bass => &BASS_SPACES,
            Clef::Alto => &ALTO_SPACES,
        }
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which staff positions notes may be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteFilter {
    #[default]
    All,
    Lines,
    Spaces,
}

impl NoteFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteFilter::All => "all",
            NoteFilter::Lines => "lines",
            NoteFilter::Spaces => "spaces",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(NoteFilter::All),
            "lines" | "line" => Some(NoteFilter::Lines),
            "spaces" | "space" => Some(NoteFilter::Spaces),
            _ => None,
        }
    }
}

impl fmt::Display for NoteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive range of natural notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRange {
    pub min: Note,
    pub max: Note,
}

impl Default for NoteRange {
    fn default() -> Self {
        Self {
            min: Note::new(Letter::C, 4),
            max: Note::new(Letter::C, 5),
        }
    }
}

impl NoteRange {
    pub fn new(min: Note, max: Note) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, note: Note) -> bool {
        self.min <= note && note <= self.max
    }

    /// Every natural note in the range, low to high
    pub fn notes(&self) -> Vec<Note> {
        (self.min.step()..=self.max.step())
            .map(Note::from_step)
            .collect()
    }
}

impl fmt::Display for NoteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Named ranges offered on the setup screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangePreset {
    /// Staff notes only
    #[default]
    Beginner,
    /// Extended range
    Intermediate,
    /// Full range
    Advanced,
}

impl RangePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePreset::Beginner => "Beginner",
            RangePreset::Intermediate => "Intermediate",
            RangePreset::Advanced => "Advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" | "easy" => Some(RangePreset::Beginner),
            "intermediate" | "medium" => Some(RangePreset::Intermediate),
            "advanced" | "hard" => Some(RangePreset::Advanced),
            _ => None,
        }
    }

    pub fn range(&self) -> NoteRange {
        match self {
            RangePreset::Beginner => {
                NoteRange::new(Note::new(Letter::E, 4), Note::new(Letter::F, 5))
            }
            RangePreset::Intermediate => {
                NoteRange::new(Note::new(Letter::C, 4), Note::new(Letter::A, 5))
            }
            RangePreset::Advanced => {
                NoteRange::new(Note::new(Letter::B, 3), Note::new(Letter::B, 5))
            }
        }
    }
}

/// Setup for a `NoteGenerator`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NoteGeneratorConfig {
    pub clef: Clef,
    pub range: NoteRange,
    pub filter: NoteFilter,
    /// RNG seed; the same seed yields the same note sequence
    pub seed: u64,
}

impl NoteGeneratorConfig {
    pub fn from_preset(preset: RangePreset, seed: u64) -> Self {
        Self {
            range: preset.range(),
            seed,
            ..Default::default()
        }
    }
}

/// Build the candidate pool for a clef/range/filter combination
pub fn note_pool(clef: Clef, range: NoteRange, filter: NoteFilter) -> Result<Vec<Note>, NoteGenError> {
    for note in [range.min, range.max] {
        if note.octave > MAX_OCTAVE {
            return Err(NoteGenError::OutOfBounds(note));
        }
    }
    if range.min > range.max {
        return Err(NoteGenError::InvertedRange {
            min: range.min,
            max: range.max,
        });
    }

    let pool: Vec<Note> = match filter {
        NoteFilter::All => range.notes(),
        NoteFilter::Lines => clef
            .line_notes()
            .iter()
            .copied()
            .filter(|n| range.contains(*n))
            .collect(),
        NoteFilter::Spaces => clef
            .space_notes()
            .iter()
            .copied()
            .filter(|n| range.contains(*n))
            .collect(),
    };

    if pool.is_empty() {
        return Err(NoteGenError::EmptyPool {
            range,
            filter,
            clef,
        });
    }
    Ok(pool)
}

/// Seeded random note source
#[derive(Debug, Clone)]
pub struct NoteGenerator {
    pool: Vec<Note>,
    rng: Pcg32,
    last: Option<Note>,
}

impl NoteGenerator {
    pub fn new(config: &NoteGeneratorConfig) -> Result<Self, NoteGenError> {
        let pool = note_pool(config.clef, config.range, config.filter)?;
        log::debug!(
            "Note pool for {} clef {} ({}): {} notes",
            config.clef,
            config.range,
            config.filter,
            pool.len()
        );
        Ok(Self {
            pool,
            rng: Pcg32::seed_from_u64(config.seed),
            last: None,
        })
    }

    pub fn pool(&self) -> &[Note] {
        &self.pool
    }

    /// Pick the next note, avoiding an immediate repeat when the pool allows it
    pub fn next_note(&mut self) -> Note {
        let mut note = self.pick();
        let mut attempts = 1;
        while Some(note) == self.last && attempts < REPEAT_REROLLS {
            note = self.pick();
            attempts += 1;
        }
        self.last = Some(note);
        note
    }

    fn pick(&mut self) -> Note {
        self.pool[self.rng.random_range(0..self.pool.len())]
    }
}

impl QuestionSource for NoteGenerator {
    type Question = Note;

    fn next_question(&mut self) -> Note {
        self.next_note()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        s.parse().expect("valid note")
    }

    #[test]
    fn test_parse_notes() {
        assert_eq!(note("G4"), Note::new(Letter::G, 4));
        assert_eq!(note(" c5 "), Note::new(Letter::C, 5));
        assert_eq!("".parse::<Note>(), Err(NoteParseError::Empty));
        assert_eq!("H4".parse::<Note>(), Err(NoteParseError::Letter('H')));
        assert!(matches!("G".parse::<Note>(), Err(NoteParseError::Octave(_))));
        assert!(matches!("G12".parse::<Note>(), Err(NoteParseError::Octave(_))));
        assert_eq!(note("B3").to_string(), "B3");
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!("g".parse::<Letter>(), Ok(Letter::G));
        assert_eq!("Gb".parse::<Letter>(), Err(NoteParseError::Letter('b')));
        assert_eq!(Letter::from_char('x'), None);
    }

    #[test]
    fn test_ordering_crosses_octaves() {
        assert!(note("B3") < note("C4"));
        assert!(note("C4") < note("D4"));
        assert!(note("A5") > note("G5"));
    }

    #[test]
    fn test_range_notes() {
        let range = NoteRange::new(note("B3"), note("E4"));
        let names: Vec<String> = range.notes().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["B3", "C4", "D4", "E4"]);
        assert_eq!(NoteRange::default().notes().len(), 8);
    }

    #[test]
    fn test_line_and_space_filters() {
        let range = RangePreset::Beginner.range();
        let lines = note_pool(Clef::Treble, range, NoteFilter::Lines).expect("pool");
        assert_eq!(lines, TREBLE_LINES.to_vec());

        let spaces = note_pool(Clef::Treble, range, NoteFilter::Spaces).expect("pool");
        assert_eq!(spaces, TREBLE_SPACES.to_vec());

        // C4-C5 only reaches the lower treble lines
        let lines = note_pool(Clef::Treble, NoteRange::default(), NoteFilter::Lines).expect("pool");
        assert_eq!(lines, vec![note("E4"), note("G4"), note("B4")]);
    }

    #[test]
    fn test_empty_and_inverted_pools() {
        let err = note_pool(Clef::Bass, RangePreset::Beginner.range(), NoteFilter::Lines).unwrap_err();
        assert!(matches!(err, NoteGenError::EmptyPool { .. }));

        let inverted = NoteRange::new(note("C5"), note("C4"));
        let err = note_pool(Clef::Treble, inverted, NoteFilter::All).unwrap_err();
        assert!(matches!(err, NoteGenError::InvertedRange { .. }));
    }

    #[test]
    fn test_presets() {
        assert_eq!(RangePreset::from_str("ADVANCED"), Some(RangePreset::Advanced));
        assert_eq!(RangePreset::from_str("expert"), None);
        assert_eq!(RangePreset::Intermediate.range().to_string(), "C4-A5");
        assert_eq!(Clef::from_str("Bass"), Some(Clef::Bass));
        assert_eq!(NoteFilter::from_str("spaces"), Some(NoteFilter::Spaces));
    }

    #[test]
    fn test_generator_is_deterministic() {
        let config = NoteGeneratorConfig::from_preset(RangePreset::Advanced, 777);
        let mut a = NoteGenerator::new(&config).expect("generator");
        let mut b = NoteGenerator::new(&config).expect("generator");
        for _ in 0..50 {
            assert_eq!(a.next_note(), b.next_note());
        }
    }

    #[test]
    fn test_generator_stays_in_pool_and_avoids_repeats() {
        let config = NoteGeneratorConfig {
            seed: 3,
            ..Default::default()
        };
        let mut generator = NoteGenerator::new(&config).expect("generator");
        let pool = generator.pool().to_vec();
        let mut previous = generator.next_note();
        let mut repeats = 0;
        for _ in 0..200 {
            let next = generator.next_note();
            assert!(pool.contains(&next));
            if next == previous {
                repeats += 1;
            }
            previous = next;
        }
        // With 8 candidates and 10 re-rolls a repeat is vanishingly rare
        assert!(repeats <= 1);
    }

    #[test]
    fn test_single_note_pool_repeats() {
        let config = NoteGeneratorConfig {
            range: NoteRange::new(note("G4"), note("G4")),
            ..Default::default()
        };
        let mut generator = NoteGenerator::new(&config).expect("generator");
        assert_eq!(generator.next_note(), note("G4"));
        assert_eq!(generator.next_note(), note("G4"));
    }

    #[test]
    fn test_answer_is_letter() {
        assert_eq!(note("A5").answer(), Letter::A);
    }
}
