//! Pitch spelling, scale patterns, and staff geometry.
//!
//! Everything in this module is pure: a [`ScaleSpec`] derives its note
//! sequence from its scale type and starting pitch alone, and staff placement
//! derives from the clef. Renderers consume [`StaffNote`] lists rather than
//! computing positions themselves.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Number of letter names in the musical alphabet.
pub const LETTERS_PER_OCTAVE: i32 = 7;

/// Number of semitones spanned by one octave.
pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Staff position of the top line, measured in diatonic steps above the bottom line.
pub const STAFF_TOP_LINE: i32 = 8;

/// Highest octave considered when enumerating starting notes.
pub const MAX_OCTAVE: i8 = 8;

/// Letter names of the musical alphabet, ordered from C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    /// The note C.
    C,
    /// The note D.
    D,
    /// The note E.
    E,
    /// The note F.
    F,
    /// The note G.
    G,
    /// The note A.
    A,
    /// The note B.
    B,
}

impl Letter {
    /// Every letter in ascending order starting from C.
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Zero-based position of the letter within an octave starting at C.
    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Self::C => 0,
            Self::D => 1,
            Self::E => 2,
            Self::F => 3,
            Self::G => 4,
            Self::A => 5,
            Self::B => 6,
        }
    }

    /// Resolves a letter from an index, wrapping around the octave.
    #[must_use]
    pub const fn from_index(index: i32) -> Self {
        match index.rem_euclid(LETTERS_PER_OCTAVE) {
            0 => Self::C,
            1 => Self::D,
            2 => Self::E,
            3 => Self::F,
            4 => Self::G,
            5 => Self::A,
            _ => Self::B,
        }
    }

    /// Semitone offset of the unaltered letter above C.
    #[must_use]
    pub const fn natural_semitone(self) -> i32 {
        match self {
            Self::C => 0,
            Self::D => 2,
            Self::E => 4,
            Self::F => 5,
            Self::G => 7,
            Self::A => 9,
            Self::B => 11,
        }
    }

    /// Character used when printing the letter.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::A => 'A',
            Self::B => 'B',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|letter| letter.symbol() == symbol.to_ascii_uppercase())
    }
}

/// Spelled pitch: letter, signed accidental count, and octave.
///
/// Octaves follow scientific pitch notation, so the octave number increments
/// between B and C and `C4` is middle C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    letter: Letter,
    accidental: i8,
    octave: i8,
}

impl Pitch {
    /// Creates a new pitch. Positive accidentals are sharps, negative are flats.
    #[must_use]
    pub const fn new(letter: Letter, accidental: i8, octave: i8) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    /// Letter name of the pitch.
    #[must_use]
    pub const fn letter(&self) -> Letter {
        self.letter
    }

    /// Signed accidental count: `+1` sharp, `-1` flat, `0` natural.
    #[must_use]
    pub const fn accidental(&self) -> i8 {
        self.accidental
    }

    /// Octave number in scientific pitch notation.
    #[must_use]
    pub const fn octave(&self) -> i8 {
        self.octave
    }

    /// Absolute semitone number, with `C-1` at zero.
    #[must_use]
    pub const fn semitone(&self) -> i32 {
        (self.octave as i32 + 1) * SEMITONES_PER_OCTAVE
            + self.letter.natural_semitone()
            + self.accidental as i32
    }

    /// Absolute diatonic step number, ignoring accidentals.
    #[must_use]
    pub const fn diatonic_index(&self) -> i32 {
        self.octave as i32 * LETTERS_PER_OCTAVE + self.letter.index()
    }

    /// Returns the pitch `semitones` higher, spelled `letter_steps` letters higher.
    #[must_use]
    pub fn spelled_above(&self, semitones: i32, letter_steps: i32) -> Self {
        let diatonic = self.diatonic_index() + letter_steps;
        let letter = Letter::from_index(diatonic);
        let octave = diatonic.div_euclid(LETTERS_PER_OCTAVE);
        let natural = (octave + 1) * SEMITONES_PER_OCTAVE + letter.natural_semitone();
        let target = self.semitone() + semitones;
        Self::new(letter, (target - natural) as i8, octave as i8)
    }

    /// Returns the same spelling one octave higher.
    #[must_use]
    pub const fn octave_above(&self) -> Self {
        Self::new(self.letter, self.accidental, self.octave + 1)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.symbol())?;
        let symbol = if self.accidental > 0 { '#' } else { 'b' };
        for _ in 0..self.accidental.unsigned_abs() {
            write!(f, "{symbol}")?;
        }
        write!(f, "{}", self.octave)
    }
}

/// Failure to parse a pitch such as `F#4` or `Bb3`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid pitch `{0}`; expected a letter, optional accidentals, and an octave")]
pub struct ParsePitchError(String);

impl FromStr for Pitch {
    type Err = ParsePitchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePitchError(value.to_owned());
        let mut chars = value.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_symbol)
            .ok_or_else(invalid)?;

        let rest = chars.as_str();
        let digits_start = rest
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .ok_or_else(invalid)?;
        let (accidentals, octave) = rest.split_at(digits_start);

        let mut accidental: i8 = 0;
        for symbol in accidentals.chars() {
            let step = match symbol {
                '#' => 1,
                'b' => -1,
                _ => return Err(invalid()),
            };
            accidental = accidental.checked_add(step).ok_or_else(invalid)?;
        }
        let octave = octave.parse::<i8>().map_err(|_| invalid())?;
        Ok(Self::new(letter, accidental, octave))
    }
}

/// Named interval patterns the player learns to recognise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    /// Major scale, `WWHWWWH`.
    Major,
    /// Natural minor scale, `WHWWHWW`.
    NaturalMinor,
    /// Harmonic minor scale, `WHWWH3H`.
    HarmonicMinor,
    /// Ascending melodic minor scale, `WHWWWWH`.
    MelodicMinor,
    /// Ionian church mode, identical in shape to major.
    Ionian,
    /// Dorian church mode, `WHWWWHW`.
    Dorian,
    /// Phrygian church mode, `HWWWHWW`.
    Phrygian,
    /// Lydian church mode, `WWWHWWH`.
    Lydian,
    /// Mixolydian church mode, `WWHWWHW`.
    Mixolydian,
    /// Aeolian church mode, identical in shape to natural minor.
    Aeolian,
    /// Locrian church mode, `HWWHWWW`.
    Locrian,
    /// Six-note whole tone scale, `WWWWWW`.
    WholeTone,
}

impl ScaleType {
    /// Every supported scale type.
    pub const ALL: [ScaleType; 12] = [
        ScaleType::Major,
        ScaleType::NaturalMinor,
        ScaleType::HarmonicMinor,
        ScaleType::MelodicMinor,
        ScaleType::Ionian,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::Aeolian,
        ScaleType::Locrian,
        ScaleType::WholeTone,
    ];

    /// Semitone steps between consecutive notes; always sums to one octave.
    #[must_use]
    pub const fn steps(self) -> &'static [u8] {
        match self {
            Self::Major | Self::Ionian => &[2, 2, 1, 2, 2, 2, 1],
            Self::NaturalMinor | Self::Aeolian => &[2, 1, 2, 2, 1, 2, 2],
            Self::HarmonicMinor => &[2, 1, 2, 2, 1, 3, 1],
            Self::MelodicMinor => &[2, 1, 2, 2, 2, 2, 1],
            Self::Dorian => &[2, 1, 2, 2, 2, 1, 2],
            Self::Phrygian => &[1, 2, 2, 2, 1, 2, 2],
            Self::Lydian => &[2, 2, 2, 1, 2, 2, 1],
            Self::Mixolydian => &[2, 2, 1, 2, 2, 1, 2],
            Self::Locrian => &[1, 2, 2, 1, 2, 2, 2],
            Self::WholeTone => &[2, 2, 2, 2, 2, 2],
        }
    }

    /// Number of notes in the rendered scale, including the closing octave.
    #[must_use]
    pub const fn note_count(self) -> usize {
        self.steps().len() + 1
    }

    /// Whether every step advances exactly one letter name.
    #[must_use]
    pub const fn is_heptatonic(self) -> bool {
        self.steps().len() == LETTERS_PER_OCTAVE as usize
    }

    /// Keyboard key that guesses this scale type.
    #[must_use]
    pub const fn guess_key(self) -> char {
        match self {
            Self::Major => 'q',
            Self::NaturalMinor => 'w',
            Self::HarmonicMinor => 'e',
            Self::MelodicMinor => 'r',
            Self::WholeTone => 't',
            Self::Ionian => '1',
            Self::Dorian => '2',
            Self::Phrygian => '3',
            Self::Lydian => '4',
            Self::Mixolydian => '5',
            Self::Aeolian => '6',
            Self::Locrian => '7',
        }
    }

    /// Resolves the scale type bound to a guess key, ignoring letter case.
    #[must_use]
    pub fn from_guess_key(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.guess_key() == key)
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Major => "Major",
            Self::NaturalMinor => "Natural Minor",
            Self::HarmonicMinor => "Harmonic Minor",
            Self::MelodicMinor => "Melodic Minor",
            Self::Ionian => "Ionian",
            Self::Dorian => "Dorian",
            Self::Phrygian => "Phrygian",
            Self::Lydian => "Lydian",
            Self::Mixolydian => "Mixolydian",
            Self::Aeolian => "Aeolian",
            Self::Locrian => "Locrian",
            Self::WholeTone => "Whole Tone",
        }
    }

    /// Reports whether two scale types share an interval pattern and therefore
    /// look identical on the staff.
    #[must_use]
    pub fn sounds_like(self, other: ScaleType) -> bool {
        self.steps() == other.steps()
    }

    /// Degree of the major scale on which this mode starts, if it is a mode of major.
    const fn major_degree(self) -> Option<usize> {
        match self {
            Self::Major | Self::Ionian => Some(0),
            Self::Dorian => Some(1),
            Self::Phrygian => Some(2),
            Self::Lydian => Some(3),
            Self::Mixolydian => Some(4),
            Self::NaturalMinor | Self::HarmonicMinor | Self::MelodicMinor | Self::Aeolian => {
                Some(5)
            }
            Self::Locrian => Some(6),
            Self::WholeTone => None,
        }
    }

    /// Tonic of this scale type under the given key signature, without an octave.
    ///
    /// Returns `None` for scale types that are not tied to key signatures.
    #[must_use]
    pub fn tonic_in(self, signature: KeySignature) -> Option<(Letter, i8)> {
        const MAJOR_OFFSETS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
        let degree = self.major_degree()?;
        let (letter, accidental) = signature.major_tonic();
        let tonic = Pitch::new(letter, accidental, 4)
            .spelled_above(MAJOR_OFFSETS[degree], degree as i32);
        Some((tonic.letter(), tonic.accidental()))
    }

    /// Starting spellings, each paired with the key signature it is written in.
    #[must_use]
    pub fn starting_spellings(self, signatures: KeySignatureRange) -> Vec<(Letter, i8, KeySignature)> {
        if self.major_degree().is_none() {
            return Letter::ALL
                .into_iter()
                .flat_map(|letter| [-1, 0, 1].map(|accidental| (letter, accidental)))
                .filter(|&(letter, accidental)| {
                    !matches!(
                        (letter, accidental),
                        (Letter::E | Letter::B, 1) | (Letter::F | Letter::C, -1)
                    )
                })
                .map(|(letter, accidental)| (letter, accidental, KeySignature::NONE))
                .collect();
        }

        signatures
            .iter()
            .filter_map(|signature| {
                self.tonic_in(signature)
                    .map(|(letter, accidental)| (letter, accidental, signature))
            })
            .collect()
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Count of sharps (positive) or flats (negative) in a key signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySignature(i8);

impl KeySignature {
    /// Largest number of sharps or flats a key signature may carry.
    pub const MAX_ACCIDENTALS: i8 = 7;

    /// Key signature without sharps or flats.
    pub const NONE: KeySignature = KeySignature(0);

    /// Letters in the order sharps are added to a key signature.
    pub const ORDER_OF_SHARPS: [Letter; 7] = [
        Letter::F,
        Letter::C,
        Letter::G,
        Letter::D,
        Letter::A,
        Letter::E,
        Letter::B,
    ];

    /// Creates a key signature from a signed sharp/flat count.
    #[must_use]
    pub const fn new(sharps_flats: i8) -> Self {
        Self(sharps_flats)
    }

    /// Signed sharp/flat count.
    #[must_use]
    pub const fn sharps_flats(&self) -> i8 {
        self.0
    }

    /// Accidental the signature applies to every note with the given letter.
    #[must_use]
    pub fn accidental_for(&self, letter: Letter) -> i8 {
        let count = usize::from(self.0.unsigned_abs());
        if self.0 > 0 {
            i8::from(Self::ORDER_OF_SHARPS[..count].contains(&letter))
        } else {
            -i8::from(Self::ORDER_OF_SHARPS.iter().rev().take(count).any(|flat| *flat == letter))
        }
    }

    /// Tonic of the major key written with this signature.
    #[must_use]
    pub fn major_tonic(&self) -> (Letter, i8) {
        let fifths = i32::from(self.0);
        let letter = Letter::from_index(fifths * 4);
        let semitone = (fifths * 7).rem_euclid(SEMITONES_PER_OCTAVE);
        let mut accidental = semitone - letter.natural_semitone();
        if accidental > 6 {
            accidental -= SEMITONES_PER_OCTAVE;
        } else if accidental < -6 {
            accidental += SEMITONES_PER_OCTAVE;
        }
        (letter, accidental as i8)
    }
}

/// Inclusive range of key signatures scales may be written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySignatureRange {
    /// Lowest signature allowed; negative values count flats.
    pub lowest: i8,
    /// Highest signature allowed; positive values count sharps.
    pub highest: i8,
}

impl KeySignatureRange {
    /// Range admitting up to `max_flats` flats and `max_sharps` sharps.
    #[must_use]
    pub const fn from_limits(max_flats: u8, max_sharps: u8) -> Self {
        Self {
            lowest: -(max_flats as i8),
            highest: max_sharps as i8,
        }
    }

    /// Range admitting exactly one key signature.
    #[must_use]
    pub const fn single(sharps_flats: i8) -> Self {
        Self {
            lowest: sharps_flats,
            highest: sharps_flats,
        }
    }

    /// Whether both ends lie within the representable signatures and are ordered.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.lowest <= self.highest
            && self.lowest >= -KeySignature::MAX_ACCIDENTALS
            && self.highest <= KeySignature::MAX_ACCIDENTALS
    }

    /// Iterates over every signature in the range, flats first.
    pub fn iter(&self) -> impl Iterator<Item = KeySignature> {
        (self.lowest..=self.highest).map(KeySignature::new)
    }
}

impl Default for KeySignatureRange {
    fn default() -> Self {
        Self::from_limits(4, 4)
    }
}

/// Staff notation reference that maps pitches onto lines and spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clef {
    /// G clef on the second line.
    Treble,
    /// F clef on the fourth line.
    Bass,
    /// C clef on the middle line.
    Alto,
    /// C clef on the fourth line.
    Tenor,
    /// C clef on the top line.
    Baritone,
    /// C clef on the second line.
    MezzoSoprano,
    /// C clef on the bottom line.
    Soprano,
}

impl Clef {
    /// Every supported clef.
    pub const ALL: [Clef; 7] = [
        Clef::Treble,
        Clef::Bass,
        Clef::Alto,
        Clef::Tenor,
        Clef::Baritone,
        Clef::MezzoSoprano,
        Clef::Soprano,
    ];

    /// Pitch sitting on the bottom staff line.
    #[must_use]
    pub const fn bottom_line(self) -> Pitch {
        match self {
            Self::Treble => Pitch::new(Letter::E, 0, 4),
            Self::Bass => Pitch::new(Letter::G, 0, 2),
            Self::Alto => Pitch::new(Letter::F, 0, 3),
            Self::Tenor => Pitch::new(Letter::D, 0, 3),
            Self::Baritone => Pitch::new(Letter::B, 0, 2),
            Self::MezzoSoprano => Pitch::new(Letter::A, 0, 3),
            Self::Soprano => Pitch::new(Letter::C, 0, 4),
        }
    }

    /// Diatonic steps between the bottom line and the pitch; 0 is the bottom
    /// line and [`STAFF_TOP_LINE`] the top line.
    #[must_use]
    pub const fn staff_position(self, pitch: &Pitch) -> i32 {
        pitch.diatonic_index() - self.bottom_line().diatonic_index()
    }
}

/// Number of ledger lines needed to draw a note at the given staff position.
#[must_use]
pub const fn ledger_lines_at(position: i32) -> u32 {
    if position < 0 {
        (-position / 2) as u32
    } else if position > STAFF_TOP_LINE {
        ((position - STAFF_TOP_LINE) / 2) as u32
    } else {
        0
    }
}

/// Ledger lines a scale needs below and above the staff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LedgerSpan {
    /// Ledger lines required beneath the bottom staff line.
    pub below: u32,
    /// Ledger lines required above the top staff line.
    pub above: u32,
}

impl LedgerSpan {
    /// Whether neither side exceeds the provided bound.
    #[must_use]
    pub const fn fits_within(&self, max_ledger_lines: u32) -> bool {
        self.below <= max_ledger_lines && self.above <= max_ledger_lines
    }
}

/// Renderable placement of a single note on the staff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StaffNote {
    /// Diatonic steps above the bottom staff line; negative values sit below it.
    pub position: i32,
    /// Accidental to print before the note head, `Some(0)` for a natural sign.
    /// `None` when the key signature already implies the accidental.
    pub accidental: Option<i8>,
}

/// Immutable description of a scale carried by a boulder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScaleSpec {
    scale_type: ScaleType,
    starting_note: Pitch,
    clef: Clef,
    key_signature: KeySignature,
    notes: Vec<Pitch>,
}

impl ScaleSpec {
    /// Creates a scale, deriving its note sequence from the type and start.
    #[must_use]
    pub fn new(
        scale_type: ScaleType,
        starting_note: Pitch,
        clef: Clef,
        key_signature: KeySignature,
    ) -> Self {
        Self {
            scale_type,
            starting_note,
            clef,
            key_signature,
            notes: note_sequence(scale_type, starting_note),
        }
    }

    /// Interval pattern the player must identify.
    #[must_use]
    pub const fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// First note of the scale.
    #[must_use]
    pub const fn starting_note(&self) -> Pitch {
        self.starting_note
    }

    /// Clef the scale is written on.
    #[must_use]
    pub const fn clef(&self) -> Clef {
        self.clef
    }

    /// Key signature the scale is written in.
    #[must_use]
    pub const fn key_signature(&self) -> KeySignature {
        self.key_signature
    }

    /// Ordered pitches of the scale, ending on the octave above the start.
    #[must_use]
    pub fn note_sequence(&self) -> &[Pitch] {
        &self.notes
    }

    /// Ledger lines needed to draw the scale on its clef.
    #[must_use]
    pub fn ledger_span(&self) -> LedgerSpan {
        self.notes
            .iter()
            .map(|pitch| self.clef.staff_position(pitch))
            .fold(LedgerSpan::default(), |span, position| {
                if position < 0 {
                    LedgerSpan {
                        below: span.below.max(ledger_lines_at(position)),
                        ..span
                    }
                } else {
                    LedgerSpan {
                        above: span.above.max(ledger_lines_at(position)),
                        ..span
                    }
                }
            })
    }

    /// Whether the scale can be drawn within `max_ledger_lines` on either side.
    #[must_use]
    pub fn fits(&self, max_ledger_lines: u32) -> bool {
        self.ledger_span().fits_within(max_ledger_lines)
    }

    /// Staff placement of every note, with accidentals relative to the key signature.
    #[must_use]
    pub fn staff_notes(&self) -> Vec<StaffNote> {
        self.notes
            .iter()
            .map(|pitch| {
                let implied = self.key_signature.accidental_for(pitch.letter());
                StaffNote {
                    position: self.clef.staff_position(pitch),
                    accidental: (pitch.accidental() != implied).then_some(pitch.accidental()),
                }
            })
            .collect()
    }
}

impl fmt::Display for ScaleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}:", self.scale_type, self.starting_note)?;
        for pitch in &self.notes {
            write!(f, " {pitch}")?;
        }
        Ok(())
    }
}

/// Spells every note of a scale starting on `start`.
///
/// Heptatonic scales take one letter per step. Other scales take the next
/// letter or the one after it, whichever needs fewer accidentals. The final
/// note is always the start one octave higher.
#[must_use]
pub fn note_sequence(scale_type: ScaleType, start: Pitch) -> Vec<Pitch> {
    let steps = scale_type.steps();
    let mut notes = Vec::with_capacity(steps.len() + 1);
    notes.push(start);

    let mut current = start;
    for (index, step) in steps.iter().enumerate() {
        let step = i32::from(*step);
        let next = if index + 1 == steps.len() {
            start.octave_above()
        } else if scale_type.is_heptatonic() {
            current.spelled_above(step, 1)
        } else {
            let adjacent = current.spelled_above(step, 1);
            let skipped = current.spelled_above(step, 2);
            if skipped.accidental().unsigned_abs() < adjacent.accidental().unsigned_abs() {
                skipped
            } else {
                adjacent
            }
        };
        notes.push(next);
        current = next;
    }
    notes
}
