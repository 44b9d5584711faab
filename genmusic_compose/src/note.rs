// Timed pitched events and the chords built from them.
//
// `Note` is the hand-off unit of every generator: a MIDI-style semitone
// number, an onset and a duration in beats, and a velocity. Notes are plain
// `Copy` values; generators create them and never mutate them afterwards.
//
// `Chord` groups notes that start together. Its first note is the root event
// whose pitch and timing anchor the chord. The chord also carries a
// `ChordQuality`, either declared by whoever built it (authoritative, as the
// progression builder does) or inferred from its notes by classify.rs. The
// two can disagree; `Chord::quality` returns the stored one and
// `Chord::classified_quality` always re-runs the classifier.
//
// See also: progression.rs (builds chords), melody.rs (reads note choices
// through `Chord::note_choices`), config.rs (the `NoteChoiceTable`).

use crate::classify::classify_notes;
use crate::config::NoteChoiceTable;
use crate::error::{ComposeError, Result};
use serde::{Deserialize, Serialize};

/// Velocity assigned to every generated note.
pub const DEFAULT_VELOCITY: f32 = 0.5;

/// A single timed, pitched event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Semitone number (MIDI numbering, 60 = middle C).
    pub pitch: i32,
    /// Onset in beats from the start of the score.
    pub start_beat: f64,
    /// Length in beats, always positive.
    pub duration_beats: f64,
    /// Loudness in [0, 1].
    pub velocity: f32,
}

impl Note {
    /// A note at the default velocity.
    pub fn new(pitch: i32, start_beat: f64, duration_beats: f64) -> Self {
        Note {
            pitch,
            start_beat,
            duration_beats,
            velocity: DEFAULT_VELOCITY,
        }
    }

    /// Beat at which the note stops sounding.
    pub fn end_beat(&self) -> f64 {
        self.start_beat + self.duration_beats
    }

    /// Same event, shifted by `semitones`.
    pub fn transposed(&self, semitones: i32) -> Note {
        Note {
            pitch: self.pitch + semitones,
            ..*self
        }
    }
}

/// Harmonic quality of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    DominantSeventh,
    DominantThirteenth,
    MajorSeventh,
    MinorSeventh,
    HalfDiminishedSeventh,
    DiminishedSeventh,
    AugmentedSeventh,
    SusSecond,
    SusFourth,
    DominantSeventhSusFourth,
    DominantSeventhAltered,
    DominantThirteenthFlatNine,
    MinorMajorSeventh,
    MinorSixth,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 18] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::DominantSeventh,
        ChordQuality::DominantThirteenth,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::HalfDiminishedSeventh,
        ChordQuality::DiminishedSeventh,
        ChordQuality::AugmentedSeventh,
        ChordQuality::SusSecond,
        ChordQuality::SusFourth,
        ChordQuality::DominantSeventhSusFourth,
        ChordQuality::DominantSeventhAltered,
        ChordQuality::DominantThirteenthFlatNine,
        ChordQuality::MinorMajorSeventh,
        ChordQuality::MinorSixth,
    ];
}

/// A group of notes sharing an onset, root first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChordFields")]
pub struct Chord {
    notes: Vec<Note>,
    quality: ChordQuality,
}

/// Wire shape of a `Chord`; deserialized chords pass through
/// `Chord::with_quality` so an empty note list is rejected.
#[derive(Deserialize)]
struct ChordFields {
    notes: Vec<Note>,
    quality: ChordQuality,
}

impl TryFrom<ChordFields> for Chord {
    type Error = ComposeError;

    fn try_from(fields: ChordFields) -> Result<Self> {
        Chord::with_quality(fields.notes, fields.quality)
    }
}

impl Chord {
    /// Build from a root note plus one sibling per interval.
    ///
    /// Siblings share the root's onset, duration and velocity. An interval
    /// of 0 adds a second copy of the root; the diatonic tables rely on this
    /// to double the root in the voicing.
    pub fn from_intervals(root: Note, quality: ChordQuality, intervals: &[i32]) -> Self {
        let mut notes = Vec::with_capacity(intervals.len() + 1);
        notes.push(root);
        notes.extend(intervals.iter().map(|&i| root.transposed(i)));
        Chord { notes, quality }
    }

    /// Build from explicit notes with a declared quality.
    pub fn with_quality(notes: Vec<Note>, quality: ChordQuality) -> Result<Self> {
        if notes.is_empty() {
            return Err(ComposeError::config("a chord needs at least one note"));
        }
        Ok(Chord { notes, quality })
    }

    /// Build from explicit notes, inferring the quality by interval analysis.
    pub fn inferred(notes: Vec<Note>) -> Result<Self> {
        if notes.is_empty() {
            return Err(ComposeError::config("a chord needs at least one note"));
        }
        let quality = classify_notes(&notes);
        Ok(Chord { notes, quality })
    }

    /// The root event.
    pub fn root(&self) -> &Note {
        &self.notes[0]
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The stored quality (declared at construction, or inferred then).
    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    /// Quality as the interval classifier sees the current notes.
    pub fn classified_quality(&self) -> ChordQuality {
        classify_notes(&self.notes)
    }

    /// Same chord, every note shifted by `semitones`. The stored quality is
    /// kept as declared.
    pub fn transposed(&self, semitones: i32) -> Chord {
        Chord {
            notes: self.notes.iter().map(|n| n.transposed(semitones)).collect(),
            quality: self.quality,
        }
    }

    /// Weighted melodic intervals (relative to the chord root) available
    /// over this chord.
    pub fn note_choices<'a>(&self, table: &'a NoteChoiceTable) -> Result<&'a [i32]> {
        table.choices(self.quality)
    }
}
