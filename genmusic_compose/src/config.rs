// Data-driven composer configuration.
//
// Every static table the generators read lives here in `ComposerConfig`:
// scale intervals, the four diatonic chord-pattern tables, the note-choice
// table per chord quality, the rhythm duration weights, the percussion groove
// presets, and the seed-buffer layout used by the orchestration layer. The
// generators take these tables by reference and never embed magic tables of
// their own, so a test or a user config can substitute any of them.
//
// `ComposerConfig::default()` reproduces the built-in tables. A config can be
// loaded from JSON (`ComposerConfig::load`) and dumped back out
// (`to_json_pretty`); loading validates it.
//
// **Determinism.** Tables feed directly into seed-driven choices. Two runs
// only produce the same score if they use the same seed *and* the same
// config.

use crate::error::{ComposeError, Result};
use crate::groove::GrooveProfile;
use crate::mode::Mode;
use crate::note::ChordQuality;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Scales
// ---------------------------------------------------------------------------

/// Scale-degree interval tables used to pick bar roots.
///
/// Both tables have eight entries. The minor table repeats degrees (3 and 5
/// appear twice), which doubles their selection weight; keep it that way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTables {
    pub major: Vec<i32>,
    pub minor: Vec<i32>,
}

impl ScaleTables {
    pub fn for_mode(&self, mode: Mode) -> &[i32] {
        match mode {
            Mode::Major => &self.major,
            Mode::Minor => &self.minor,
        }
    }
}

impl Default for ScaleTables {
    fn default() -> Self {
        ScaleTables {
            major: vec![0, 2, 4, 5, 7, 9, 11, 12],
            minor: vec![0, 2, 3, 3, 5, 5, 7, 10],
        }
    }
}

// ---------------------------------------------------------------------------
// Diatonic chord patterns
// ---------------------------------------------------------------------------

/// Where a chord sits in the progression. The last bar is the transition
/// chord that leads back to the top of the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordPosition {
    Regular,
    Transition,
}

impl ChordPosition {
    /// Position of bar `index` in a progression of `len` bars.
    pub fn of_bar(index: usize, len: usize) -> Self {
        if index + 1 == len {
            ChordPosition::Transition
        } else {
            ChordPosition::Regular
        }
    }
}

/// Voicing and declared quality for one relative root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordPattern {
    /// Semitone offsets added above the root note (0 doubles the root).
    pub intervals: Vec<i32>,
    pub quality: ChordQuality,
}

/// Relative root (0..=11 semitones above the key) → chord pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordPatternTable(pub BTreeMap<i32, ChordPattern>);

impl ChordPatternTable {
    fn from_entries(entries: Vec<(i32, Vec<i32>, ChordQuality)>) -> Self {
        ChordPatternTable(
            entries
                .into_iter()
                .map(|(root, intervals, quality)| (root, ChordPattern { intervals, quality }))
                .collect(),
        )
    }

    /// Pattern for `relative_root`. A missing entry is a configuration
    /// error, never a silent default.
    pub fn get(&self, relative_root: i32) -> Result<&ChordPattern> {
        self.0.get(&relative_root).ok_or_else(|| {
            ComposeError::config(format!(
                "chord pattern table has no entry for relative root {relative_root}"
            ))
        })
    }
}

/// The four diatonic tables, keyed by mode and chord position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordPatternTables {
    pub major: ChordPatternTable,
    pub major_transition: ChordPatternTable,
    pub minor: ChordPatternTable,
    pub minor_transition: ChordPatternTable,
}

impl ChordPatternTables {
    /// The table that applies to a chord of `mode` at `position`.
    pub fn table(&self, mode: Mode, position: ChordPosition) -> &ChordPatternTable {
        match (mode, position) {
            (Mode::Major, ChordPosition::Regular) => &self.major,
            (Mode::Major, ChordPosition::Transition) => &self.major_transition,
            (Mode::Minor, ChordPosition::Regular) => &self.minor,
            (Mode::Minor, ChordPosition::Transition) => &self.minor_transition,
        }
    }

    fn all(&self) -> [(&'static str, &ChordPatternTable); 4] {
        [
            ("major", &self.major),
            ("major_transition", &self.major_transition),
            ("minor", &self.minor),
            ("minor_transition", &self.minor_transition),
        ]
    }
}

impl Default for ChordPatternTables {
    fn default() -> Self {
        use ChordQuality::*;
        ChordPatternTables {
            major: ChordPatternTable::from_entries(vec![
                (0, vec![0, 16, 7], Major),
                (2, vec![0, 15, 7], Minor),
                (4, vec![0, 15, 7], Minor),
                (5, vec![0, 16, 7], Major),
                (7, vec![0, 16, 10], DominantSeventh),
                (9, vec![0, 15, 7, 10], MinorSixth),
                (11, vec![0, 17, 10], DominantSeventhSusFourth),
            ]),
            major_transition: ChordPatternTable::from_entries(vec![
                (0, vec![0, 17, 7], SusFourth),
                (2, vec![0, 15, 7], Minor),
                (4, vec![0, 16, 10], DominantSeventh),
                (5, vec![0, 10, 15, 19], MinorSixth),
                (7, vec![0, 16, 10], DominantSeventh),
                (9, vec![0, 15, 7, 10], Minor),
                (11, vec![0, 17, 10], DominantSeventhSusFourth),
            ]),
            minor: ChordPatternTable::from_entries(vec![
                (0, vec![0, 15, 7], Minor),
                (2, vec![0, 15, 7], Minor),
                (3, vec![0, 16, 7], Major),
                (5, vec![0, 15, 7], Minor),
                (7, vec![0, 16, 10], DominantSeventh),
                (10, vec![0, 16, 7, 11], MajorSeventh),
                (11, vec![0, 16, 7], MajorSeventh),
            ]),
            minor_transition: ChordPatternTable::from_entries(vec![
                (0, vec![0, 15, 7, 11], Minor),
                (2, vec![0, 15, 7], Minor),
                (3, vec![0, 16, 7, 11], Major),
                (5, vec![0, 10, 15, 19], MinorSixth),
                (7, vec![0, 16, 10], DominantSeventh),
                (10, vec![0, 16, 10, 21], DominantThirteenth),
                (11, vec![0, 16, 7], Major),
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Melodic note choices
// ---------------------------------------------------------------------------

/// Chord quality → weighted melodic intervals above the chord root.
///
/// Weight is expressed by repetition: an interval listed three times is
/// three times as likely to be drawn as one listed once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteChoiceTable(pub BTreeMap<ChordQuality, Vec<i32>>);

impl NoteChoiceTable {
    /// Choices for `quality`. Missing or empty entries are configuration
    /// errors.
    pub fn choices(&self, quality: ChordQuality) -> Result<&[i32]> {
        match self.0.get(&quality) {
            Some(choices) if !choices.is_empty() => Ok(choices),
            _ => Err(ComposeError::config(format!(
                "note choice table has no entries for {quality:?}"
            ))),
        }
    }
}

impl Default for NoteChoiceTable {
    fn default() -> Self {
        use ChordQuality::*;
        let entries = vec![
            (Major, vec![0, 0, 0, 4, 4, 7, 7, 2, 9, 12]),
            (Minor, vec![0, 0, 0, 3, 3, 7, 7, 2, 5, 10, 12]),
            (Diminished, vec![0, 0, 3, 3, 6, 6, 9]),
            (Augmented, vec![0, 0, 4, 4, 8, 8]),
            (DominantSeventh, vec![0, 0, 4, 4, 7, 7, 10, 10, 2]),
            (DominantThirteenth, vec![0, 0, 4, 7, 10, 10, 9, 9, 2]),
            (MajorSeventh, vec![0, 0, 4, 4, 7, 7, 11, 11, 2, 9]),
            (MinorSeventh, vec![0, 0, 3, 3, 7, 7, 10, 10, 5]),
            (HalfDiminishedSeventh, vec![0, 0, 3, 3, 6, 6, 10]),
            (DiminishedSeventh, vec![0, 0, 3, 6, 9]),
            (AugmentedSeventh, vec![0, 0, 4, 8, 10]),
            (SusSecond, vec![0, 0, 2, 2, 7, 7, 9]),
            (SusFourth, vec![0, 0, 5, 5, 7, 7, 10]),
            (DominantSeventhSusFourth, vec![0, 0, 5, 5, 7, 10, 10]),
            (DominantSeventhAltered, vec![0, 0, 4, 4, 10, 10, 1, 3, 6, 8]),
            (DominantThirteenthFlatNine, vec![0, 4, 10, 1, 9]),
            (MinorMajorSeventh, vec![0, 0, 3, 3, 7, 7, 11]),
            (MinorSixth, vec![0, 0, 3, 3, 7, 7, 9, 9]),
        ];
        NoteChoiceTable(entries.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Seed layout
// ---------------------------------------------------------------------------

/// How `score::compose` splits one seed buffer between tracks.
///
/// The first `melodic_len` bytes drive roots, rhythm, starting notes and
/// melody. Each groove profile then gets its own `groove_len`-byte slice, in
/// profile order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedLayout {
    pub melodic_len: usize,
    pub groove_len: usize,
}

impl SeedLayout {
    /// Total bytes needed for the melodic slice plus `groove_count` grooves.
    pub fn total_len(&self, groove_count: usize) -> usize {
        self.melodic_len + self.groove_len * groove_count
    }
}

impl Default for SeedLayout {
    fn default() -> Self {
        SeedLayout {
            melodic_len: 192,
            groove_len: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Everything the generators read, loaded once and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComposerConfig {
    pub scales: ScaleTables,
    pub chord_patterns: ChordPatternTables,
    pub note_choices: NoteChoiceTable,
    /// Candidate note durations in beats with integer weights.
    pub rhythm_options: Vec<(f64, u32)>,
    /// Percussion tracks generated alongside the melody, in seed order.
    pub grooves: Vec<GrooveProfile>,
    pub seed_layout: SeedLayout,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            scales: ScaleTables::default(),
            chord_patterns: ChordPatternTables::default(),
            note_choices: NoteChoiceTable::default(),
            rhythm_options: vec![(0.25, 3), (1.0, 4), (1.5, 3), (2.0, 2), (3.0, 1), (4.0, 1)],
            grooves: vec![GrooveProfile::kick(), GrooveProfile::snare(), GrooveProfile::hat()],
            seed_layout: SeedLayout::default(),
        }
    }
}

/// Failure to obtain a usable config from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ComposeError),
}

impl ComposerConfig {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: ComposerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the cross-table invariants the generators rely on.
    pub fn validate(&self) -> Result<()> {
        if self.scales.major.is_empty() || self.scales.minor.is_empty() {
            return Err(ComposeError::config("scale tables must not be empty"));
        }

        for (name, table) in self.chord_patterns.all() {
            if table.0.is_empty() {
                return Err(ComposeError::config(format!("chord pattern table {name} is empty")));
            }
            for pattern in table.0.values() {
                self.note_choices.choices(pattern.quality)?;
            }
        }

        if self.rhythm_options.is_empty() {
            return Err(ComposeError::config("rhythm options must not be empty"));
        }
        if self.rhythm_options.iter().any(|&(d, _)| d <= 0.0) {
            return Err(ComposeError::config("rhythm durations must be positive"));
        }
        if self.rhythm_options.iter().all(|&(_, w)| w == 0) {
            return Err(ComposeError::InvalidWeightTable {
                options: self.rhythm_options.len(),
            });
        }

        for profile in &self.grooves {
            profile.validate()?;
            let needed = profile.seed_bytes_needed();
            if needed > self.seed_layout.groove_len {
                return Err(ComposeError::config(format!(
                    "groove '{}' reads up to {needed} seed bytes but groove_len is {}",
                    profile.name, self.seed_layout.groove_len
                )));
            }
        }
        Ok(())
    }
}
