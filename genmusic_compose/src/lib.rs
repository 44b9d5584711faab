// GenMusic composer core.
//
// Turns a finite buffer of seed bytes plus a major/minor mode into a
// symbolic score: a four-bar diatonic chord progression, a melodic line that
// leads into each bar line, and percussion grooves. No audio is produced;
// the `Score` is plain data for a renderer. The same bytes and config always
// yield the same score.
//
// Architecture:
// - weighted.rs: Byte-driven weighted choice and probability tests
// - note.rs: `Note`, `Chord` and the 18 `ChordQuality` values
// - classify.rs: Interval analysis that infers a chord's quality
// - mode.rs: Major/minor mode, note-name parsing and display
// - config.rs: All static tables (`ComposerConfig`), JSON load/dump
// - progression.rs: Seed → bar roots → diatonic chords
// - rhythm.rs: Seed → per-bar durations with bar-line carry-over
// - melody.rs: Starting notes and the compensated melodic contour
// - groove.rs: Percussion placement with density feedback
// - score.rs: Seed partitioning and the `Score` hand-off type
// - error.rs: `ComposeError`, shared by every generator
//
// Seed bytes usually come from the `genmusic_prng` crate, but every
// generator takes `&[u8]` and does not care where they came from.

pub mod classify;
pub mod config;
pub mod error;
pub mod groove;
pub mod melody;
pub mod mode;
pub mod note;
pub mod progression;
pub mod rhythm;
pub mod score;
pub mod weighted;

pub use config::ComposerConfig;
pub use error::{ComposeError, Result};
pub use mode::Mode;
pub use note::{Chord, ChordQuality, Note};
pub use score::{Score, compose};

/// Bars in one pass of the progression.
pub const BAR_COUNT: usize = 4;

/// Times the progression (and melody) repeats in a score.
pub const LOOPS: usize = 2;

pub const BEATS_PER_BAR: f64 = 4.0;

/// MIDI pitch of the lowest C; bar roots are offsets above it.
pub const LOW_C: i32 = 24;
