// Whole-score composition from one seed buffer.
//
// `compose` is the only place that knows how the seed is partitioned. The
// melodic slice (`seed_layout.melodic_len` bytes) is consumed left to right
// through a shared cursor:
//
//   [0, BAR_COUNT)            roots
//   [BAR_COUNT, +p)           rhythm (p reported by the rhythm generator)
//   [+p, +p+BAR_COUNT)        starting notes
//   [+p+BAR_COUNT, ...)       melody, as many bytes as it has free slots
//
// Each groove profile then reads its own fixed `groove_len` slice after the
// melodic slice, in config order. Groove slices never overlap the melodic
// slice or each other, so adding a groove preset does not change the melody.
//
// The result is a `Score`: plain data that a renderer (MIDI, audio, a
// notation view) can walk without knowing anything about generation.

use crate::BAR_COUNT;
use crate::config::ComposerConfig;
use crate::error::{ComposeError, Result};
use crate::groove::generate_groove;
use crate::melody::{generate_melody, generate_starting_notes};
use crate::mode::Mode;
use crate::note::{Chord, Note};
use crate::progression::{chord_track, generate_chords, generate_roots};
use crate::rhythm::{Rhythm, generate_rhythm};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One named percussion track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrooveTrack {
    pub name: String,
    pub notes: Vec<Note>,
}

/// A finished composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub mode: Mode,
    /// Tonic pitch class, 0 = C.
    pub key: i32,
    /// Bar roots in semitones above C, before the `LOW_C` offset.
    pub roots: Vec<i32>,
    /// `BAR_COUNT * LOOPS` chords in time order.
    pub chords: Vec<Chord>,
    pub rhythm: Rhythm,
    pub melody: Vec<Note>,
    pub grooves: Vec<GrooveTrack>,
}

impl Score {
    /// All chord notes as one flat track.
    pub fn chord_notes(&self) -> Vec<Note> {
        chord_track(&self.chords)
    }

    /// Beat at which the last note of any track ends.
    pub fn total_beats(&self) -> f64 {
        let chords = self.chords.iter().flat_map(|c| c.notes().iter());
        let grooves = self.grooves.iter().flat_map(|g| g.notes.iter());
        chords
            .chain(self.melody.iter())
            .chain(grooves)
            .map(Note::end_beat)
            .fold(0.0, f64::max)
    }

    /// The score shifted by `semitones`. Pitched material (roots, chords,
    /// melody) moves; percussion pitches select instruments and stay put.
    pub fn transposed(&self, semitones: i32) -> Score {
        Score {
            mode: self.mode,
            key: (self.key + semitones).rem_euclid(12),
            roots: self.roots.iter().map(|r| r + semitones).collect(),
            chords: self.chords.iter().map(|c| c.transposed(semitones)).collect(),
            rhythm: self.rhythm.clone(),
            melody: self.melody.iter().map(|n| n.transposed(semitones)).collect(),
            grooves: self.grooves.clone(),
        }
    }

    /// Transpose by the smallest upward shift that puts the tonic on
    /// `pitch_class`.
    pub fn in_key(&self, pitch_class: i32) -> Score {
        self.transposed((pitch_class - self.key).rem_euclid(12))
    }
}

fn seed_slice<'a>(seed: &'a [u8], range: Range<usize>, stage: &'static str) -> Result<&'a [u8]> {
    let end = range.end;
    seed.get(range).ok_or(ComposeError::SeedExhausted {
        stage,
        needed: end,
        available: seed.len(),
    })
}

/// Compose a full score from `seed` in `mode`.
///
/// `seed` must hold at least `config.seed_layout.total_len(grooves)` bytes.
pub fn compose(seed: &[u8], mode: Mode, config: &ComposerConfig) -> Result<Score> {
    config.validate()?;
    let layout = &config.seed_layout;
    let needed = layout.total_len(config.grooves.len());
    if seed.len() < needed {
        return Err(ComposeError::SeedExhausted {
            stage: "seed layout",
            needed,
            available: seed.len(),
        });
    }

    let melodic = seed_slice(seed, 0..layout.melodic_len, "melodic slice")?;

    let roots = generate_roots(melodic, mode, &config.scales)?;
    let chords = generate_chords(&roots, mode, &config.chord_patterns)?;
    log::debug!("cursor {BAR_COUNT}: roots and chords done");

    let rhythm_seed = melodic.get(BAR_COUNT..).unwrap_or_default();
    let (consumed, rhythm) = generate_rhythm(rhythm_seed, &config.rhythm_options)?;
    log::debug!("cursor {}: rhythm done", BAR_COUNT + consumed);

    let start_seed = rhythm_seed.get(consumed..).unwrap_or_default();
    let starting = generate_starting_notes(start_seed, &chords, &roots, &config.note_choices)?;

    let melody_seed = start_seed.get(BAR_COUNT..).unwrap_or_default();
    log::debug!("cursor {}: melody starts", BAR_COUNT + consumed + BAR_COUNT);
    let melody = generate_melody(
        melody_seed,
        &chords,
        &rhythm,
        &starting,
        &roots,
        &config.note_choices,
    )?;

    let mut grooves = Vec::with_capacity(config.grooves.len());
    for (k, profile) in config.grooves.iter().enumerate() {
        let start = layout.melodic_len + k * layout.groove_len;
        let slice = seed_slice(seed, start..start + layout.groove_len, "groove slice")?;
        log::debug!("groove {} reads seed[{start}..{}]", profile.name, start + layout.groove_len);
        grooves.push(GrooveTrack {
            name: profile.name.clone(),
            notes: generate_groove(profile, slice)?,
        });
    }

    Ok(Score {
        mode,
        key: roots[0],
        roots,
        chords,
        rhythm,
        melody,
        grooves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LOOPS;
    use crate::rhythm::slot_count;

    fn seed() -> Vec<u8> {
        genmusic_prng::seed_bytes(384, "score tests")
    }

    #[test]
    fn test_compose_shapes() {
        let config = ComposerConfig::default();
        let score = compose(&seed(), Mode::Major, &config).unwrap();
        assert_eq!(score.roots.len(), BAR_COUNT);
        assert_eq!(score.chords.len(), BAR_COUNT * LOOPS);
        assert_eq!(score.rhythm.len(), BAR_COUNT);
        assert_eq!(score.melody.len(), LOOPS * slot_count(&score.rhythm));
        let names: Vec<&str> = score.grooves.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["kick", "snare", "hat"]);
        assert_eq!(score.key, score.roots[0]);
        assert!((0..12).contains(&score.key));
    }

    #[test]
    fn test_roots_come_from_first_bytes() {
        let config = ComposerConfig::default();
        let mut s = seed();
        s[0] = 7;
        let score = compose(&s, Mode::Minor, &config).unwrap();
        assert_eq!(score.key, 7);
        assert_eq!(score.roots, generate_roots(&s[..4], Mode::Minor, &config.scales).unwrap());
    }

    #[test]
    fn test_groove_slices_are_independent_of_melody() {
        let config = ComposerConfig::default();
        let a = seed();
        let mut b = a.clone();
        // Alter only the hat slice.
        let hat_start = config.seed_layout.melodic_len + 2 * config.seed_layout.groove_len;
        for byte in &mut b[hat_start..] {
            *byte = byte.wrapping_add(1);
        }
        let sa = compose(&a, Mode::Major, &config).unwrap();
        let sb = compose(&b, Mode::Major, &config).unwrap();
        assert_eq!(sa.melody, sb.melody);
        assert_eq!(sa.chords, sb.chords);
        assert_eq!(sa.grooves[0], sb.grooves[0]);
        assert_eq!(sa.grooves[1], sb.grooves[1]);
    }

    #[test]
    fn test_short_seed_is_rejected() {
        let config = ComposerConfig::default();
        let err = compose(&seed()[..100], Mode::Major, &config).unwrap_err();
        assert_eq!(
            err,
            ComposeError::SeedExhausted {
                stage: "seed layout",
                needed: 384,
                available: 100
            }
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ComposerConfig::default();
        config.scales.minor.clear();
        assert!(matches!(
            compose(&seed(), Mode::Minor, &config),
            Err(ComposeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_transpose_moves_pitched_tracks_only() {
        let config = ComposerConfig::default();
        let score = compose(&seed(), Mode::Major, &config).unwrap();
        let up = score.transposed(5);
        assert_eq!(up.key, (score.key + 5) % 12);
        assert_eq!(up.roots[1], score.roots[1] + 5);
        assert_eq!(up.melody[0].pitch, score.melody[0].pitch + 5);
        assert_eq!(up.chords[0].root().pitch, score.chords[0].root().pitch + 5);
        assert_eq!(up.chords[0].quality(), score.chords[0].quality());
        assert_eq!(up.grooves, score.grooves);
        assert_eq!(up.total_beats(), score.total_beats());
    }

    #[test]
    fn test_in_key() {
        let config = ComposerConfig::default();
        let score = compose(&seed(), Mode::Major, &config).unwrap();
        for pc in 0..12 {
            let moved = score.in_key(pc);
            assert_eq!(moved.key, pc);
            let shift = moved.melody[0].pitch - score.melody[0].pitch;
            assert!((0..12).contains(&shift));
        }
    }

    #[test]
    fn test_total_beats_covers_loops() {
        let config = ComposerConfig::default();
        let score = compose(&seed(), Mode::Major, &config).unwrap();
        // Chords fill every bar of every loop; a late groove hit may ring on.
        let chord_notes = score.chord_notes();
        assert_eq!(chord_notes.len(), score.chords.iter().map(|c| c.notes().len()).sum::<usize>());
        let chord_end = chord_notes.iter().map(Note::end_beat).fold(0.0, f64::max);
        assert_eq!(chord_end, 32.0);
        assert_eq!(score.melody.last().unwrap().end_beat(), 32.0);
        assert!(score.total_beats() >= 32.0 && score.total_beats() <= 34.0);
    }

    #[test]
    fn test_score_serializes() {
        let config = ComposerConfig::default();
        let score = compose(&seed(), Mode::Minor, &config).unwrap();
        let json = serde_json::to_string(&score).unwrap();
        let restored: Score = serde_json::from_str(&json).unwrap();
        assert_eq!(score, restored);
    }
}
