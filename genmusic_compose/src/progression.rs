// Root progression and diatonic chord building.
//
// `generate_roots` turns the first `BAR_COUNT` seed bytes into one root per
// bar: byte 0 fixes the key, every later byte picks a scale degree above it.
// Roots are *not* wrapped to an octave; a major-scale degree of 12 yields a
// root an octave above the key.
//
// `generate_chords` voices those roots for `LOOPS` repetitions. Each bar's
// root is measured against the key (mod 12) and looked up in one of four
// diatonic tables chosen by mode and by whether the bar is the transition
// chord leading back to the top of the loop. The table supplies both the
// voicing and the declared chord quality; the declared quality is stored on
// the chord as-is even where the interval classifier would read the voicing
// differently.

use crate::config::{ChordPatternTables, ChordPosition, ScaleTables};
use crate::error::{ComposeError, Result, seed_byte};
use crate::mode::Mode;
use crate::note::{Chord, Note};
use crate::{BAR_COUNT, BEATS_PER_BAR, LOOPS, LOW_C};

/// Derive `BAR_COUNT` bar roots from the seed.
///
/// `root[0] = seed[0] % 12` is the key. For `b > 0`,
/// `root[b] = key + scale[seed[b] % scale.len()]`.
pub fn generate_roots(seed: &[u8], mode: Mode, scales: &ScaleTables) -> Result<Vec<i32>> {
    let scale = scales.for_mode(mode);
    if scale.is_empty() {
        return Err(ComposeError::config(format!("{mode} scale table is empty")));
    }

    let key = (seed_byte(seed, 0, "roots")? % 12) as i32;
    let mut roots = Vec::with_capacity(BAR_COUNT);
    roots.push(key);
    for b in 1..BAR_COUNT {
        let degree = seed_byte(seed, b, "roots")? as usize % scale.len();
        roots.push(key + scale[degree]);
    }

    log::debug!("roots ({mode}): {roots:?}");
    Ok(roots)
}

/// Root distance from the key, folded into 0..=11.
pub fn relative_root(root: i32, key: i32) -> i32 {
    (root - key).rem_euclid(12)
}

/// Voice `roots` into `LOOPS * roots.len()` chords, one per bar per loop.
///
/// The chord for bar `i` of loop `l` starts at beat
/// `l * roots.len() * BEATS_PER_BAR + i * BEATS_PER_BAR`, lasts one bar, and
/// has its root note at `LOW_C + roots[i]`.
pub fn generate_chords(
    roots: &[i32],
    mode: Mode,
    tables: &ChordPatternTables,
) -> Result<Vec<Chord>> {
    let Some(&key) = roots.first() else {
        return Err(ComposeError::config("cannot build chords from an empty root list"));
    };

    let bars = roots.len();
    let mut chords = Vec::with_capacity(bars * LOOPS);
    for l in 0..LOOPS {
        for (i, &root) in roots.iter().enumerate() {
            let position = ChordPosition::of_bar(i, bars);
            let pattern = tables.table(mode, position).get(relative_root(root, key))?;
            let start = (l * bars) as f64 * BEATS_PER_BAR + i as f64 * BEATS_PER_BAR;
            let root_note = Note::new(LOW_C + root, start, BEATS_PER_BAR);
            chords.push(Chord::from_intervals(root_note, pattern.quality, &pattern.intervals));
        }
    }
    Ok(chords)
}

/// Every note of every chord, in chord order: the chord track as a flat
/// note list for a renderer.
pub fn chord_track(chords: &[Chord]) -> Vec<Note> {
    chords.iter().flat_map(|c| c.notes().iter().copied()).collect()
}
