// Melodic contour generation.
//
// The melody walks the rhythm grid bar by bar. Three rules pick each pitch:
//
// - The first slot of a bar plays that bar's starting note, drawn up front
//   from the bar chord's note choices (`generate_starting_notes`).
// - The last slot of a multi-note bar is a transition note: it lands on a
//   chord tone adjacent to the *next* bar's starting note, so the line leads
//   into the bar line. If the slot already sounds past the bar line, the
//   next bar's chord supplies the candidate tones.
// - Every other slot comes from `get_next_best_note`, which draws a chord
//   tone from one seed byte but enforces contrary motion after a leap. A
//   leap of 3+ semitones arms a compensation counter (2, 3 or 4 steps by
//   leap size); while it is armed the line steps to adjacent chord tones in
//   the compensation direction instead of drawing.
//
// `MelodyContext` carries that feedback state across the whole call,
// including across bar lines. The pitch sequence for one pass is then
// repeated `LOOPS` times with onsets accumulated from the rhythm.
//
// Candidate tones come from `nearest_notes`, which searches two octaves
// either side of `root + interval` for every interval of the chord's note
// choices.

use crate::config::NoteChoiceTable;
use crate::error::{ComposeError, Result, seed_byte};
use crate::note::{Chord, Note};
use crate::{BAR_COUNT, BEATS_PER_BAR, LOOPS, LOW_C};

/// Contour feedback carried across one `generate_melody` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MelodyContext {
    /// Signed semitone distance of the most recent melodic step.
    pub last_interval: i32,
    /// Forced steps still owed after a leap.
    pub compensation: u32,
    pub compensation_direction_up: bool,
}

impl Default for MelodyContext {
    fn default() -> Self {
        MelodyContext {
            last_interval: 0,
            compensation: 0,
            compensation_direction_up: true,
        }
    }
}

/// Closest chord tones strictly below and strictly above `target`.
///
/// Candidates are `root + interval + 12 * octave` for every interval and
/// `octave` in -2..=2. Negative candidates are ignored. A side with no
/// candidate falls back to `target` itself.
pub fn nearest_notes(target: i32, root: i32, choices: &[i32]) -> (i32, i32) {
    let mut below: Option<i32> = None;
    let mut above: Option<i32> = None;

    for &interval in choices {
        for octave in -2..=2 {
            let candidate = root + interval + octave * 12;
            if candidate < target && candidate >= 0 && below.is_none_or(|b| candidate > b) {
                below = Some(candidate);
            }
            if candidate > target && above.is_none_or(|a| candidate < a) {
                above = Some(candidate);
            }
        }
    }

    (below.unwrap_or(target), above.unwrap_or(target))
}

/// Pick the next free (non-boundary) melody pitch after `last`.
///
/// `choices` are the current bar's note choices, `rnd` is one seed byte, and
/// `root` is the bar root without the `LOW_C` offset. Updates the
/// compensation fields of `ctx`; `last_interval` is owned by the caller.
pub fn get_next_best_note(
    ctx: &mut MelodyContext,
    last: i32,
    choices: &[i32],
    rnd: u8,
    root: i32,
) -> Result<i32> {
    if choices.is_empty() {
        return Err(ComposeError::config("melody note choices are empty"));
    }

    let leap = ctx.last_interval.abs();
    let rising = ctx.last_interval > 0;
    let (below, above) = nearest_notes(last, root, choices);

    if ctx.compensation > 0 {
        ctx.compensation -= 1;
        return Ok(if ctx.compensation_direction_up { above } else { below });
    }

    if leap >= 3 {
        ctx.compensation_direction_up = !ctx.compensation_direction_up;
        ctx.compensation = match leap {
            10.. => 4,
            7..=9 => 3,
            _ => 2,
        };
        log::trace!(
            "leap of {} from {last}, compensating {} steps",
            ctx.last_interval,
            ctx.compensation
        );
        // Contrary motion: answer a rise with a step down and vice versa.
        return Ok(if rising { below } else { above });
    }

    let next = root.rem_euclid(12) + choices[rnd as usize % choices.len()];

    if next.rem_euclid(12) == last.rem_euclid(12) {
        return Ok(if rising { above } else { below });
    }
    if (next - last).abs() >= 12 {
        return Ok(if next > last { above } else { below });
    }
    Ok(next)
}

/// One starting pitch per bar: `LOW_C + roots[i]` plus a note choice of the
/// bar's chord picked by `seed[i]`.
pub fn generate_starting_notes(
    seed: &[u8],
    chords: &[Chord],
    roots: &[i32],
    table: &NoteChoiceTable,
) -> Result<Vec<i32>> {
    check_chord_count(chords)?;
    if roots.len() != BAR_COUNT {
        return Err(ComposeError::config(format!(
            "expected {BAR_COUNT} roots, got {}",
            roots.len()
        )));
    }

    let mut starting = Vec::with_capacity(BAR_COUNT);
    for (i, (chord, &root)) in chords.iter().zip(roots).take(BAR_COUNT).enumerate() {
        let choices = chord.note_choices(table)?;
        let byte = seed_byte(seed, i, "starting notes")?;
        starting.push(LOW_C + root + choices[byte as usize % choices.len()]);
    }
    log::debug!("starting notes: {starting:?}");
    Ok(starting)
}

/// Generate the melody over `LOOPS` repetitions of the rhythm grid.
///
/// Only the first `BAR_COUNT` chords drive pitch selection; `chords` must
/// still hold exactly `BAR_COUNT * LOOPS` entries. The returned notes are in
/// onset order, `LOOPS * slot_count(rhythm)` of them.
pub fn generate_melody(
    seed: &[u8],
    chords: &[Chord],
    rhythm: &[Vec<f64>],
    starting_notes: &[i32],
    roots: &[i32],
    table: &NoteChoiceTable,
) -> Result<Vec<Note>> {
    let pitches = melody_pitches(seed, chords, rhythm, starting_notes, roots, table)?;

    let mut notes = Vec::with_capacity(pitches.len() * LOOPS);
    let mut location = 0.0;
    for _ in 0..LOOPS {
        let durations = rhythm.iter().flatten();
        for (&pitch, &duration) in pitches.iter().zip(durations) {
            notes.push(Note::new(pitch, location, duration));
            location += duration;
        }
    }
    Ok(notes)
}

/// Pitches for one pass over the rhythm grid, one per slot.
pub fn melody_pitches(
    seed: &[u8],
    chords: &[Chord],
    rhythm: &[Vec<f64>],
    starting_notes: &[i32],
    roots: &[i32],
    table: &NoteChoiceTable,
) -> Result<Vec<i32>> {
    check_chord_count(chords)?;
    for (what, len) in [
        ("rhythm bars", rhythm.len()),
        ("starting notes", starting_notes.len()),
        ("roots", roots.len()),
    ] {
        if len != BAR_COUNT {
            return Err(ComposeError::config(format!(
                "expected {BAR_COUNT} {what}, got {len}"
            )));
        }
    }

    let mut ctx = MelodyContext::default();
    let mut pitches: Vec<i32> = Vec::new();
    let mut cursor = 0;

    for (i, bar) in rhythm.iter().enumerate() {
        let next = (i + 1) % BAR_COUNT;
        let bar_choices = chords[i].note_choices(table)?;
        let next_choices = chords[next].note_choices(table)?;
        let start = starting_notes[i];

        let mut elapsed = 0.0;
        for (j, &duration) in bar.iter().enumerate() {
            elapsed += duration;
            let previous = pitches.last().copied().unwrap_or(start);

            let pitch = if j > 0 && j + 1 == bar.len() {
                let target = starting_notes[next];
                let (choices, root) = if elapsed > BEATS_PER_BAR {
                    (next_choices, roots[next])
                } else {
                    (bar_choices, roots[i])
                };
                let (below, above) = nearest_notes(target, root, choices);
                if previous >= target {
                    if previous == below { above } else { below }
                } else if previous == above {
                    below
                } else {
                    above
                }
            } else if j == 0 {
                start
            } else {
                let rnd = seed_byte(seed, cursor, "melody")?;
                cursor += 1;
                get_next_best_note(&mut ctx, previous, bar_choices, rnd, roots[i])?
            };

            if j > 0 {
                ctx.last_interval = pitch - previous;
            }
            pitches.push(pitch);
        }
    }

    log::debug!("melody consumed {cursor} bytes over {} slots", pitches.len());
    Ok(pitches)
}

fn check_chord_count(chords: &[Chord]) -> Result<()> {
    if chords.len() != BAR_COUNT * LOOPS {
        return Err(ComposeError::config(format!(
            "melody needs {} chords, got {}",
            BAR_COUNT * LOOPS,
            chords.len()
        )));
    }
    Ok(())
}
