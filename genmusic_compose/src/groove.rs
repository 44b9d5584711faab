// Probabilistic percussion groove generation with density feedback.
//
// A `GrooveProfile` describes one percussive voice: a fixed pitch, a table of
// per-slot play probabilities spanning one groove cycle, the cycle length in
// beats, and candidate subdivisions (note lengths) with integer weights.
//
// Generation walks every groove cycle of every bar of every loop. At each
// slot one seed byte both picks the subdivision and decides whether the slot
// fires. A `GrooveContext` feeds the outcome back: each emission raises the
// play compensation (and the chosen subdivision's compensation), each miss
// lowers them, and positive compensation divides down the next slot's play
// probability and subdivision weight. This is a crude proportional
// controller; the values are not normalised to any range.
//
// The seed byte for a slot is `seed[slot_index + LOOPS * groove_length]`,
// independent of which bar or loop is being generated. Bars differ only
// through the context.

use crate::error::{ComposeError, Result, seed_byte};
use crate::note::Note;
use crate::weighted::{basic_chance, select_weighted};
use crate::{BAR_COUNT, BEATS_PER_BAR, LOOPS};
use serde::{Deserialize, Serialize};

/// One percussive voice's groove parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrooveProfile {
    /// Track name used in score output.
    pub name: String,
    /// Fixed MIDI pitch of every event (General MIDI drum map).
    pub pitch: i32,
    /// Play probability per slot across one cycle, each in [0, 1]. Length
    /// must equal `groove_length / smallest subdivision`.
    pub play_weighting: Vec<f64>,
    /// Cycle length in beats.
    pub groove_length: f64,
    /// Candidate event lengths in beats.
    pub subdivisions: Vec<f64>,
    /// Selection weight per subdivision, same length as `subdivisions`.
    pub subdivision_weights: Vec<u32>,
}

impl GrooveProfile {
    /// Bass drum: strong downbeats, mostly half and whole beats.
    pub fn kick() -> Self {
        GrooveProfile {
            name: "kick".to_string(),
            pitch: 36,
            play_weighting: vec![0.95, 0.1, 0.3, 0.15, 0.7, 0.1, 0.4, 0.2],
            groove_length: 4.0,
            subdivisions: vec![0.5, 1.0],
            subdivision_weights: vec![6, 10],
        }
    }

    /// Snare: backbeat on 2 and 4.
    pub fn snare() -> Self {
        GrooveProfile {
            name: "snare".to_string(),
            pitch: 38,
            play_weighting: vec![0.05, 0.1, 0.9, 0.1, 0.05, 0.2, 0.9, 0.25],
            groove_length: 4.0,
            subdivisions: vec![0.5, 1.0, 2.0],
            subdivision_weights: vec![4, 10, 6],
        }
    }

    /// Closed hi-hat: dense quarter and eighth pulses over a two-beat cycle.
    pub fn hat() -> Self {
        GrooveProfile {
            name: "hat".to_string(),
            pitch: 42,
            play_weighting: vec![0.9, 0.3, 0.7, 0.3, 0.9, 0.3, 0.7, 0.4],
            groove_length: 2.0,
            subdivisions: vec![0.25, 0.5],
            subdivision_weights: vec![8, 12],
        }
    }

    fn smallest_subdivision(&self) -> f64 {
        self.subdivisions.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Offset added to every slot index when reading the seed.
    pub fn seed_offset(&self) -> usize {
        (LOOPS as f64 * self.groove_length) as usize
    }

    /// Seed bytes one generation call can read.
    pub fn seed_bytes_needed(&self) -> usize {
        self.seed_offset() + self.play_weighting.len()
    }

    /// Check the profile's internal consistency.
    pub fn validate(&self) -> Result<()> {
        let fail =
            |msg: String| Err(ComposeError::config(format!("groove '{}': {msg}", self.name)));

        if let Some(&w) = self.play_weighting.iter().find(|w| !(0.0..=1.0).contains(*w)) {
            return fail(format!("play probability {w} is outside [0, 1]"));
        }
        if self.groove_length.is_nan() || self.groove_length <= 0.0 {
            return fail(format!("groove length {} must be positive", self.groove_length));
        }
        if self.subdivisions.is_empty() {
            return fail("no subdivisions".to_string());
        }
        if self.subdivisions.iter().any(|&s| s.is_nan() || s <= 0.0) {
            return fail("subdivisions must be positive".to_string());
        }
        if self.subdivisions.len() != self.subdivision_weights.len() {
            return fail(format!(
                "{} subdivisions but {} weights",
                self.subdivisions.len(),
                self.subdivision_weights.len()
            ));
        }
        let slots = self.groove_length / self.smallest_subdivision();
        if self.play_weighting.len() as f64 != slots {
            return fail(format!(
                "play weighting has {} slots, expected {slots} \
                 (groove length / smallest subdivision)",
                self.play_weighting.len()
            ));
        }
        Ok(())
    }
}

/// Feedback state for one `generate_groove` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrooveContext {
    pub play_compensation: f64,
    /// Compensation per subdivision index; missing entries are zero.
    pub subdivision_compensation: Vec<f64>,
}

impl GrooveContext {
    pub fn new(subdivision_count: usize) -> Self {
        GrooveContext {
            play_compensation: 0.0,
            subdivision_compensation: vec![0.0; subdivision_count],
        }
    }

    /// Play probability after dividing by positive play compensation.
    pub fn compensated_chance(&self, chance: f64) -> f64 {
        if self.play_compensation > 0.0 {
            chance / self.play_compensation
        } else {
            chance
        }
    }

    /// Subdivision weights after dividing each by its own positive
    /// compensation. The quotient is truncated to an integer.
    pub fn compensated_weights(&self, subdivisions: &[f64], weights: &[u32]) -> Vec<(f64, u32)> {
        subdivisions
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(i, (&sub, &weight))| {
                let comp = self.subdivision_compensation.get(i).copied().unwrap_or(0.0);
                let weight = if comp > 0.0 {
                    (weight as f64 / comp) as u32
                } else {
                    weight
                };
                (sub, weight)
            })
            .collect()
    }

    /// Feed back one slot's outcome: emissions push compensation up by
    /// `max(2 * duration, 1)`, misses pull it down by the same amount.
    pub fn record(&mut self, emitted: bool, subdivision_index: usize, duration: f64) {
        let amount = (duration * 2.0).max(1.0);
        let delta = if emitted { amount } else { -amount };
        self.play_compensation += delta;
        if self.subdivision_compensation.len() <= subdivision_index {
            self.subdivision_compensation.resize(subdivision_index + 1, 0.0);
        }
        self.subdivision_compensation[subdivision_index] += delta;
    }
}

/// Play-weighting slot for a position inside the groove.
///
/// Clamped to the last slot so a position that rounds up to the groove
/// length never indexes past the table.
fn slot_index(groove_pos: f64, groove_length: f64, slots: usize) -> usize {
    let idx = ((groove_pos / groove_length) * slots as f64) as usize;
    idx.min(slots.saturating_sub(1))
}

/// Generate a percussion track for `profile` from `seed`.
///
/// Covers `LOOPS` loops of `BAR_COUNT` bars. Every event has the profile's
/// pitch, an onset of `loop * BAR_COUNT * BEATS_PER_BAR + bar_offset +
/// groove_pos`, and the chosen subdivision as its duration.
pub fn generate_groove(profile: &GrooveProfile, seed: &[u8]) -> Result<Vec<Note>> {
    profile.validate()?;
    if seed.len() < profile.play_weighting.len() {
        return Err(ComposeError::SeedExhausted {
            stage: "groove",
            needed: profile.play_weighting.len(),
            available: seed.len(),
        });
    }

    let mut ctx = GrooveContext::new(profile.subdivisions.len());
    let mut notes = Vec::new();
    let offset = profile.seed_offset();
    let slots = profile.play_weighting.len();
    let loop_beats = BAR_COUNT as f64 * BEATS_PER_BAR;

    for loop_index in 0..LOOPS {
        let mut bar_offset = 0.0;
        while bar_offset < loop_beats {
            let mut groove_pos = 0.0;
            while groove_pos < profile.groove_length {
                let idx = slot_index(groove_pos, profile.groove_length, slots);
                let chance = ctx.compensated_chance(profile.play_weighting[idx]);
                let rnd = seed_byte(seed, idx + offset, "groove")?;

                let weighted =
                    ctx.compensated_weights(&profile.subdivisions, &profile.subdivision_weights);
                let sub = select_weighted(&weighted, rnd)?;
                let sub_index = profile
                    .subdivisions
                    .iter()
                    .position(|&s| s == sub)
                    .unwrap_or(0);

                let emitted = basic_chance(rnd, chance);
                if emitted {
                    let onset = loop_index as f64 * loop_beats + bar_offset + groove_pos;
                    notes.push(Note::new(profile.pitch, onset, sub));
                }
                log::trace!(
                    "groove {} loop {loop_index} beat {}: slot {idx} byte {rnd} \
                     chance {chance:.3} sub {sub} emitted {emitted}",
                    profile.name,
                    bar_offset + groove_pos
                );
                ctx.record(emitted, sub_index, sub);

                groove_pos += sub;
            }
            bar_offset += profile.groove_length;
        }
    }

    log::debug!("groove {}: {} events", profile.name, notes.len());
    Ok(notes)
}
