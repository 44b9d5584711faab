// Melodic rhythm: per-bar duration lists with bar-line carry-over.
//
// Each seed byte picks one duration from the weighted rhythm table. Durations
// accumulate into the current bar until the bar (plus whatever spilled over
// from the previous bar) reaches `BEATS_PER_BAR`. A note that crosses the bar
// line keeps its full length and its excess is carried into the next bar as
// "hangover", so the next bar closes earlier. The final bar of the
// progression never carries: its last duration is cut so the bar ends
// exactly on the loop boundary.
//
// The generator reports how many bytes it consumed; the caller continues
// reading the seed from that cursor (starting notes, then melody).

use crate::error::{ComposeError, Result};
use crate::weighted::select_weighted;
use crate::{BAR_COUNT, BEATS_PER_BAR};

/// Durations in beats for each of `BAR_COUNT` bars.
pub type Rhythm = Vec<Vec<f64>>;

/// Fill `BAR_COUNT` bars from the seed. Returns `(bytes_consumed, bars)`.
///
/// Running out of seed before the last bar closes is `SeedExhausted`.
pub fn generate_rhythm(seed: &[u8], options: &[(f64, u32)]) -> Result<(usize, Rhythm)> {
    let mut position = 0;
    let mut rhythm: Rhythm = Vec::with_capacity(BAR_COUNT);
    let mut current: Vec<f64> = Vec::new();
    let mut hangover = 0.0;

    while position < seed.len() {
        let byte = seed[position];
        position += 1;
        current.push(select_weighted(options, byte)?);

        let total = current.iter().sum::<f64>() + hangover;
        if total >= BEATS_PER_BAR {
            if total > BEATS_PER_BAR {
                if rhythm.len() + 1 == BAR_COUNT {
                    if let Some(last) = current.last_mut() {
                        *last = BEATS_PER_BAR - (total - *last);
                    }
                } else {
                    hangover = total - BEATS_PER_BAR;
                }
            } else {
                hangover = 0.0;
            }
            log::trace!("rhythm bar {}: {current:?} (hangover {hangover})", rhythm.len());
            rhythm.push(std::mem::take(&mut current));
        }

        if rhythm.len() == BAR_COUNT {
            break;
        }
    }

    if rhythm.len() < BAR_COUNT {
        return Err(ComposeError::SeedExhausted {
            stage: "rhythm",
            needed: position + 1,
            available: seed.len(),
        });
    }

    log::debug!("rhythm consumed {position} bytes: {rhythm:?}");
    Ok((position, rhythm))
}

/// Number of note slots in one pass over the progression.
pub fn slot_count(rhythm: &[Vec<f64>]) -> usize {
    rhythm.iter().map(Vec::len).sum()
}
