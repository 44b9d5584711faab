// Byte-driven weighted selection.
//
// Every random decision in the composer is one seed byte fed through one of
// the two functions here. Both are integer-exact so that a seed reproduces
// the same score everywhere.

use crate::error::{ComposeError, Result};

/// Pick one value from `(value, weight)` pairs using a single byte.
///
/// The byte is reduced modulo the total weight, then the list is walked in
/// order, subtracting each weight until the reduced value falls inside an
/// item's bucket. Order matters: buckets are laid out first to last.
///
/// Zero-weight items are never chosen. A list whose weights sum to zero, or
/// an empty list, is `InvalidWeightTable`.
pub fn select_weighted<T: Copy>(options: &[(T, u32)], rnd: u8) -> Result<T> {
    let total: u64 = options.iter().map(|&(_, w)| w as u64).sum();
    if total == 0 {
        return Err(ComposeError::InvalidWeightTable {
            options: options.len(),
        });
    }

    let mut remaining = rnd as u64 % total;
    for &(value, weight) in options {
        let weight = weight as u64;
        if remaining < weight {
            return Ok(value);
        }
        remaining -= weight;
    }

    // Unreachable: `remaining < total` and the weights sum to `total`.
    Err(ComposeError::InvalidWeightTable {
        options: options.len(),
    })
}

/// True iff `rnd < probability * 256`, compared as integers.
///
/// The product is truncated toward zero before comparing, which quantizes
/// the probability to 1/256 steps. `probability <= 0` never fires;
/// `probability >= 1` always does.
pub fn basic_chance(rnd: u8, probability: f64) -> bool {
    let threshold = (probability * 256.0) as i64;
    (rnd as i64) < threshold
}
