// Deterministic, portable seed-byte source.
//
// The composer core consumes nothing but an ordered, finite buffer of bytes.
// This crate is the one place those bytes come from when the caller starts
// from a human-readable seed string: the text is hashed with 64-bit FNV-1a,
// the hash seeds xoshiro256++ (Blackman & Vigna, 2019) via SplitMix64, and
// the generator's upper bytes fill the buffer.
//
// Everything here is integer arithmetic with fixed widths and explicit
// wrapping, so the same text yields the same bytes on every platform and
// compiler. `std::hash` is deliberately not used: its output is not stable
// across Rust releases.
//
// Consumers: `genmusic_compose` (CLI and benchmarks). The core generators in
// that crate never depend on this crate directly; they take `&[u8]`.

use serde::{Deserialize, Serialize};

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Xoshiro256++ generator used to expand a seed into a byte buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRng {
    s: [u64; 4],
}

impl SeedRng {
    /// Create a generator from a `u64` seed, expanded through SplitMix64.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a generator from seed text. Equal strings give equal streams.
    pub fn from_text(text: &str) -> Self {
        Self::new(fnv1a64(text.as_bytes()))
    }

    /// Next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = self.s[0]
            .wrapping_add(self.s[3])
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Next byte, taken from the high end of a `u64` (the low bits of
    /// xoshiro-family generators are the weakest).
    pub fn next_u8(&mut self) -> u8 {
        (self.next_u64() >> 56) as u8
    }

    /// Fill `buf` with bytes, eight at a time, little-endian.
    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        let mut chunks = buf.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_u64().to_le_bytes());
        }
        let rest = chunks.into_remainder();
        if !rest.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            let n = rest.len();
            rest.copy_from_slice(&bytes[..n]);
        }
    }
}

/// Produce `length` seed bytes from `text`.
///
/// This is the entry point the CLI uses to turn `--seed <TEXT>` into the
/// buffer handed to the composer.
pub fn seed_bytes(length: usize, text: &str) -> Vec<u8> {
    let mut rng = SeedRng::from_text(text);
    let mut out = vec![0u8; length];
    rng.fill_bytes(&mut out);
    out
}

/// 64-bit FNV-1a over raw bytes.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

/// SplitMix64, used only to expand a single `u64` into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
