// Error type shared by every generator in the crate.
//
// All failures abort the generation call in progress. Nothing here is
// retried or defaulted: generation is a pure function of its seed slice and
// tables, so repeating a failed call reproduces the same failure, and a
// silent default would break seed reproducibility.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Why a generation call could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// A generator needed more seed bytes than its slice contained.
    #[error("seed exhausted in {stage}: needed {needed} bytes, slice holds {available}")]
    SeedExhausted {
        stage: &'static str,
        needed: usize,
        available: usize,
    },

    /// A static table or an argument shape does not fit the generator, e.g.
    /// a chord-pattern table with no entry for a produced relative root, or
    /// a chord sequence whose length is not `BAR_COUNT * LOOPS`.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A weighted choice was asked to pick from options whose weights sum
    /// to zero (or from no options at all).
    #[error("weight table of {options} options has zero total weight")]
    InvalidWeightTable { options: usize },
}

impl ComposeError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ComposeError::InvalidConfiguration(msg.into())
    }
}

/// Read `seed[index]`, reporting exhaustion against the named stage.
pub(crate) fn seed_byte(seed: &[u8], index: usize, stage: &'static str) -> Result<u8> {
    seed.get(index)
        .copied()
        .ok_or(ComposeError::SeedExhausted {
            stage,
            needed: index + 1,
            available: seed.len(),
        })
}
