use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Source of uniformly distributed integers used to pick the next piece.
///
/// The engine only ever asks for `next_below(PieceKind::LEN)`. Implement this
/// trait to script piece sequences in tests or replays.
pub trait RandomSource {
    /// Returns an integer in `0..upper`. `upper` is never zero.
    fn next_below(&mut self, upper: usize) -> usize;
}

impl<R> RandomSource for &mut R
where
    R: RandomSource + ?Sized,
{
    fn next_below(&mut self, upper: usize) -> usize {
        (**self).next_below(upper)
    }
}

/// Default random source: a PCG generator seeded by a [`PieceSeed`].
#[derive(Debug, Clone)]
pub struct PieceRng {
    rng: Pcg32,
}

impl Default for PieceRng {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceRng {
    /// Creates a generator with a seed drawn from the thread-local RNG.
    ///
    /// For reproducible piece sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl RandomSource for PieceRng {
    fn next_below(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}

/// 128-bit seed for deterministic piece generation.
///
/// Formatted, parsed and serialized as a 32-character hex string, so a seed
/// printed at the end of one game can be passed back on the command line.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameEngine, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
///
/// let first = GameEngine::with_seed(seed);
/// let second = GameEngine::with_seed(parsed);
/// assert_eq!(first.current_piece(), second.current_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: {reason}")]
pub struct ParsePieceSeedError {
    input: String,
    reason: String,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: String| ParsePieceSeedError {
            input: s.to_owned(),
            reason,
        };
        if s.len() != 32 {
            return Err(error(format!("expected 32 characters, got {}", s.len())));
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| error(e.to_string()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
