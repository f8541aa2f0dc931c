use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{NextPiece, PieceKind};

/// Uniform random piece source.
///
/// Every draw picks one of the seven catalog entries with equal probability,
/// independently of earlier draws. There is no bag and no anti-repeat rule.
///
/// The generator is a plain value: cloning it forks the random stream, which is what
/// lets [`GameState`](crate::GameState) transitions stay pure.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed};
///
/// let seed = PieceSeed::from_u128(0x1234);
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
///
/// assert_eq!(a.draw(), b.draw());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
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

    pub fn draw_kind(&mut self) -> PieceKind {
        self.rng.random()
    }

    /// Draws the next queued piece.
    pub fn draw(&mut self) -> NextPiece {
        NextPiece::from(self.draw_kind())
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed, written as 32 hexadecimal characters in text and serialized
/// form. Using the same seed produces the same sequence of pieces.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceSeed;
///
/// let seed: PieceSeed = "000000000000000000000000000000ff".parse().unwrap();
/// assert_eq!(seed, PieceSeed::from_u128(255));
/// assert_eq!(seed.to_string(), "000000000000000000000000000000ff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

/// Error returned when parsing a [`PieceSeed`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    InvalidDigit(#[error(not(source))] String),
}

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.as_u128())
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength(s.len()));
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|_| ParsePieceSeedError::InvalidDigit(s.to_owned()))?;
        Ok(Self::from_u128(num))
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

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
