//! Random access codes over the keypad alphabet.
//!
//! Codes are shown on the display and typed back by the players, so they are
//! generated with a general-purpose RNG rather than a cryptographic one.
//!
//! # Examples
//!
//! ```
//! use suitcase_core::code::CodeGenerator;
//!
//! let mut generator = CodeGenerator::seeded(7);
//! let code = generator.generate(20);
//!
//! assert_eq!(code.len(), 20);
//! assert!(generator.generate(0).is_empty());
//! assert!(generator.generate(-3).is_empty());
//! ```

use crate::{Error, KeypadSymbol, Result, constants::KEYPAD_ALPHABET};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A code the players have to type in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessCode(String);

impl AccessCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether an entered symbol sequence equals this code.
    #[must_use]
    pub fn matches(&self, entered: &[KeypadSymbol]) -> bool {
        self.0.chars().count() == entered.len()
            && self.0.chars().zip(entered).all(|(c, s)| c == s.as_char())
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&[KeypadSymbol]> for AccessCode {
    fn from(symbols: &[KeypadSymbol]) -> Self {
        AccessCode(symbols.iter().map(|s| s.as_char()).collect())
    }
}

/// Generates fixed-length codes from the 14-symbol keypad alphabet.
#[derive(Debug, Clone)]
pub struct CodeGenerator<R = StdRng> {
    rng: R,
}

impl CodeGenerator<StdRng> {
    /// Create a generator seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic generator, for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for CodeGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CodeGenerator<R> {
    /// Wrap an existing RNG.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a code of `length` symbols.
    ///
    /// Zero and negative lengths yield an empty code.
    pub fn generate(&mut self, length: i32) -> AccessCode {
        let Ok(length) = usize::try_from(length) else {
            return AccessCode::default();
        };
        let code = (0..length)
            .map(|_| KEYPAD_ALPHABET[self.rng.gen_range(0..KEYPAD_ALPHABET.len())])
            .collect();
        AccessCode(code)
    }

    /// Generate a code of `length` characters drawn from a custom charset.
    ///
    /// # Errors
    /// Returns `Error::EmptyCharset` if a non-empty code is requested from an
    /// empty charset.
    pub fn generate_with_charset(&mut self, length: i32, charset: &[char]) -> Result<String> {
        if length <= 0 {
            return Ok(String::new());
        }
        if charset.is_empty() {
            return Err(Error::EmptyCharset);
        }
        Ok((0..length)
            .filter_map(|_| charset.choose(&mut self.rng))
            .collect())
    }

    /// Access the underlying RNG for other random game decisions.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
