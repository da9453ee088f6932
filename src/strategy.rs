//! The N-party parity-inference guessing strategy.
//!
//! Each party must guess its own color. Party `i` can see only the colors at
//! indices greater than `i` and hear only the guesses announced by parties
//! before it. Under the parity strategy, party 0 announces an unconstrained
//! coin flip and every later party XORs three parities together:
//!
//! 1. the parity of the colors it can see,
//! 2. the parity of the guesses announced by parties `1..i`,
//! 3. party 0's announced guess.
//!
//! Party 0's guess is deliberately an independent coin flip rather than a
//! parity over the visible colors, matching the reference behavior this
//! framework validates. The flip does not stay local to party 0: party 1's
//! inference is off exactly when the coin disagrees with the parity party 0
//! can see. From party 2 onward the announced guesses carry enough parity
//! information for that error to cancel, so parties `2..N-1` are always
//! correct, and the leader and first follower come down to two independent
//! fair coins. The resulting distribution over "number correct" is the
//! trimodal closed form in [`crate::theory`].

use rand::Rng;

use crate::constants::MAX_PARTIES;
use crate::error::{HarnessError, Result};
use crate::types::{Color, Configuration, GuessVector};

/// Deterministic parity-inference strategy for a fixed party count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParityStrategy {
    parties: usize,
}

impl ParityStrategy {
    /// Create a strategy for `parties` parties.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `parties` is zero or exceeds the packed-key
    /// maximum of 32.
    pub fn new(parties: usize) -> Result<Self> {
        if parties == 0 {
            return Err(HarnessError::InvalidParameter(
                "the parity game needs at least one party".into(),
            ));
        }
        if parties > MAX_PARTIES {
            return Err(HarnessError::InvalidParameter(format!(
                "party count {parties} exceeds supported maximum {MAX_PARTIES}"
            )));
        }
        Ok(Self { parties })
    }

    /// Number of parties this strategy plays for.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Play one round against `config`, producing every party's guess.
    ///
    /// Only party 0 consumes randomness. Parties `1..N-1` are fully
    /// determined by what they can legitimately see and hear; parties
    /// `2..N-1` always match their own colors, while party 1 inherits the
    /// leader's coin.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the configuration's length does not match the
    /// strategy's party count.
    pub fn run_trial<R: Rng + ?Sized>(
        &self,
        config: &Configuration,
        rng: &mut R,
    ) -> Result<GuessVector> {
        if config.len() != self.parties {
            return Err(HarnessError::InvalidInput(format!(
                "configuration has {} parties, strategy expects {}",
                config.len(),
                self.parties
            )));
        }

        let mut guesses = Vec::with_capacity(self.parties);
        guesses.push(Color::random(rng));

        for party in 1..self.parties {
            let visible = parity(config.visible_from(party));
            let announced = parity(&guesses[1..party]);
            let inferred = visible ^ announced ^ guesses[0].bit();
            guesses.push(Color::from_bit(inferred));
        }

        Ok(GuessVector::new(guesses))
    }

    /// Per-party correctness of a guess vector against a configuration.
    pub fn score(config: &Configuration, guesses: &GuessVector) -> Vec<bool> {
        config
            .colors()
            .iter()
            .zip(guesses.guesses())
            .map(|(c, g)| c == g)
            .collect()
    }
}

fn parity(colors: &[Color]) -> u32 {
    colors.iter().fold(0, |acc, c| acc ^ c.bit())
}
