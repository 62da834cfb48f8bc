use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::Generator;
use linkpulse_core::short_id::{MAX_LENGTH, MIN_LENGTH};
use linkpulse_core::ShortId;
use rand::Rng;
use typed_builder::TypedBuilder;

pub const DEFAULT_LENGTH: usize = 8;

/// Configures a [`RandomGenerator`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGeneratorSettings {
    /// Number of characters in every generated id.
    #[builder(default = DEFAULT_LENGTH)]
    pub length: usize,
    /// Characters to draw from.
    #[builder(default)]
    pub alphabet: Alphabet,
}

impl Default for RandomGeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Draws every character of an id uniformly and independently from the
/// configured alphabet.
///
/// With the default settings the id space is `62^8` (about `2.2 * 10^14`),
/// so a collision is rare but possible; the caller resolves it by retrying
/// against the store.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
    alphabet: Alphabet,
}

impl RandomGenerator {
    pub fn new(settings: RandomGeneratorSettings) -> Result<Self, Error> {
        if settings.length < MIN_LENGTH || settings.length > MAX_LENGTH {
            return Err(Error::InvalidLength {
                length: settings.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }

        Ok(Self {
            length: settings.length,
            alphabet: settings.alphabet,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            alphabet: Alphabet::base62(),
        }
    }
}

impl Generator for RandomGenerator {
    type Output = ShortId;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::rng();
        let id: String = (0..self.length)
            .map(|_| self.alphabet.get(rng.random_range(0..self.alphabet.len())))
            .collect();
        ShortId::new_unchecked(id)
    }
}
