pub mod alphabet;
pub mod error;
pub mod random;

pub use alphabet::Alphabet;
pub use error::Error;
pub use random::{RandomGenerator, RandomGeneratorSettings};

use linkpulse_core::ShortId;

/// Trait for generating short ids.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is not their concern: the store's atomic insert rejects
/// duplicates and the caller asks for another candidate.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortId>;
    /// Generates a candidate short id.
    fn generate(&self) -> Self::Output;
}
