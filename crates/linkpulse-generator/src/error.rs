use thiserror::Error;

/// Errors returned when configuring a generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("invalid id length {length}; expected {min}..={max}")]
    InvalidLength { length: usize, min: usize, max: usize },
}
