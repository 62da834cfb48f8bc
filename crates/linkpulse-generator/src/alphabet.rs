use crate::error::Error;
use linkpulse_core::ShortId;
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

const BASE62: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// The set of characters a generated short id is drawn from.
///
/// Every character must be valid in a [`ShortId`], and duplicates are
/// rejected since they would skew the distribution toward repeated symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    pub fn new(chars: &str) -> Result<Self, Error> {
        let chars: Vec<char> = chars.chars().collect();

        if chars.len() < 2 {
            return Err(Error::InvalidAlphabet(format!(
                "need at least 2 characters, got {}",
                chars.len()
            )));
        }

        if let Some(c) = chars.iter().find(|c| !ShortId::is_valid_char(**c)) {
            return Err(Error::InvalidAlphabet(format!(
                "character '{}' is not allowed in a short id",
                c
            )));
        }

        let mut seen = HashSet::with_capacity(chars.len());
        if let Some(c) = chars.iter().find(|c| !seen.insert(**c)) {
            return Err(Error::InvalidAlphabet(format!("duplicate character '{}'", c)));
        }

        Ok(Self { chars })
    }

    /// `[A-Za-z0-9]`.
    pub fn base62() -> Self {
        Self {
            chars: BASE62.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub(crate) fn get(&self, index: usize) -> char {
        self.chars[index]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::base62()
    }
}

impl FromStr for Alphabet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base62_has_62_distinct_chars() {
        let alphabet = Alphabet::base62();
        assert_eq!(alphabet.len(), 62);
        assert_eq!(Alphabet::new(BASE62).unwrap(), alphabet);
    }

    #[test]
    fn rejects_short_alphabets() {
        assert!(Alphabet::new("").is_err());
        assert!(Alphabet::new("a").is_err());
        assert!(Alphabet::new("ab").is_ok());
    }

    #[test]
    fn rejects_characters_outside_short_id_charset() {
        let err = Alphabet::new("abc/").unwrap_err();
        assert!(matches!(err, Error::InvalidAlphabet(_)));
        assert!(Alphabet::new("ab-_").is_ok());
    }

    #[test]
    fn rejects_duplicates() {
        let err = Alphabet::new("abca").unwrap_err();
        assert_eq!(err, Error::InvalidAlphabet("duplicate character 'a'".into()));
    }

    #[test]
    fn display_round_trips() {
        let alphabet: Alphabet = "xyz123".parse().unwrap();
        assert_eq!(alphabet.to_string(), "xyz123");
    }
}
