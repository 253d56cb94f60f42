// src/models.rs
use serde::{Deserialize, Serialize};

/// Password generation policy.
///
/// An immutable per-request value object. A class minimum of 0 excludes that
/// class from generation entirely; a minimum of N requires at least N
/// characters of that class in the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Total length of the generated password.
    pub length: usize,
    pub min_lowercase: usize,
    pub min_uppercase: usize,
    pub min_digits: usize,
    pub min_symbols: usize,
    /// Restrict output to the 16-character hex alphabet.
    pub hex_only: bool,
    /// Use alphabets with visually ambiguous glyphs removed ("0"/"O", "1"/"l").
    pub easy_vision: bool,
    /// Switch to trigram-driven pronounceable generation.
    pub pronounceable: bool,
    /// Caller-supplied symbol alphabet; `None` uses the built-in set.
    pub symbols: Option<String>,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: 12,
            min_lowercase: 1,
            min_uppercase: 1,
            min_digits: 1,
            min_symbols: 1,
            hex_only: false,
            easy_vision: false,
            pronounceable: false,
            symbols: None,
        }
    }
}

impl PasswordPolicy {
    /// Sum of the per-class minimum counts.
    pub fn total_minimums(&self) -> usize {
        self.min_lowercase + self.min_uppercase + self.min_digits + self.min_symbols
    }
}
