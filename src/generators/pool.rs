// src/generators/pool.rs
use crate::models::PasswordPolicy;
use crate::random::RandomSource;

pub const STD_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const STD_UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const STD_DIGITS: &str = "0123456789";
pub const STD_SYMBOLS: &str = "+-=_@#$%^&;:,.<>/~\\[](){}?!|*";
pub const HEX_DIGITS: &str = "0123456789abcdef";

// Variants with the visually ambiguous glyphs removed.
pub const EASYVISION_LOWERCASE: &str = "abcdefghijkmnopqrstuvwxyz";
pub const EASYVISION_UPPERCASE: &str = "ABCDEFGHJKLMNPQRTUVWXY";
pub const EASYVISION_DIGITS: &str = "346789";
pub const EASYVISION_SYMBOLS: &str = "+-=_@#$%^&<>/~\\?*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
    HexDigit,
}

impl CharClass {
    pub const ALL: [CharClass; NUM_CLASSES] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digit,
        CharClass::Symbol,
        CharClass::HexDigit,
    ];
}

pub const NUM_CLASSES: usize = 5;

/// The candidate character classes a policy selects, with their alphabets.
///
/// A class whose minimum count is 0 gets an empty alphabet and can never be
/// drawn; the hex-digit class is toggled independently of the minimums.
pub struct CharacterPool {
    alphabets: [String; NUM_CLASSES],
    // cumulative[i+1] - cumulative[i] is the size of class i; treating the
    // classes as adjacent intervals on the number line makes one bounded draw
    // select a class with probability proportional to its cardinality.
    cumulative: [u32; NUM_CLASSES + 1],
}

impl CharacterPool {
    pub fn new(policy: &PasswordPolicy) -> Self {
        let easy = policy.easy_vision;
        let variant = |std_set: &str, easy_set: &str, used: bool| -> String {
            if !used {
                String::new()
            } else if easy {
                easy_set.to_string()
            } else {
                std_set.to_string()
            }
        };

        let symbols = if policy.min_symbols == 0 {
            String::new()
        } else {
            match policy.symbols.as_deref() {
                // An empty override falls back to the built-in set: the
                // symbol class must stay drawable while min_symbols > 0.
                Some(custom) if !custom.is_empty() => custom.to_string(),
                _ if easy => EASYVISION_SYMBOLS.to_string(),
                _ => STD_SYMBOLS.to_string(),
            }
        };

        let alphabets = [
            variant(STD_LOWERCASE, EASYVISION_LOWERCASE, policy.min_lowercase > 0),
            variant(STD_UPPERCASE, EASYVISION_UPPERCASE, policy.min_uppercase > 0),
            variant(STD_DIGITS, EASYVISION_DIGITS, policy.min_digits > 0),
            symbols,
            if policy.hex_only {
                HEX_DIGITS.to_string()
            } else {
                String::new()
            },
        ];

        let mut cumulative = [0u32; NUM_CLASSES + 1];
        for (i, alphabet) in alphabets.iter().enumerate() {
            cumulative[i + 1] = cumulative[i] + alphabet.len() as u32;
        }

        Self {
            alphabets,
            cumulative,
        }
    }

    /// Combined size of all selected alphabets.
    pub fn total_len(&self) -> u32 {
        self.cumulative[NUM_CLASSES]
    }

    pub fn alphabet(&self, class: CharClass) -> &str {
        &self.alphabets[class as usize]
    }

    /// Draw one character, reporting which class produced it.
    ///
    /// A single draw in `[0, total_len)` does double duty: the interval it
    /// falls in picks the class, and its remainder modulo the class size
    /// indexes the alphabet. One entropy draw per generated character.
    pub fn random_char(&self, rng: &mut dyn RandomSource) -> (char, CharClass) {
        debug_assert!(self.total_len() > 0);
        let r = rng.range_rand(self.total_len());
        let class = self.class_for(r);
        let alphabet = self.alphabets[class as usize].as_bytes();
        let ch = alphabet[r as usize % alphabet.len()] as char;
        (ch, class)
    }

    fn class_for(&self, r: u32) -> CharClass {
        for (i, class) in CharClass::ALL.iter().enumerate() {
            if r < self.cumulative[i + 1] {
                return *class;
            }
        }
        // r is drawn below cumulative[NUM_CLASSES], so the loop always hits.
        unreachable!("draw outside cumulative range")
    }
}
