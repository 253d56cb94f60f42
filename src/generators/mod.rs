// src/generators/mod.rs
pub mod pool;
pub mod trigram;

pub use pool::{CharClass, CharacterPool};

use crate::models::PasswordPolicy;
use crate::random::RandomSource;
use thiserror::Error;
use trigram::TRIGRAMS;
use zeroize::Zeroize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("requested password length is zero")]
    ZeroLength,

    #[error("no character classes selected")]
    NoClassesSelected,

    #[error("class minimums ({minimums}) exceed requested length ({length})")]
    MinimumsExceedLength { minimums: usize, length: usize },
}

/// Why a candidate password was rejected by the strength gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeakPassword {
    #[error("password is too short")]
    TooShort,

    #[error("password needs upper and lower case letters plus a digit or symbol")]
    InsufficientVariety,
}

// Per-letter look-alike substitutions for pronounceable passwords:
// (digit variant, symbol variant), indexed a..z.
const LEET: [(Option<char>, Option<char>); 26] = [
    (Some('4'), Some('@')), // a
    (Some('8'), Some('&')), // b
    (None, Some('(')),      // c
    (None, None),           // d
    (Some('3'), None),      // e
    (None, None),           // f
    (Some('6'), None),      // g
    (None, Some('#')),      // h
    (Some('1'), Some('!')), // i
    (None, None),           // j
    (None, None),           // k
    (Some('1'), Some('|')), // l
    (None, None),           // m
    (None, None),           // n
    (Some('0'), None),      // o
    (None, None),           // p
    (None, None),           // q
    (None, None),           // r
    (Some('5'), Some('$')), // s
    (Some('7'), Some('+')), // t
    (None, None),           // u
    (None, None),           // v
    (None, None),           // w
    (None, None),           // x
    (None, None),           // y
    (Some('2'), None),      // z
];

pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        PasswordGenerator
    }

    /// Generate a password satisfying `policy`.
    ///
    /// Pronounceable policies are routed to
    /// [`make_pronounceable`](Self::make_pronounceable); everything else goes
    /// through the character pool. The policy is validated up front so the
    /// retry loop can never be entered with an infeasible one.
    pub fn make_password(
        &self,
        policy: &PasswordPolicy,
        rng: &mut dyn RandomSource,
    ) -> Result<String, PolicyError> {
        Self::validate(policy)?;
        if policy.pronounceable {
            return self.make_pronounceable(policy, rng);
        }
        Ok(self.make_random(policy, rng))
    }

    /// Random-mode generation: a pure function of policy and RNG stream.
    ///
    /// Each draw decrements the "still needed" counter of the class that
    /// produced it; a candidate that leaves any counter positive is discarded
    /// wholesale and redrawn. Feasibility was checked by the caller, so the
    /// loop terminates with probability 1.
    fn make_random(&self, policy: &PasswordPolicy, rng: &mut dyn RandomSource) -> String {
        // Hex-only generation ignores the class minimums; the pool then holds
        // the hex alphabet alone and the first candidate is always accepted.
        let effective = if policy.hex_only {
            PasswordPolicy {
                min_lowercase: 0,
                min_uppercase: 0,
                min_digits: 0,
                min_symbols: 0,
                ..policy.clone()
            }
        } else {
            policy.clone()
        };
        let pool = CharacterPool::new(&effective);

        loop {
            let mut lowercase_needed = effective.min_lowercase as i64;
            let mut uppercase_needed = effective.min_uppercase as i64;
            let mut digits_needed = effective.min_digits as i64;
            let mut symbols_needed = effective.min_symbols as i64;

            let mut candidate = String::with_capacity(policy.length);
            for _ in 0..policy.length {
                let (ch, class) = pool.random_char(rng);
                candidate.push(ch);
                match class {
                    CharClass::Lowercase => lowercase_needed -= 1,
                    CharClass::Uppercase => uppercase_needed -= 1,
                    CharClass::Digit => digits_needed -= 1,
                    CharClass::Symbol => symbols_needed -= 1,
                    CharClass::HexDigit => {}
                }
            }

            if lowercase_needed <= 0
                && uppercase_needed <= 0
                && digits_needed <= 0
                && symbols_needed <= 0
            {
                return candidate;
            }

            log::debug!("candidate missed class minimums, redrawing");
            candidate.zeroize();
        }
    }

    /// Trigram-driven pronounceable generation, single pass, never retried.
    ///
    /// The result may legitimately be shorter than requested if the random
    /// walk reaches a letter pair with no recorded continuation.
    pub fn make_pronounceable(
        &self,
        policy: &PasswordPolicy,
        rng: &mut dyn RandomSource,
    ) -> Result<String, PolicyError> {
        if policy.length == 0 {
            return Err(PolicyError::ZeroLength);
        }
        let table = &*TRIGRAMS;

        // Weighted starting point over the whole trigram population.
        let mut letters: Vec<u8> = Vec::with_capacity(policy.length);
        let (a, b, c) = table.seed_trigram(rng.range_rand(table.sigma()));
        letters.extend_from_slice(&[a, b, c]);

        // Random walk: each next letter is drawn from the continuation
        // distribution of the previous two.
        while letters.len() < policy.length {
            let a = letters[letters.len() - 2];
            let b = letters[letters.len() - 1];
            let total = table.pair_total(a, b);
            if total == 0 {
                log::debug!("trigram walk hit a dead end at {} letters", letters.len());
                break;
            }
            letters.push(table.continuation(a, b, rng.range_rand(total)));
        }
        letters.truncate(policy.length);

        let mut password: Vec<char> = letters.iter().map(|&l| char::from(b'a' + l)).collect();
        letters.zeroize();

        let use_digits = policy.min_digits > 0;
        let use_symbols = policy.min_symbols > 0;
        if use_digits || use_symbols {
            self.leet_substitute(&mut password, use_digits, use_symbols, rng);
        }

        // Case policy comes last so substituted characters are unaffected.
        let use_lowercase = policy.min_lowercase > 0;
        let use_uppercase = policy.min_uppercase > 0;
        if use_uppercase && !use_lowercase {
            for ch in password.iter_mut() {
                ch.make_ascii_uppercase();
            }
        } else if use_uppercase && use_lowercase {
            for ch in password.iter_mut() {
                if ch.is_ascii_alphabetic() && rng.range_rand(2) == 1 {
                    ch.make_ascii_uppercase();
                }
            }
        }

        Ok(password.into_iter().collect())
    }

    /// Replace a random subset of substitutable letters with look-alikes.
    fn leet_substitute(
        &self,
        password: &mut [char],
        use_digits: bool,
        use_symbols: bool,
        rng: &mut dyn RandomSource,
    ) {
        let mut candidates: Vec<usize> = password
            .iter()
            .enumerate()
            .filter(|(_, ch)| {
                let (digit, symbol) = LEET[(**ch as u8 - b'a') as usize];
                (use_digits && digit.is_some()) || (use_symbols && symbol.is_some())
            })
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return;
        }

        // Replace between one and half of the candidates.
        let count = rng.range_rand(candidates.len() as u32) as usize / 2 + 1;

        // Fisher-Yates, then take the prefix as the chosen subset.
        for i in (1..candidates.len()).rev() {
            let j = rng.range_rand(i as u32 + 1) as usize;
            candidates.swap(i, j);
        }

        for &pos in candidates.iter().take(count) {
            let (digit, symbol) = LEET[(password[pos] as u8 - b'a') as usize];
            let digit = if use_digits { digit } else { None };
            let symbol = if use_symbols { symbol } else { None };
            password[pos] = match (digit, symbol) {
                (Some(d), Some(s)) => {
                    if rng.range_rand(2) == 0 {
                        d
                    } else {
                        s
                    }
                }
                (Some(d), None) => d,
                (None, Some(s)) => s,
                // Candidate selection guarantees one variant exists.
                (None, None) => continue,
            };
        }
    }

    /// Strength gate for user-entered passwords; not used by generation.
    pub fn check_password(&self, candidate: &str) -> Result<(), WeakPassword> {
        if candidate.chars().count() < 8 {
            return Err(WeakPassword::TooShort);
        }

        let mut has_lowercase = false;
        let mut has_uppercase = false;
        let mut has_digit = false;
        let mut has_other = false;
        for ch in candidate.chars() {
            if ch.is_lowercase() {
                has_lowercase = true;
            } else if ch.is_uppercase() {
                has_uppercase = true;
            } else if ch.is_ascii_digit() {
                has_digit = true;
            } else {
                has_other = true;
            }
        }

        if has_lowercase && has_uppercase && (has_digit || has_other) {
            Ok(())
        } else {
            Err(WeakPassword::InsufficientVariety)
        }
    }

    /// Heuristic 0-100 strength score from length, class variety and
    /// character repetition.
    pub fn strength_score(&self, candidate: &str) -> u8 {
        let mut score = candidate.chars().count().min(40) as i32;

        if candidate.chars().any(|c| c.is_ascii_lowercase()) {
            score += 10;
        }
        if candidate.chars().any(|c| c.is_ascii_uppercase()) {
            score += 10;
        }
        if candidate.chars().any(|c| c.is_ascii_digit()) {
            score += 10;
        }
        if candidate.chars().any(|c| !c.is_alphanumeric()) {
            score += 10;
        }

        let distinct = candidate
            .chars()
            .collect::<std::collections::HashSet<_>>()
            .len();
        if distinct < candidate.chars().count() / 2 {
            score -= 10;
        }

        score.clamp(0, 100) as u8
    }

    fn validate(policy: &PasswordPolicy) -> Result<(), PolicyError> {
        if policy.length == 0 {
            return Err(PolicyError::ZeroLength);
        }
        if policy.pronounceable || policy.hex_only {
            return Ok(());
        }
        let minimums = policy.total_minimums();
        if minimums == 0 {
            return Err(PolicyError::NoClassesSelected);
        }
        if minimums > policy.length {
            return Err(PolicyError::MinimumsExceedLength {
                minimums,
                length: policy.length,
            });
        }
        Ok(())
    }
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new()
    }
}
