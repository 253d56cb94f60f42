// Integration tests for policy-driven generation: composition guarantees,
// class-selection distribution, and seeded reproducibility.

use vaultcore::generators::pool::STD_SYMBOLS;
use vaultcore::generators::{CharClass, CharacterPool};
use vaultcore::{PasswordGenerator, PasswordPolicy, RandomSource, SecureRandom};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn count_classes(password: &str) -> (usize, usize, usize, usize) {
    let mut lower = 0;
    let mut upper = 0;
    let mut digit = 0;
    let mut symbol = 0;
    for ch in password.chars() {
        if ch.is_ascii_lowercase() {
            lower += 1;
        } else if ch.is_ascii_uppercase() {
            upper += 1;
        } else if ch.is_ascii_digit() {
            digit += 1;
        } else {
            symbol += 1;
        }
    }
    (lower, upper, digit, symbol)
}

#[test]
fn every_password_meets_its_class_minimums() {
    init_logs();
    let generator = PasswordGenerator::new();
    let policy = PasswordPolicy {
        length: 12,
        min_lowercase: 2,
        min_uppercase: 2,
        min_digits: 2,
        min_symbols: 0,
        ..PasswordPolicy::default()
    };
    let mut rng = SecureRandom::from_seed([11u8; 32]);

    for _ in 0..200 {
        let password = generator.make_password(&policy, &mut rng).unwrap();
        assert_eq!(password.chars().count(), 12);
        let (lower, upper, digit, symbol) = count_classes(&password);
        assert!(lower >= 2, "{password:?} lacks lowercase");
        assert!(upper >= 2, "{password:?} lacks uppercase");
        assert!(digit >= 2, "{password:?} lacks digits");
        // min_symbols == 0 excludes the class entirely.
        assert_eq!(symbol, 0, "{password:?} contains a symbol");
    }
}

#[test]
fn tight_policy_still_terminates() {
    init_logs();
    let generator = PasswordGenerator::new();
    // Minimums sum exactly to the length: the only valid candidates have the
    // exact class composition, so the retry loop really gets exercised.
    let policy = PasswordPolicy {
        length: 8,
        min_lowercase: 2,
        min_uppercase: 2,
        min_digits: 2,
        min_symbols: 2,
        ..PasswordPolicy::default()
    };
    let mut rng = SecureRandom::from_seed([12u8; 32]);
    for _ in 0..20 {
        let password = generator.make_password(&policy, &mut rng).unwrap();
        let (lower, upper, digit, symbol) = count_classes(&password);
        assert_eq!((lower, upper, digit, symbol), (2, 2, 2, 2));
    }
}

#[test]
fn seeded_generation_is_reproducible() {
    let generator = PasswordGenerator::new();
    let policy = PasswordPolicy {
        length: 12,
        min_lowercase: 2,
        min_uppercase: 2,
        min_digits: 2,
        min_symbols: 0,
        ..PasswordPolicy::default()
    };

    let mut first = SecureRandom::from_seed([99u8; 32]);
    let mut second = SecureRandom::from_seed([99u8; 32]);
    for _ in 0..10 {
        let a = generator.make_password(&policy, &mut first).unwrap();
        let b = generator.make_password(&policy, &mut second).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn class_selection_is_proportional_to_class_size() {
    // Chi-square goodness-of-fit over raw pool draws (no retry loop, which
    // conditions on the minimums and would skew the tally). Expected
    // frequencies are class_size / total: 26 + 26 + 10 + 29 = 91.
    let policy = PasswordPolicy {
        min_lowercase: 1,
        min_uppercase: 1,
        min_digits: 1,
        min_symbols: 1,
        ..PasswordPolicy::default()
    };
    let pool = CharacterPool::new(&policy);
    let mut rng = SecureRandom::from_seed([13u8; 32]);

    let mut observed = [0f64; 4];
    let trials = 20_000usize;
    for _ in 0..trials {
        let (_, class) = pool.random_char(&mut rng);
        match class {
            CharClass::Lowercase => observed[0] += 1.0,
            CharClass::Uppercase => observed[1] += 1.0,
            CharClass::Digit => observed[2] += 1.0,
            CharClass::Symbol => observed[3] += 1.0,
            CharClass::HexDigit => panic!("hex class not selected by policy"),
        }
    }

    let sizes = [26.0, 26.0, 10.0, 29.0];
    let sum: f64 = sizes.iter().sum();
    let mut chi_square = 0.0;
    for (obs, size) in observed.iter().zip(sizes.iter()) {
        let expected = trials as f64 * size / sum;
        chi_square += (obs - expected).powi(2) / expected;
    }
    // 3 degrees of freedom, p = 0.001 critical value.
    assert!(chi_square < 16.27, "chi-square {chi_square} too large");
}

#[test]
fn custom_symbols_are_the_only_symbols_emitted() {
    let generator = PasswordGenerator::new();
    let policy = PasswordPolicy {
        length: 16,
        min_lowercase: 1,
        min_uppercase: 0,
        min_digits: 0,
        min_symbols: 4,
        symbols: Some("!?".to_string()),
        ..PasswordPolicy::default()
    };
    let mut rng = SecureRandom::from_seed([14u8; 32]);
    for _ in 0..50 {
        let password = generator.make_password(&policy, &mut rng).unwrap();
        for ch in password.chars() {
            assert!(
                ch.is_ascii_lowercase() || ch == '!' || ch == '?',
                "unexpected character {ch:?} in {password:?}"
            );
        }
    }
}

#[test]
fn empty_custom_symbol_set_still_generates() {
    // An empty symbol override must behave like no override at all; with
    // symbols as the only selected class, a zero-width symbol class would
    // leave the pool with nothing to draw from.
    let generator = PasswordGenerator::new();
    let policy = PasswordPolicy {
        length: 10,
        min_lowercase: 0,
        min_uppercase: 0,
        min_digits: 0,
        min_symbols: 1,
        symbols: Some(String::new()),
        ..PasswordPolicy::default()
    };
    let mut rng = SecureRandom::from_seed([17u8; 32]);
    let password = generator.make_password(&policy, &mut rng).unwrap();
    assert_eq!(password.chars().count(), 10);
    assert!(password.chars().all(|c| STD_SYMBOLS.contains(c)));
}

#[test]
fn empty_custom_symbols_beside_other_classes_terminates() {
    // The symbol minimum must stay satisfiable, or the retry loop could
    // never accept a candidate.
    let generator = PasswordGenerator::new();
    let policy = PasswordPolicy {
        length: 10,
        min_lowercase: 1,
        min_uppercase: 0,
        min_digits: 0,
        min_symbols: 1,
        symbols: Some(String::new()),
        ..PasswordPolicy::default()
    };
    let mut rng = SecureRandom::from_seed([18u8; 32]);
    for _ in 0..20 {
        let password = generator.make_password(&policy, &mut rng).unwrap();
        assert_eq!(password.chars().count(), 10);
        assert!(password.chars().any(|c| STD_SYMBOLS.contains(c)));
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
    }
}

#[test]
fn easy_vision_passwords_avoid_ambiguous_glyphs() {
    let generator = PasswordGenerator::new();
    let policy = PasswordPolicy {
        length: 16,
        easy_vision: true,
        ..PasswordPolicy::default()
    };
    let mut rng = SecureRandom::from_seed([15u8; 32]);
    for _ in 0..50 {
        let password = generator.make_password(&policy, &mut rng).unwrap();
        for forbidden in ['0', 'O', '1', 'l', 'I'] {
            assert!(
                !password.contains(forbidden),
                "ambiguous {forbidden:?} in {password:?}"
            );
        }
    }
}

#[test]
fn pronounceable_postprocessing_never_changes_length() {
    let generator = PasswordGenerator::new();
    let plain = PasswordPolicy {
        length: 16,
        min_lowercase: 1,
        min_uppercase: 0,
        min_digits: 0,
        min_symbols: 0,
        pronounceable: true,
        ..PasswordPolicy::default()
    };
    let decorated = PasswordPolicy {
        min_uppercase: 1,
        min_digits: 1,
        min_symbols: 1,
        ..plain.clone()
    };

    // Same seed: the walk consumes the same draws before post-processing
    // diverges, so both runs produce a walk of identical length.
    for seed in 0..20u8 {
        let a = generator
            .make_password(&plain, &mut SecureRandom::from_seed([seed; 32]))
            .unwrap();
        let b = generator
            .make_password(&decorated, &mut SecureRandom::from_seed([seed; 32]))
            .unwrap();
        assert_eq!(a.chars().count(), b.chars().count());
    }
}

#[test]
fn entropy_accumulation_does_not_disturb_generation() {
    let generator = PasswordGenerator::new();
    let policy = PasswordPolicy::default();
    let mut rng = SecureRandom::from_seed([16u8; 32]);
    rng.add_entropy(b"some host event");
    let password = generator.make_password(&policy, &mut rng).unwrap();
    assert_eq!(password.chars().count(), policy.length);
}
