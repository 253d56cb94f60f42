//! Security core of a desktop credential manager.
//!
//! Three pieces: the in-memory encrypted field store ([`EncryptedField`]),
//! the password generation engine ([`PasswordGenerator`]), and the random
//! source ([`SecureRandom`]) both depend on. Everything else (the on-disk
//! database format, master-key derivation, clipboard and UI) lives in the
//! host application and reaches this core through the [`BlockCipher`] and
//! [`RandomSource`] seams.
//!
//! All operations are synchronous and run to completion on the calling
//! thread. The random source is the only shared mutable resource; hosts that
//! use threads serialize access to it or give each thread its own instance.

pub mod crypto;
pub mod generators;
pub mod models;
pub mod random;

pub use crypto::{BlockCipher, CryptoError, EncryptedField, BLOCK_SIZE};
pub use generators::{PasswordGenerator, PolicyError, WeakPassword};
pub use models::PasswordPolicy;
pub use random::{RandomError, RandomSource, SecureRandom};
