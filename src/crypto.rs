// src/crypto.rs
use crate::random::RandomSource;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

/// Block size of the field cipher, in bytes.
pub const BLOCK_SIZE: usize = 8;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("ciphertext buffer allocation failed: {0}")]
    Allocation(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Externally keyed 8-byte block cipher.
///
/// Keying and setup belong to the session/master-key layer; this core only
/// consumes the primitive. Blocks are transformed in place and independently
/// of one another.
pub trait BlockCipher {
    fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]);
    fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]);
}

/// One credential field held encrypted in memory.
///
/// Owns a type tag, the exact plaintext length, and a ciphertext buffer whose
/// size is the plaintext length rounded up to the block size. The field is
/// empty (`plain_len == 0`) exactly when the buffer is empty. Ciphertext is
/// zeroized on [`clear`](Self::clear) and on drop.
#[derive(Debug, Default)]
pub struct EncryptedField {
    type_tag: u8,
    plain_len: usize,
    data: Vec<u8>,
}

impl EncryptedField {
    pub fn new(type_tag: u8) -> Self {
        Self {
            type_tag,
            plain_len: 0,
            data: Vec::new(),
        }
    }

    pub fn type_tag(&self) -> u8 {
        self.type_tag
    }

    /// Exact plaintext length, never the padded length.
    pub fn len(&self) -> usize {
        self.plain_len
    }

    pub fn is_empty(&self) -> bool {
        self.plain_len == 0
    }

    /// Encrypt `plaintext` into this field, replacing any previous content.
    ///
    /// The plaintext is copied into a scratch buffer rounded up to a multiple
    /// of [`BLOCK_SIZE`], the tail beyond the plaintext is filled with random
    /// bytes (a constant padding pattern would fingerprint short fields), and
    /// each block is encrypted independently. The scratch buffer is zeroized
    /// before release. On allocation failure the field is left empty.
    pub fn set(
        &mut self,
        plaintext: &[u8],
        cipher: &dyn BlockCipher,
        rng: &mut dyn RandomSource,
    ) -> Result<()> {
        self.clear();
        if plaintext.is_empty() {
            return Ok(());
        }

        let block_len = plaintext.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        // clear() above already left us in the empty state, so a failed
        // reservation cannot leave a dangling length.
        let mut data = reserve_ciphertext(block_len)?;

        let mut scratch = Zeroizing::new(vec![0u8; block_len]);
        scratch[..plaintext.len()].copy_from_slice(plaintext);
        rng.fill_random(&mut scratch[plaintext.len()..]);

        let mut block = [0u8; BLOCK_SIZE];
        for chunk in scratch.chunks_exact(BLOCK_SIZE) {
            block.copy_from_slice(chunk);
            cipher.encrypt_block(&mut block);
            data.extend_from_slice(&block);
        }
        block.zeroize();

        self.data = data;
        self.plain_len = plaintext.len();
        Ok(())
    }

    /// Decrypt and return the exact plaintext.
    ///
    /// Decryption runs block by block into a scratch buffer which is then
    /// truncated to the stored length; the buffer scrubs itself on drop, so
    /// the random padding never outlives the call site.
    pub fn get(&self, cipher: &dyn BlockCipher) -> Zeroizing<Vec<u8>> {
        let mut scratch = Zeroizing::new(Vec::with_capacity(self.data.len()));
        let mut block = [0u8; BLOCK_SIZE];
        for chunk in self.data.chunks_exact(BLOCK_SIZE) {
            block.copy_from_slice(chunk);
            cipher.decrypt_block(&mut block);
            scratch.extend_from_slice(&block);
        }
        block.zeroize();
        scratch.truncate(self.plain_len);
        scratch
    }

    /// Scrub and release the ciphertext buffer, resetting to the empty state.
    pub fn clear(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
        self.plain_len = 0;
    }
}

impl Drop for EncryptedField {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

#[cfg(test)]
thread_local! {
    // Lets tests exercise the allocation-failure path without starving the
    // real allocator.
    static CIPHERTEXT_ALLOC_LIMIT: std::cell::Cell<Option<usize>> =
        std::cell::Cell::new(None);
}

fn reserve_ciphertext(block_len: usize) -> Result<Vec<u8>> {
    #[cfg(test)]
    if let Some(limit) = CIPHERTEXT_ALLOC_LIMIT.with(std::cell::Cell::get) {
        if block_len > limit {
            return Err(CryptoError::Allocation(format!(
                "cannot reserve {} bytes",
                block_len
            )));
        }
    }
    let mut data = Vec::new();
    if let Err(e) = data.try_reserve_exact(block_len) {
        return Err(CryptoError::Allocation(e.to_string()));
    }
    Ok(data)
}
