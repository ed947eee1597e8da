//! crypto/context.rs
//! Streaming AES-CBC cipher contexts with PKCS#7 padding.
//!
//! Design notes:
//! - The block primitive comes from the `aes` crate; chaining and padding
//!   live here so both contexts can be fed arbitrary slices.
//! - `Encryptor` keeps at most one partial block buffered.
//! - `Decryptor` always holds back the last complete block, since it may
//!   carry the padding; `finalize` checks and strips it.
//! - No authentication: a wrong key usually, but not always, shows up as a
//!   padding failure.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};

use crate::config::Algorithm;
use crate::constants::AES_BLOCK_LEN;
use crate::crypto::kdf::Key;
use crate::types::CryptError;

const BLOCK: usize = AES_BLOCK_LEN;

enum BlockCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl BlockCipher {
    fn new(algorithm: Algorithm, key: &Key) -> Result<Self, CryptError> {
        let bad_key = |_| {
            CryptError::InvalidArgument(format!(
                "{algorithm} needs a {}-byte key, got {}",
                algorithm.key_len(),
                key.len()
            ))
        };

        let cipher = match algorithm {
            Algorithm::Aes128Cbc => BlockCipher::Aes128(Aes128::new_from_slice(key.as_bytes()).map_err(bad_key)?),
            Algorithm::Aes192Cbc => BlockCipher::Aes192(Aes192::new_from_slice(key.as_bytes()).map_err(bad_key)?),
            Algorithm::Aes256Cbc => BlockCipher::Aes256(Aes256::new_from_slice(key.as_bytes()).map_err(bad_key)?),
        };
        Ok(cipher)
    }

    #[inline]
    fn encrypt(&self, block: &mut Block) {
        match self {
            BlockCipher::Aes128(c) => c.encrypt_block(block),
            BlockCipher::Aes192(c) => c.encrypt_block(block),
            BlockCipher::Aes256(c) => c.encrypt_block(block),
        }
    }

    #[inline]
    fn decrypt(&self, block: &mut Block) {
        match self {
            BlockCipher::Aes128(c) => c.decrypt_block(block),
            BlockCipher::Aes192(c) => c.decrypt_block(block),
            BlockCipher::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// CBC needs exactly one block of IV; anything else cannot be chained.
fn chain_from_iv(algorithm: Algorithm, iv: &[u8]) -> Result<[u8; BLOCK], CryptError> {
    if iv.len() != algorithm.block_len() {
        return Err(CryptError::ConstraintViolation(format!(
            "{algorithm} needs a {}-byte IV, configured {}",
            algorithm.block_len(),
            iv.len()
        )));
    }
    let mut chain = [0u8; BLOCK];
    chain.copy_from_slice(iv);
    Ok(chain)
}

#[inline]
fn xor_in_place(block: &mut [u8], other: &[u8; BLOCK]) {
    for (b, o) in block.iter_mut().zip(other.iter()) {
        *b ^= o;
    }
}

/// Encrypting half of a CBC context.
pub struct Encryptor {
    cipher: BlockCipher,
    chain: [u8; BLOCK],
    pending: Vec<u8>,
}

impl Encryptor {
    pub fn new(algorithm: Algorithm, key: &Key, iv: &[u8]) -> Result<Self, CryptError> {
        Ok(Self {
            cipher: BlockCipher::new(algorithm, key)?,
            chain: chain_from_iv(algorithm, iv)?,
            pending: Vec::with_capacity(BLOCK),
        })
    }

    /// Encrypt every complete block available; a partial tail stays buffered.
    pub fn update(&mut self, input: &[u8], out: &mut Vec<u8>) {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(input);

        let full = buf.len() - buf.len() % BLOCK;
        for chunk in buf[..full].chunks_exact(BLOCK) {
            self.seal_block(chunk, out);
        }

        buf.drain(..full);
        self.pending = buf;
    }

    /// Pad the buffered tail (PKCS#7, always at least one byte) and emit the
    /// last block.
    pub fn finalize(mut self, out: &mut Vec<u8>) {
        let pad = BLOCK - self.pending.len();
        let mut last = std::mem::take(&mut self.pending);
        last.resize(BLOCK, pad as u8);
        self.seal_block(&last, out);
    }

    fn seal_block(&mut self, plain: &[u8], out: &mut Vec<u8>) {
        let mut block = Block::clone_from_slice(plain);
        xor_in_place(&mut block, &self.chain);
        self.cipher.encrypt(&mut block);
        self.chain.copy_from_slice(&block);
        out.extend_from_slice(&block);
    }
}

/// Decrypting half of a CBC context.
pub struct Decryptor {
    cipher: BlockCipher,
    chain: [u8; BLOCK],
    pending: Vec<u8>,
}

impl Decryptor {
    pub fn new(algorithm: Algorithm, key: &Key, iv: &[u8]) -> Result<Self, CryptError> {
        Ok(Self {
            cipher: BlockCipher::new(algorithm, key)?,
            chain: chain_from_iv(algorithm, iv)?,
            pending: Vec::with_capacity(2 * BLOCK),
        })
    }

    /// Decrypt complete blocks, keeping the newest complete block back.
    pub fn update(&mut self, input: &[u8], out: &mut Vec<u8>) {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(input);

        let keep = match buf.len() % BLOCK {
            0 => BLOCK.min(buf.len()),
            rem => rem,
        };
        let ready = buf.len() - keep;
        for chunk in buf[..ready].chunks_exact(BLOCK) {
            self.open_block(chunk, out);
        }

        buf.drain(..ready);
        self.pending = buf;
    }

    /// Decrypt the held-back block and strip its padding.
    pub fn finalize(mut self, out: &mut Vec<u8>) -> Result<(), CryptError> {
        if self.pending.len() != BLOCK {
            return Err(CryptError::DecryptionFailed(format!(
                "ciphertext is not a whole number of {BLOCK}-byte blocks"
            )));
        }

        let last = std::mem::take(&mut self.pending);
        let mut plain = Vec::with_capacity(BLOCK);
        self.open_block(&last, &mut plain);

        let data_len = unpadded_len(&plain)?;
        out.extend_from_slice(&plain[..data_len]);
        Ok(())
    }

    fn open_block(&mut self, cipher_block: &[u8], out: &mut Vec<u8>) {
        let mut block = Block::clone_from_slice(cipher_block);
        self.cipher.decrypt(&mut block);
        xor_in_place(&mut block, &self.chain);
        self.chain.copy_from_slice(cipher_block);
        out.extend_from_slice(&block);
    }
}

/// Length of the data in a final PKCS#7 block.
fn unpadded_len(block: &[u8]) -> Result<usize, CryptError> {
    let pad = block[BLOCK - 1] as usize;
    let valid = (1..=BLOCK).contains(&pad) && block[BLOCK - pad..].iter().all(|&b| b as usize == pad);
    if !valid {
        return Err(CryptError::DecryptionFailed("bad block padding (wrong key or corrupted data)".into()));
    }
    Ok(BLOCK - pad)
}

/// One-shot encryption of an in-memory buffer.
pub fn encrypt_bytes(algorithm: Algorithm, key: &Key, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptError> {
    let mut enc = Encryptor::new(algorithm, key, iv)?;
    let mut out = Vec::with_capacity(plaintext.len() + BLOCK);
    enc.update(plaintext, &mut out);
    enc.finalize(&mut out);
    Ok(out)
}

/// One-shot decryption of an in-memory buffer.
pub fn decrypt_bytes(algorithm: Algorithm, key: &Key, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptError> {
    let mut dec = Decryptor::new(algorithm, key, iv)?;
    let mut out = Vec::with_capacity(ciphertext.len());
    dec.update(ciphertext, &mut out);
    dec.finalize(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    fn key256() -> Key {
        // FIPS-197 / SP 800-38A F.2.5 key
        let bytes = hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4").unwrap();
        Key::from_bytes(bytes, Algorithm::Aes256Cbc).unwrap()
    }

    #[test]
    fn matches_sp800_38a_cbc_vector() {
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let pt = hex::decode("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51").unwrap();

        let ct = encrypt_bytes(Algorithm::Aes256Cbc, &key256(), &iv, &pt).unwrap();
        // two data blocks from the vector, then one block of padding
        assert_eq!(ct.len(), 48);
        assert_eq!(
            hex::encode(&ct[..32]),
            "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d"
        );
    }

    #[test]
    fn chunked_updates_equal_one_shot() {
        let iv = [7u8; 16];
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let whole = encrypt_bytes(Algorithm::Aes256Cbc, &key256(), &iv, &data).unwrap();

        let mut enc = Encryptor::new(Algorithm::Aes256Cbc, &key256(), &iv).unwrap();
        let mut out = Vec::new();
        for piece in data.chunks(37) {
            enc.update(piece, &mut out);
        }
        enc.finalize(&mut out);
        assert_eq!(out, whole);

        let mut dec = Decryptor::new(Algorithm::Aes256Cbc, &key256(), &iv).unwrap();
        let mut plain = Vec::new();
        for piece in out.chunks(16) {
            dec.update(piece, &mut plain);
        }
        dec.finalize(&mut plain).unwrap();
        assert_eq!(plain, data);
    }

    #[test]
    fn short_iv_is_rejected() {
        let err = Encryptor::new(Algorithm::Aes256Cbc, &key256(), &[0u8; 8]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let iv = [1u8; 16];
        let ct = encrypt_bytes(Algorithm::Aes256Cbc, &key256(), &iv, b"hello world").unwrap();
        let err = decrypt_bytes(Algorithm::Aes256Cbc, &key256(), &iv, &ct[..10]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
        let err = decrypt_bytes(Algorithm::Aes256Cbc, &key256(), &iv, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
    }

    #[test]
    fn padding_check() {
        let mut block = [0u8; 16];
        block[15] = 0;
        assert!(unpadded_len(&block).is_err());
        block[15] = 17;
        assert!(unpadded_len(&block).is_err());
        block[14] = 2;
        block[15] = 2;
        assert_eq!(unpadded_len(&block).unwrap(), 14);
    }
}
