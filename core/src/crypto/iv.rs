//! crypto/iv.rs
//! Initialization vectors for the two engine modes.
//!
//! - `zero_iv`: string mode. Fixed, so equal plaintexts give equal
//!   ciphertexts. Only for reproducible tokens, never for secrets that are
//!   reused across messages.
//! - `random_iv`: file mode. Fresh from the OS RNG on every call.

use rand::rngs::OsRng;
use rand::RngCore;

#[inline]
pub fn zero_iv(len: usize) -> Vec<u8> {
    vec![0u8; len]
}

#[inline]
pub fn random_iv(len: usize) -> Vec<u8> {
    let mut iv = vec![0u8; len];
    OsRng.fill_bytes(&mut iv);
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ivs_differ() {
        let a = random_iv(16);
        let b = random_iv(16);
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn zero_iv_is_all_zero() {
        assert!(zero_iv(16).iter().all(|&b| b == 0));
    }
}
