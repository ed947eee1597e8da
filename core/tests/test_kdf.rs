#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sha2::{Digest, Sha256};
    use treecrypt_core::config::{Algorithm, CipherConfigBuilder};
    use treecrypt_core::crypto::derive_key;
    use treecrypt_core::ErrorKind;

    #[test]
    fn test_key_length_follows_algorithm() {
        assert_eq!(derive_key("pw", Algorithm::Aes128Cbc).unwrap().len(), 16);
        assert_eq!(derive_key("pw", Algorithm::Aes192Cbc).unwrap().len(), 24);
        assert_eq!(derive_key("pw", Algorithm::Aes256Cbc).unwrap().len(), 32);
    }

    #[test]
    fn test_key_is_sha256_prefix() {
        let digest = Sha256::digest(b"correct horse");
        let short = derive_key("correct horse", Algorithm::Aes128Cbc).unwrap();
        let full = derive_key("correct horse", Algorithm::Aes256Cbc).unwrap();

        assert_eq!(full.as_bytes(), digest.as_slice());
        assert_eq!(short.as_bytes(), &digest[..16]);
    }

    #[test]
    fn test_empty_passphrase_rejected() {
        let err = derive_key("", Algorithm::Aes256Cbc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let mut builder = CipherConfigBuilder::default();
        assert!(builder.set_key("").is_err());
        assert!(!builder.build().has_key());
    }

    // set_key twice with the same passphrase -> same key
    #[test]
    fn test_set_key_deterministic() {
        let mut a = CipherConfigBuilder::default();
        let mut b = CipherConfigBuilder::default();
        assert_eq!(a.set_key("s3cret").unwrap(), b.set_key("s3cret").unwrap());
    }

    proptest! {
        #[test]
        fn prop_derivation_deterministic(pass in "\\PC{1,64}") {
            let k1 = derive_key(&pass, Algorithm::Aes256Cbc).unwrap();
            let k2 = derive_key(&pass, Algorithm::Aes256Cbc).unwrap();
            prop_assert_eq!(k1, k2);
        }

        #[test]
        fn prop_distinct_passphrases_distinct_keys(a in "[a-z]{1,32}", b in "[a-z]{1,32}") {
            let k1 = derive_key(&a, Algorithm::Aes256Cbc).unwrap();
            let k2 = derive_key(&b, Algorithm::Aes256Cbc).unwrap();
            if a != b {
                prop_assert_ne!(k1, k2);
            }
        }
    }
}
