/// Reserved suffix appended to the file name of every encrypted file.
pub const ENCRYPTED_SUFFIX: &str = ".sex";

/// IV length when none is configured.
pub const DEFAULT_IV_LENGTH: usize = 16;

/// AES block size (bytes). CBC chaining needs an IV of exactly this length.
pub const AES_BLOCK_LEN: usize = 16;

/// Hard ceiling on the IV length for the AES family.
pub const MAX_AES_IV_LENGTH: usize = 16;

/// Read granularity when streaming a file through a cipher context.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB

/// Key sizes (bytes) per AES variant.
pub mod key_lens {
    pub const AES128: usize = 16;
    pub const AES192: usize = 24;
    pub const AES256: usize = 32;
}
