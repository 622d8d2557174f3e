//! CRC32 checksums for yEnc articles
//!
//! Standard reflected CRC-32 (polynomial `0xEDB88320`, seed and final XOR
//! `0xFFFFFFFF`), computed by `crc32fast`.

use crc32fast::Hasher;

/// Running CRC32 over a byte stream
///
/// # Example
///
/// ```
/// use usenet_codec::crc32::{checksum, Crc32};
///
/// let mut crc = Crc32::new();
/// crc.update(b"1234");
/// crc.update(b"56789");
/// assert_eq!(crc.value(), 0xCBF4_3926);
/// assert_eq!(crc.finalize(), checksum(b"123456789"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Crc32 {
    hasher: Hasher,
    len: u64,
}

impl Crc32 {
    /// Start a new checksum
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more bytes into the checksum
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.len += bytes.len() as u64;
    }

    /// Number of bytes fed so far
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether no bytes have been fed yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finalized checksum of everything fed so far, without consuming the state
    #[must_use]
    pub fn value(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Finalized checksum
    #[must_use]
    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

/// One-shot CRC32 of a byte slice
#[must_use]
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}
