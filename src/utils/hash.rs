//! Content hashing using blake3.
//!
//! Used for content-addressed asset names (e.g. `cover.1a2b3c4d.png`):
//! the name changes exactly when the file's bytes change.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Length of the hex fingerprint embedded in asset names.
pub const FINGERPRINT_LEN: usize = 8;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash an in-memory buffer.
    #[inline]
    pub fn of(data: impl AsRef<[u8]>) -> Self {
        Self(*blake3::hash(data.as_ref()).as_bytes())
    }

    /// Hash a file's contents, streaming.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);
        let mut hasher = blake3::Hasher::new();
        let mut buffer = [0u8; 64 * 1024];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Self(*hasher.finalize().as_bytes()))
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Short hex prefix for cache-busting filenames.
    pub fn fingerprint(self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(FINGERPRINT_LEN);
        hex
    }
}
