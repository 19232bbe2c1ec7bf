//! The generated secret buffer.
//!
//! A `GeneratedSecret` is a mutable byte buffer rather than a `String`, so it
//! can be overwritten in place. It is zeroized on drop, cannot be cloned, and
//! never prints its contents through `Debug`.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte written over every position of a secret when it is wiped.
pub const WIPE_FILLER: u8 = b'*';

/// A secret produced by exactly one key generation.
///
/// Every generator emits printable ASCII, so the buffer is always valid UTF-8.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct GeneratedSecret {
    bytes: Vec<u8>,
}

impl GeneratedSecret {
    /// Takes ownership of an ASCII buffer produced by a generator.
    pub(crate) fn from_ascii(bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.is_ascii());
        Self { bytes }
    }

    /// Returns the secret as text.
    ///
    /// The returned slice borrows the buffer; it is the caller's job not to
    /// copy it anywhere that outlives the secret.
    pub fn expose_secret(&self) -> &str {
        // Contents are always ASCII.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    /// Returns the raw secret bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the secret in bytes (equal to its length in characters).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the secret holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrites every byte with [`WIPE_FILLER`], keeping the length.
    ///
    /// The buffer is zeroized again when the secret is dropped.
    pub fn wipe(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = WIPE_FILLER);
    }

    /// Returns true if every byte equals [`WIPE_FILLER`].
    pub fn is_wiped(&self) -> bool {
        self.bytes.iter().all(|&b| b == WIPE_FILLER)
    }
}

impl std::fmt::Debug for GeneratedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedSecret")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
