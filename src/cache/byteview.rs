//! Byte Value Module
//!
//! Immutable byte buffer handed out by groups.

use std::fmt;
use std::sync::Arc;

use crate::cache::ByteSize;

// == Byte Value ==
/// An immutable view over cached bytes.
///
/// Clones share the same buffer; owning reads (`to_vec`) always return a fresh
/// copy so callers can never mutate what the cache holds.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteValue {
    bytes: Arc<[u8]>,
}

impl ByteValue {
    // == Constructor ==
    /// Copies `bytes` into a new immutable value.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    // == Length ==
    /// Returns the number of bytes held.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the value holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == Reads ==
    /// Returns a copy of the bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Borrows the bytes without copying.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Renders the bytes as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl From<Vec<u8>> for ByteValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&str> for ByteValue {
    fn from(s: &str) -> Self {
        Self::copy_from(s.as_bytes())
    }
}

impl ByteSize for ByteValue {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl fmt::Display for ByteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Default for ByteValue {
    fn default() -> Self {
        Self {
            bytes: Arc::from(Vec::new()),
        }
    }
}

impl fmt::Debug for ByteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteValue({:?})", self.to_string_lossy())
    }
}
