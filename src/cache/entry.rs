//! Cache Entry Module
//!
//! Defines the sized value contract and the entries kept by the bounded store.

// == Byte Size ==
/// Anything the store can account for by byte length.
pub trait ByteSize {
    /// Number of bytes this value counts against the budget.
    fn byte_len(&self) -> usize;
}

impl ByteSize for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

// == Cache Entry ==
/// A single key/value pair owned by the store.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The entry key
    pub key: String,
    /// The stored value
    pub value: V,
}

impl<V: ByteSize> CacheEntry<V> {
    // == Constructor ==
    pub fn new(key: String, value: V) -> Self {
        Self { key, value }
    }

    // == Size ==
    /// Bytes this entry counts against the budget: key length plus value length.
    pub fn size(&self) -> usize {
        entry_size(&self.key, &self.value)
    }
}

/// Size of a key/value pair as accounted by the store.
pub fn entry_size<V: ByteSize>(key: &str, value: &V) -> usize {
    key.len() + value.byte_len()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_size_counts_key_and_value() {
        let entry = CacheEntry::new("ab".to_string(), "1234".to_string());
        assert_eq!(entry.size(), 6);
    }

    #[test]
    fn test_entry_size_counts_utf8_bytes() {
        // "é" is two bytes
        let entry = CacheEntry::new("é".to_string(), vec![0u8; 3]);
        assert_eq!(entry.size(), 5);
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(entry_size("key", &String::new()), 3);
    }
}
