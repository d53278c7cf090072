//! Hash Ring Module
//!
//! Consistent hashing with virtual nodes.

use std::collections::HashMap;
use std::fmt;

use crate::error::{CacheError, Result};

/// Hash function used to place virtual nodes and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Default ring hash: CRC-32 (IEEE).
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// == Hash Ring ==
/// Maps keys to owners by walking clockwise to the nearest virtual node.
///
/// Each owner occupies `replicas` positions at `hash("{i}{owner}")` for
/// `i in 0..replicas`.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node hashes
    keys: Vec<u32>,
    /// Virtual node hash to owner
    owners: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring.
    ///
    /// # Arguments
    /// * `replicas` - Virtual nodes per owner, must be positive
    /// * `hash` - Custom hash function, CRC-32 when `None`
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Result<Self> {
        if replicas == 0 {
            return Err(CacheError::InvalidConfig(
                "hash ring needs at least one replica per owner".to_string(),
            ));
        }
        Ok(Self {
            hash: hash.unwrap_or(crc32),
            replicas,
            keys: Vec::new(),
            owners: HashMap::new(),
        })
    }

    // == Add ==
    /// Places every owner's virtual nodes on the ring.
    pub fn add<I, S>(&mut self, owners: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for owner in owners {
            let owner = owner.as_ref();
            for i in 0..self.replicas {
                let hash = self.virtual_hash(i, owner);
                // A colliding position keeps a single slot; the later owner wins.
                if self.owners.insert(hash, owner.to_string()).is_none() {
                    self.keys.push(hash);
                }
            }
        }
        self.keys.sort_unstable();
    }

    // == Remove ==
    /// Takes an owner's virtual nodes off the ring.
    pub fn remove(&mut self, owner: &str) {
        let owners = &mut self.owners;
        self.keys.retain(|hash| {
            if owners.get(hash).map(String::as_str) == Some(owner) {
                owners.remove(hash);
                false
            } else {
                true
            }
        });
    }

    // == Get ==
    /// Returns the owner of `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&vnode| vnode < hash);
        let vnode = self.keys[idx % self.keys.len()];
        self.owners.get(&vnode).map(String::as_str)
    }

    // == Accessors ==
    /// Distinct owners currently on the ring, sorted.
    pub fn owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = self.owners.values().map(String::as_str).collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    fn virtual_hash(&self, i: usize, owner: &str) -> u32 {
        (self.hash)(format!("{}{}", i, owner).as_bytes())
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .field("owners", &self.owners())
            .finish()
    }
}
