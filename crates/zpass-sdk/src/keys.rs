use std::collections::{HashMap, VecDeque};

use sha3::{Digest, Keccak256};

use zpass_types::KeyPair;

/// Digest of a program source, used to detect that a cached key pair was
/// synthesized against a stale edition of the program.
pub fn program_digest(source: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(source.as_bytes());
    hasher.finalize().into()
}

struct CacheEntry {
    keys: KeyPair,
    digest: [u8; 32],
}

/// Bounded least-recently-used cache of synthesized proving/verifying keys.
///
/// Entries are keyed by `program:function` and carry the digest of the
/// program source they were built from. A lookup only hits when both the
/// key and the digest match, so republishing a program under the same name
/// forces resynthesis instead of serving keys for the old body.
pub struct KeyCache {
    capacity: usize,
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
}

impl KeyCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached keys if present and built from the same program
    /// body, promoting the entry to most recently used.
    pub fn get_if_current(&mut self, cache_key: &str, digest: [u8; 32]) -> Option<KeyPair> {
        let entry = self.entries.get(cache_key)?;
        if entry.digest != digest {
            return None;
        }
        let keys = entry.keys.clone();
        self.touch(cache_key);
        Some(keys)
    }

    pub fn insert(&mut self, cache_key: String, digest: [u8; 32], keys: KeyPair) {
        if self.entries.insert(cache_key.clone(), CacheEntry { keys, digest }).is_some() {
            self.touch(&cache_key);
        } else {
            self.order.push_back(cache_key);
        }

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    fn touch(&mut self, cache_key: &str) {
        if let Some(position) = self.order.iter().position(|k| k == cache_key) {
            if let Some(key) = self.order.remove(position) {
                self.order.push_back(key);
            }
        }
    }
}
