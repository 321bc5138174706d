//! Kernel cache implementation
//!
//! LRU cache for kernel values of one binary subproblem. Kernel matrices are
//! symmetric, so K(i,j) and K(j,i) share one entry.

use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key for kernel values, normalized so that i <= j
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    i: usize,
    j: usize,
}

impl CacheKey {
    fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { i, j }
        } else {
            Self { i: j, j: i }
        }
    }
}

/// LRU cache for kernel matrix values
pub struct KernelCache {
    cache: LruCache<CacheKey, f64>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a new kernel cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a kernel cache sized from a memory budget in bytes
    pub fn with_memory_limit(memory_bytes: usize) -> Self {
        // key + value + list overhead
        Self::new((memory_bytes / 32).max(1))
    }

    /// Look up K(i, j)
    pub fn get(&mut self, i: usize, j: usize) -> Option<f64> {
        if let Some(&value) = self.cache.get(&CacheKey::new(i, j)) {
            self.hits += 1;
            Some(value)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Store K(i, j)
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        self.cache.put(CacheKey::new(i, j), value);
    }

    /// Look up K(i, j), computing and storing it on a miss
    pub fn get_or_compute<F: FnOnce() -> f64>(&mut self, i: usize, j: usize, compute: F) -> f64 {
        match self.get(i, j) {
            Some(value) => value,
            None => {
                let value = compute();
                self.put(i, j, value);
                value
            }
        }
    }

    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}
