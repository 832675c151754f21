//! Token stream memoization.
//!
//!     A pure memoization layer fronting the scanners: the key is a hash of
//!     the content plus the options that affect tokenization (grammar
//!     identity, scanner choice), the value is the produced token stream.
//!     Same key implies same value — tokenization is deterministic — and
//!     clearing the cache at any time affects only performance, never
//!     correctness.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::trace;

use crate::tokenizer::Token;

/// The options that participate in the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheOptions {
    /// Grammar identity (language name)
    pub language: String,
    /// Whether the fast-path scanner produces the stream
    pub fast: bool,
}

/// Content-addressed cache of token streams.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: HashMap<u64, Arc<Vec<Vec<Token>>>>,
}

impl TokenCache {
    pub fn new() -> TokenCache {
        TokenCache::default()
    }

    /// Fetch the stream for (content, options), producing and storing it on
    /// a miss.
    pub fn get_or_insert_with<F>(
        &mut self,
        content: &str,
        options: &CacheOptions,
        produce: F,
    ) -> Arc<Vec<Vec<Token>>>
    where
        F: FnOnce() -> Vec<Vec<Token>>,
    {
        let key = cache_key(content, options);
        if let Some(hit) = self.entries.get(&key) {
            trace!("token cache hit for {} ({} bytes)", options.language, content.len());
            return Arc::clone(hit);
        }
        let value = Arc::new(produce());
        self.entries.insert(key, Arc::clone(&value));
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Purely a performance decision for the caller.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn cache_key(content: &str, options: &CacheOptions) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    options.hash(&mut hasher);
    hasher.finish()
}
