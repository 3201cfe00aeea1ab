//! # lrucache
//!
//! Thread-safe, fixed-capacity LRU cache keyed by strings.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to value and queue handle (O(1))
//! - **RecencyQueue**: arena-backed doubly-linked list from `lruqueue` (O(1))
//! - **Locking**: one `parking_lot::RwLock` over both, so every read or write
//!   updates index and recency order atomically
//!
//! ## Example
//!
//! ```
//! use lrucache::{Error, LruCache};
//!
//! let cache = LruCache::new(2).unwrap();
//! cache.write("a", 1);
//! cache.write("b", 2);
//! cache.read("a").unwrap(); // "a" is now most recently used
//! cache.write("c", 3); // evicts "b"
//!
//! assert_eq!(cache.read("b"), Err(Error::NotFound));
//! assert_eq!(cache.size(), 2);
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod stats;

pub use cache::{Cache, LruCache};
pub use config::CacheConfig;
pub use lruqueue::{Error, Result};
pub use stats::CacheStats;
