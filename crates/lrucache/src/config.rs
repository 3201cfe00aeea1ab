//! Cache configuration

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Construction parameters for an [`LruCache`](crate::LruCache)
///
/// Deserializable from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries. Must be at least 1.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Label attached to this cache's log events.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_capacity() -> usize {
    1024
}

fn default_name() -> String {
    "lru".into()
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: default_capacity(),
            name: default_name(),
        }
    }
}

impl CacheConfig {
    /// Config with the given capacity and the default name
    pub fn new(capacity: usize) -> Self {
        CacheConfig {
            capacity,
            ..Default::default()
        }
    }

    /// Set the log label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reject a zero capacity
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}
