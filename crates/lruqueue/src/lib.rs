//! # lruqueue
//!
//! Bounded recency queue used as the ordering half of an LRU cache.
//!
//! ## Architecture
//! - **Arena**: nodes stored in a `Vec` slot arena with a free list
//! - **Links**: doubly-linked by slot index, exposed as [`NodeId`] handles
//! - **Eviction**: adding to a full queue drops the head and reports its key
//!
//! All operations except iteration are O(1).

#![warn(missing_docs)]

mod error;
mod queue;

pub use error::{Error, Result};
pub use queue::{Iter, NodeId, NodeRef, RecencyQueue};
