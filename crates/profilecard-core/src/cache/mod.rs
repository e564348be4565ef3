//! Local caching module for the last fetched user.
//!
//! This module provides the `Store` key-value seam with two backends and the
//! `CacheManager` that owns the single cache record. The record survives
//! restarts when the `FileStore` is used; there is no expiration policy.

pub mod manager;
pub mod store;

pub use manager::{CacheManager, CachedData, USER_CACHE_KEY};
pub use store::{FileStore, MemoryStore, Store, StoreError};
