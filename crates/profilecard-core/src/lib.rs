//! Core library for profilecard.
//!
//! Fetches a random user profile, keeps the last one in a local cache and
//! exposes the fetch/cache lifecycle as a single observable [`LoadState`].
//!
//! - `models`: `User` and `LoadState`
//! - `api`: the `Fetcher` seam and the randomuser.me `ApiClient`
//! - `cache`: the `Store` seam, file/memory stores and the typed `CacheManager`
//! - `loader`: `UserLoader`, the cache-first / refresh state machine
//! - `config`: application configuration

pub mod api;
pub mod cache;
pub mod config;
pub mod loader;
pub mod models;

pub use api::{ApiClient, ApiError, Fetcher};
pub use cache::{CacheManager, FileStore, MemoryStore, Store, StoreError};
pub use config::Config;
pub use loader::{RefreshOutcome, UserLoader, FETCH_ERROR_MESSAGE};
pub use models::{LoadState, User};
