//! REST API client module for the randomuser.me service.
//!
//! This module provides the `Fetcher` seam used by the loader and the
//! `ApiClient` that implements it over HTTP. The API is anonymous and
//! returns one arbitrary user per GET request.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::ApiError;

use async_trait::async_trait;

use crate::models::User;

/// Capability that performs the network call and returns one user.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_user(&self) -> Result<User, ApiError>;
}
