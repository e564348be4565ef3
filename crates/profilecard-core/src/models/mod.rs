//! Data models for the profile widget.
//!
//! - `User`: the profile record shown to the user and stored in the cache
//! - `RandomUserResponse`: wire format of the randomuser.me API
//! - `LoadState`: what is currently displayable

pub mod load_state;
pub mod user;

pub use load_state::LoadState;
pub use user::{RandomUserResponse, User};
