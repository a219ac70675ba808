//! Jira tracker client and wire types.
//!
//! - [`TrackerClient`]: holds credentials, validates them, and fetches stories
//! - [`types`]: raw REST v3 response shapes and their mapping onto [`Story`]
//! - [`TrackerError`]: failure taxonomy, converted to booleans or
//!   [`ApiResult`] errors at the client boundary
//!
//! [`Story`]: crate::models::Story
//! [`ApiResult`]: crate::models::ApiResult

mod client;
mod error;
pub mod types;

pub use client::{TrackerClient, MAX_RESULTS};
pub use error::TrackerError;
pub use types::CurrentUser;
