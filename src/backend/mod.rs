//! HTTP boundary to the tournament backend. The bracket logic never calls it; callers fetch
//! rounds here and hand them to the pure functions in [`crate::logic`].

mod client;

pub use client::{ApiError, ApiResult, BackendClient, TokenRefresh};
