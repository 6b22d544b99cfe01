//! HTTP API layer for RateIt.
//!
//! This crate provides the REST API served under `/api`:
//!
//! - **Endpoints**: catalog, accounts, friends, posts, comments, watchlists
//!   and recommendations
//! - **Extractors**: JSON, query and path extractors that reject malformed
//!   input with the standard error envelope
//! - **State**: [`middleware::AppState`] wiring services to handlers
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
