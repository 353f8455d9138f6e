//! HTTP API layer for pulse.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: resource-oriented JSON handlers per entity
//! - **Pagination**: shared limit/offset query validation
//! - **State**: the service container handlers pull from
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod pagination;
pub mod response;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
