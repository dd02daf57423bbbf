//! Axum HTTP server for the vidvault catalog.
//!
//! This crate provides:
//! - The access-control guard deciding allow/redirect per request
//! - Session token verification against the auth provider
//! - Video list/delete JSON routes and server-rendered pages
//! - The video card view
//! - Rate limiting, security headers and Prometheus metrics

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

pub use access::{AccessDecision, AccessPolicy};
pub use auth::{AuthUser, SessionVerifier};
pub use config::{ApiConfig, AuthConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
