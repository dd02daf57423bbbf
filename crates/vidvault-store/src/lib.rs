//! Video catalog persistence.
//!
//! This crate provides:
//! - The [`VideoStore`] data access trait (list newest-first, delete by ID)
//! - A PostgreSQL implementation backed by sqlx
//! - An in-memory implementation for development and tests
//! - Connection configuration read from `DATABASE_URL`

pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod postgres;
pub mod repo;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryVideoStore;
pub use postgres::PgVideoStore;
pub use repo::{connect, VideoStore};
