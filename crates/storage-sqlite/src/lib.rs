//! SQLite storage implementation for the EnergyCoop API.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `energycoop-core` and contains:
//! - Database connection pooling and the single-writer actor
//! - Diesel migrations
//! - Repository implementations for every domain entity
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate and the HTTP server work with traits only.
//!
//! ```text
//!   core (domain)      apps/server (HTTP)
//!         │                   │
//!         └─────────┬─────────┘
//!                   │
//!                   ▼
//!         storage-sqlite (this crate)
//!                   │
//!                   ▼
//!               SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod balances;
pub mod catalog;
pub mod content;
pub mod gamification;
pub mod geography;
pub mod organizations;
pub mod user_assets;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, Database,
    DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from energycoop-core for convenience
pub use energycoop_core::errors::{DatabaseError, Error, Result};
