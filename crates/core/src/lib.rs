//! EnergyCoop Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the cooperative API: the
//! balance ledger, portfolio valuation, catalog scoring, gamification and
//! site content. It is database-agnostic and defines repository traits that
//! are implemented by the `storage-sqlite` crate.

pub mod access;
pub mod balances;
pub mod catalog;
pub mod constants;
pub mod content;
pub mod errors;
pub mod gamification;
pub mod geography;
pub mod organizations;
pub mod pagination;
pub mod ranking;
pub mod user_assets;
pub mod users;
pub mod validation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
