#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod error;
mod store;

pub mod model;
pub mod query;
pub mod schema;

pub use client::{PgClient, PgConfig, run_pending_migrations};
pub use error::{PgError, PgResult};
pub use store::PgDocumentStore;

/// Tracing target for database operations.
pub const TRACING_TARGET: &str = "docket_postgres";
