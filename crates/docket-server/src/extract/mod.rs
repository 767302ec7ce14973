//! Request extractors.

mod auth;

pub use auth::AuthAccount;
