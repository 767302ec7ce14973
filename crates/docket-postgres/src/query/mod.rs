//! Repository queries.

mod document;

pub use document::DocumentRepository;
