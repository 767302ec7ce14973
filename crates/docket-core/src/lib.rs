#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod namespace;
mod retry;

pub mod ai;
pub mod extract;
pub mod split;
pub mod types;

#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use namespace::Namespace;
pub use retry::{RetryPolicy, retry_with_backoff};

pub use crate::ai::{
    AiServices, AnswerGenerator, OcrTranscriber, SharedAnswerGenerator, SharedOcrTranscriber,
    SharedTextEmbedder, TextEmbedder,
};
pub use crate::extract::ContentKind;
pub use crate::split::Chunker;
pub use crate::types::{Document, DocumentChunk, normalize_labels};
