#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;

pub use client::OcrClient;
pub use config::OcrConfig;
pub use error::{Error, Result};

/// Tracing target for OCR client operations.
pub const TRACING_TARGET: &str = "docket_ocr";
