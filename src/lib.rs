//! Fetch a web article, strip it down to its main text and build a short
//! extractive summary from its most representative sentences.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod model;
pub mod service;
pub mod summarizer;
pub mod util;

pub use error::{DigestError, DigestResult, ErrorKind};
pub use extractor::Extractor;
pub use service::digest::{Digest, Pipeline};
pub use summarizer::{summarize, Summarizer};
