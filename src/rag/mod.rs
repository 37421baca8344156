//! Retrieval-augmented generation pipelines.
//!
//! - `chunker`: paragraph splitting for ingestion
//! - `ingest`: offline directory-to-index pipeline
//! - `engine`: request-time embed, retrieve, answer pipeline

pub mod chunker;
pub mod engine;
pub mod ingest;

pub use engine::{RagEngine, DEFAULT_TOP_K};
pub use ingest::{ingest_directory, IngestSummary};
