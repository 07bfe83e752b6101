//! # x12-adapter
//!
//! X12 terminators, segment serialization and envelope assembly.
//!
//! This crate turns assembled segments into X12 text with configurable
//! terminators and builds the interchange, group and transaction set
//! envelopes around them.

pub mod envelopes;
pub mod segment;
pub mod syntax;
pub mod writer;

pub use segment::{Element, OutputSegment};
pub use syntax::Terminators;
pub use writer::SegmentWriter;

use thiserror::Error;

/// Errors that can occur when serializing X12
#[derive(Error, Debug)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
