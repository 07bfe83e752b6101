#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12-ir
//!
//! Validation result tree and traversal APIs for X12 acknowledgment
//! generation.
//!
//! An upstream validator records pass/fail status for an interchange, its
//! functional groups, transaction sets, segments and elements. This crate
//! holds that record in typed nodes and walks it in the fixed order the
//! acknowledgment generator depends on.

/// Validation findings, acknowledgment codes and envelope origins.
pub mod metadata;
/// Result nodes, one per envelope level.
pub mod node;
/// Fixed-order walk over the result tree.
pub mod traversal;

/// Finding primitives.
pub use metadata::{AckCode, EnvelopeSegment, ErrorRecord, Level};
/// Result nodes and envelope contexts.
pub use node::{
    ElementResult, GroupResult, GsHeader, InterchangeResult, IsaHeader, SegmentResult,
    TransactionResult,
};
/// Traversal entry points.
pub use traversal::{ResultNode, Traversal, walk};

use thiserror::Error;

/// Errors that can occur when reading the validation tree
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transaction set {set_id} ({control_number}) has no acknowledgment code")]
    MissingAckCode {
        set_id: String,
        control_number: String,
    },

    #[error("Malformed validation tree: {0}")]
    MalformedTree(String),
}

impl Error {
    /// Build a missing-ack-code error for a transaction set.
    pub fn missing_ack_code(set_id: impl Into<String>, control_number: impl Into<String>) -> Self {
        Self::MissingAckCode {
            set_id: set_id.into(),
            control_number: control_number.into(),
        }
    }

    /// Build a malformed-tree error with context.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedTree(message.into())
    }
}

/// Crate-local result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;
