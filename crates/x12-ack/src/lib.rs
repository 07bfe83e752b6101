//! # x12-ack
//!
//! X12 999 Implementation Acknowledgment generation.
//!
//! This crate walks a validation result tree and writes the 999 that
//! reports it back to the submitter: AK1/AK2 headers, IK3/IK4 error
//! identification, AK5/AK9 trailers, the ISA/GS/ST envelopes and an
//! optional TA1 interchange acknowledgment.
//!
//! ```no_run
//! use x12_ack::{AckConfig, generate_999};
//! use x12_ir::InterchangeResult;
//!
//! let tree: InterchangeResult = serde_json::from_str("{}")?;
//! let ack = generate_999(&tree, &AckConfig::default())?;
//! print!("{ack}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codes;
pub mod config;
pub mod control;
pub mod generator;
pub mod segments;

pub use config::AckConfig;
pub use control::{Clock, ControlNumbers, FixedClock, LocalClock};
pub use generator::AckGenerator;

use thiserror::Error;
use x12_ir::InterchangeResult;

/// Errors that can occur while generating an acknowledgment
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation tree error: {0}")]
    Tree(#[from] x12_ir::Error),

    #[error("Output error: {0}")]
    Output(#[from] x12_adapter::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Generate a 999 for `tree`, stamped with the local time
///
/// Nothing is returned unless the whole acknowledgment was written.
///
/// # Errors
///
/// See [`AckGenerator::generate`].
pub fn generate_999(tree: &InterchangeResult, config: &AckConfig) -> Result<String> {
    generate_999_with_clock(tree, config, LocalClock)
}

/// Generate a 999 for `tree` using an explicit clock
///
/// # Errors
///
/// See [`AckGenerator::generate`].
pub fn generate_999_with_clock<C: Clock>(
    tree: &InterchangeResult,
    config: &AckConfig,
    clock: C,
) -> Result<String> {
    let mut generator = AckGenerator::with_clock(Vec::new(), config, clock)?;
    generator.generate(tree)?;
    let bytes = generator.finish()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
