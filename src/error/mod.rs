//! Error types for validation failures.
//!
//! This module provides the [`ValidationError`] tree that rule failures are
//! aggregated into, the [`Sentinel`] identities, and the crate-level
//! [`Error`] returned by a validator.

mod failure;
mod validation_error;

pub use failure::Error;
pub use validation_error::{Sentinel, SharedError, ValidationError};
