//! Interoperability with other error formats.
//!
//! This module provides structured export of validation failures, for
//! callers that report them through APIs rather than as rendered text.

pub mod json;

pub use json::ToJson;
