//! # Valdy
//!
//! Declarative, predicate-based validation whose failures are aggregated into
//! an introspectable error tree.
//!
//! ## Overview
//!
//! A [`Rule`] pairs a predicate with a message, and optionally with an error
//! identity. A [`Validator`] builds one rule per factory for a given target,
//! evaluates them either all at once ([`Mode::RUN_ALL`]) or until the first
//! failure ([`Mode::STOP_ON_FIRST_FAILURE`]), and reports failures as a
//! [`ValidationError`] tree. The tree can later be asked whether a given
//! rule failed ([`ValidationError::matches`]) or for the first failure of a
//! given type ([`ValidationError::find`]), without looking at messages.
//!
//! ## Core Types
//!
//! - [`ValidationError`]: Error tree with a message, an optional original error and children
//! - [`Sentinel`]: Identities matched by every validation failure or internal error
//! - [`Rule`] / [`Checker`]: A predicate with a message, and the capability to check a target
//! - [`CreateRule`]: Rule factories, implemented for every `Fn(&T) -> impl Checker<T>`
//! - [`Validator`] / [`Mode`]: Runs rule factories against a target
//! - [`RuleRegistry`]: Named, ordered rule factories shared across threads
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use valdy::{Rule, Sentinel, SharedError, Validator};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("person is not adult")]
//! struct NotAdult;
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let not_adult: SharedError = Arc::new(NotAdult);
//! let identity = not_adult.clone();
//! let is_adult = move |p: &Person| {
//!     Rule::new(format!("{} must be adult, age is {}", p.name, p.age), |p: &Person| p.age >= 18)
//!         .with_error(identity.clone())
//! };
//!
//! let validator: Validator<Person> = Validator::new();
//! let kid = Person { name: "Tim".to_string(), age: 12 };
//!
//! let error = validator.validate(&kid, &[&is_adult]).unwrap_err();
//! assert!(error.matches(&Sentinel::Validation));
//! assert!(error.matches(&*not_adult));
//! assert_eq!(error.to_string(), "validation has failed:\n\tTim must be adult, age is 12");
//! ```

pub mod error;
pub mod interop;
pub mod registry;
pub mod rule;
pub mod validator;

pub use error::{Error, Sentinel, SharedError, ValidationError};
pub use interop::ToJson;
pub use registry::{RegistryError, RuleRegistry, SharedRule};
pub use rule::{Checker, CreateRule, Rule};
pub use validator::{Mode, ModeParseError, Validator, FAILED_MESSAGE};
