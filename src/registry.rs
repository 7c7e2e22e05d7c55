//! Rule registry for named rule factories.
//!
//! This module provides the [`RuleRegistry`] type that stores rule factories
//! under names, in registration order, so a fixed set of rules can be
//! declared once and run against many targets.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::Error;
use crate::rule::CreateRule;
use crate::validator::Validator;

/// Type alias for a shared rule factory.
pub type SharedRule<T> = Arc<dyn CreateRule<T>>;

/// Type alias for the rule storage map.
type RuleMap<T> = Arc<RwLock<IndexMap<String, SharedRule<T>>>>;

/// A thread-safe registry of named rule factories.
///
/// Rules run in the order they were registered, which makes the child order
/// of aggregated failures deterministic.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Validation works on a snapshot of the registered rules; the lock is not
/// held while rules are evaluated.
///
/// # Example
///
/// ```rust
/// use valdy::{Rule, RuleRegistry, Validator};
///
/// let registry: RuleRegistry<String> = RuleRegistry::new();
/// registry
///     .register("not_empty", |_: &String| {
///         Rule::new("should not be empty", |s: &String| !s.is_empty())
///     })
///     .unwrap();
/// registry
///     .register("short", |s: &String| {
///         Rule::new(format!("{:?} should be at most 8 chars", s), |s: &String| s.len() <= 8)
///     })
///     .unwrap();
///
/// let validator = Validator::new();
/// assert!(registry.validate_with(&validator, &"valdy".to_string()).is_ok());
/// assert!(registry.validate_with(&validator, &String::new()).is_err());
/// ```
pub struct RuleRegistry<T: ?Sized> {
    rules: RuleMap<T>,
}

impl<T: ?Sized> RuleRegistry<T> {
    /// Creates a new empty rule registry.
    pub fn new() -> Self {
        Self {
            rules: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Registers a rule factory with the given name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register<F>(&self, name: impl Into<String>, rule: F) -> Result<(), RegistryError>
    where
        F: CreateRule<T> + 'static,
    {
        let name = name.into();
        let mut rules = self.rules.write();

        if rules.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        rules.insert(name, Arc::new(rule));
        Ok(())
    }

    /// Retrieves a rule factory by name.
    pub fn get(&self, name: &str) -> Option<SharedRule<T>> {
        self.rules.read().get(name).cloned()
    }

    /// Returns true if a rule with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.read().contains_key(name)
    }

    /// Returns the registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.rules.read().keys().cloned().collect()
    }

    /// Returns the number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns true if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    /// Validates `target` against every registered rule, in registration order.
    pub fn validate_with(&self, validator: &Validator<T>, target: &T) -> Result<(), Error> {
        let rules: Vec<SharedRule<T>> = self.rules.read().values().cloned().collect();
        run(validator, target, &rules)
    }

    /// Validates `target` against the named rules only, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RuleNotFound` for the first name that is not
    /// registered; in that case no rule is evaluated.
    pub fn validate_only(
        &self,
        validator: &Validator<T>,
        target: &T,
        names: &[&str],
    ) -> Result<Result<(), Error>, RegistryError> {
        let rules = {
            let registered = self.rules.read();
            names
                .iter()
                .map(|name| {
                    registered
                        .get(*name)
                        .cloned()
                        .ok_or_else(|| RegistryError::RuleNotFound(name.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(run(validator, target, &rules))
    }
}

fn run<T: ?Sized>(validator: &Validator<T>, target: &T, rules: &[SharedRule<T>]) -> Result<(), Error> {
    let rules: Vec<&dyn CreateRule<T>> = rules.iter().map(|rule| rule.as_ref()).collect();
    validator.validate(target, &rules)
}

impl<T: ?Sized> Default for RuleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for RuleRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a rule with a name that already exists.
    #[error("rule '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to validate with a rule name that doesn't exist.
    #[error("rule '{0}' not found")]
    RuleNotFound(String),
}
