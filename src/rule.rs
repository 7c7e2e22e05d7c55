//! Rules: predicates with a message and an optional error identity.
//!
//! A [`Rule`] wraps a predicate over a target and the message reported when
//! the predicate rejects it. Rules are evaluated through the [`Checker`]
//! capability, and produced per target by rule factories ([`CreateRule`]),
//! so that messages can embed details of the value being validated.

use std::fmt;

use crate::error::{SharedError, ValidationError};

/// Something that can check a target.
///
/// `Send + Sync` so checkers and the factories producing them can be shared
/// across threads.
pub trait Checker<T: ?Sized>: Send + Sync {
    /// Checks `target`, returning the failure when it is rejected.
    fn check(&self, target: &T) -> Result<(), ValidationError>;
}

/// A rule factory: builds a checker bound to a specific target.
///
/// Implemented for every `Fn(&T) -> C` where `C` is a [`Checker`], so plain
/// functions and closures can be passed to a validator directly.
///
/// # Example
///
/// ```rust
/// use valdy::{Checker, CreateRule, Rule};
///
/// fn not_empty(target: &String) -> Rule<String> {
///     Rule::new(format!("{:?} should not be empty", target), |s: &String| !s.is_empty())
/// }
///
/// let checker = not_empty.create(&String::new());
/// assert!(checker.check(&String::new()).is_err());
/// ```
pub trait CreateRule<T: ?Sized>: Send + Sync {
    /// Builds the checker for `target`.
    fn create(&self, target: &T) -> Box<dyn Checker<T>>;
}

impl<T, F, C> CreateRule<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> C + Send + Sync,
    C: Checker<T> + 'static,
{
    fn create(&self, target: &T) -> Box<dyn Checker<T>> {
        Box::new(self(target))
    }
}

impl<T, C> Checker<T> for Box<C>
where
    T: ?Sized,
    C: Checker<T> + ?Sized,
{
    fn check(&self, target: &T) -> Result<(), ValidationError> {
        (**self).check(target)
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A predicate over `T` with a human-readable message.
///
/// When the predicate returns false, [`Checker::check`] fails with a
/// [`ValidationError`] carrying the message. Binding an error identity with
/// [`with_error`](Rule::with_error) lets callers later ask whether this
/// particular rule failed, independently of the message text.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use valdy::{Checker, Rule, Sentinel, SharedError};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("too short")]
/// struct TooShort;
///
/// let too_short: SharedError = Arc::new(TooShort);
/// let rule = Rule::new("name should have 3+ letters", |name: &str| name.chars().count() >= 3)
///     .with_error(too_short.clone());
///
/// assert!(rule.check("Ann").is_ok());
///
/// let error = rule.check("Al").unwrap_err();
/// assert_eq!(error.to_string(), "name should have 3+ letters");
/// assert!(error.matches(&*too_short));
/// assert!(error.matches(&Sentinel::Validation));
/// ```
pub struct Rule<T: ?Sized> {
    message: String,
    predicate: Predicate<T>,
    error: Option<SharedError>,
}

impl<T: ?Sized> Rule<T> {
    /// Creates a rule from a message and a predicate.
    ///
    /// The message may be empty. The predicate should be pure and handle
    /// every value of `T`.
    pub fn new<F>(message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            predicate: Box::new(predicate),
            error: None,
        }
    }

    /// Returns the message reported when the rule fails.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Binds an error identity reported when the rule fails.
    ///
    /// The rule comes back as a plain [`Checker`], ready to be returned from a
    /// rule factory.
    pub fn with_error(mut self, error: SharedError) -> impl Checker<T> {
        self.error = Some(error);
        self
    }

    fn failure(&self) -> ValidationError {
        match &self.error {
            Some(error) => ValidationError::tagged(self.message.clone(), error.clone()),
            None => ValidationError::leaf(self.message.clone()),
        }
    }
}

impl<T: ?Sized> Checker<T> for Rule<T> {
    fn check(&self, target: &T) -> Result<(), ValidationError> {
        if (self.predicate)(target) {
            Ok(())
        } else {
            Err(self.failure())
        }
    }
}

impl<T: ?Sized> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("message", &self.message)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::Sentinel;

    #[derive(Debug, thiserror::Error)]
    #[error("name is John")]
    struct NamedJohn;

    #[test]
    fn test_passing_rule_returns_ok() {
        let rule = Rule::new("name should be 5+ letters", |name: &str| {
            name.chars().count() >= 5
        });
        assert!(rule.check("Mikhail").is_ok());
    }

    #[test]
    fn test_failing_rule_carries_message() {
        let rule = Rule::new("Name should not be John!", |name: &str| name != "John");

        let error = rule.check("John").unwrap_err();
        assert_eq!(error.message(), "Name should not be John!");
        assert!(error.errors().is_empty());
        assert!(error.original().is_none());
        assert!(error.matches(&Sentinel::Validation));
    }

    #[test]
    fn test_empty_message_is_allowed() {
        let rule = Rule::new("", |name: &str| name != "John");
        let error = rule.check("John").unwrap_err();
        assert_eq!(error.to_string(), "");
    }

    #[test]
    fn test_bound_error_is_matched() {
        let identity: SharedError = Arc::new(NamedJohn);
        let other: SharedError = Arc::new(NamedJohn);
        let checker = Rule::new("Name should not be John!", |name: &str| name != "John")
            .with_error(identity.clone());

        let error = checker.check("John").unwrap_err();
        assert!(error.matches(&*identity));
        assert!(!error.matches(&*other));
        assert!(error.find::<NamedJohn>().is_some());
        assert_eq!(error.to_string(), "Name should not be John!");
    }

    #[test]
    fn test_factory_embeds_target() {
        let factory = |name: &String| Rule::new(format!("{} is not allowed", name), |_: &String| false);

        let checker = factory.create(&"Ivan".to_string());
        let error = checker.check(&"Ivan".to_string()).unwrap_err();
        assert_eq!(error.message(), "Ivan is not allowed");
    }

    #[test]
    fn test_debug_shows_message() {
        let rule = Rule::new("must be positive", |n: &i32| *n > 0);
        assert!(format!("{:?}", rule).contains("must be positive"));
    }
}
