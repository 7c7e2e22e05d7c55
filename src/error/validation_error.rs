//! Error tree for aggregated validation failures.
//!
//! This module provides [`ValidationError`], a composite error that holds a
//! message, an optional original identity error and an ordered set of child
//! errors, along with the [`Sentinel`] identities every failure can be
//! matched against.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::ptr;
use std::sync::Arc;

use super::Error;

/// A shareable, type-erased error.
///
/// Identity of a shared error is its allocation: two `SharedError`s pointing
/// at the same allocation are the same error for matching purposes.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Well-known identities that failures can be matched against.
///
/// Sentinels compare by value, so any `Sentinel::Validation` is the
/// validation-failed sentinel.
///
/// # Example
///
/// ```rust
/// use valdy::{Sentinel, ValidationError};
///
/// let error = ValidationError::leaf("name is empty");
/// assert!(error.matches(&Sentinel::Validation));
/// assert!(!error.matches(&Sentinel::Internal));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Sentinel {
    /// Matched by every [`ValidationError`], whatever it contains.
    #[error("validation error")]
    Validation,
    /// Matched by failures that are not caused by a rule rejecting a target.
    #[error("internal error")]
    Internal,
}

impl Sentinel {
    /// Returns this sentinel as a [`SharedError`].
    pub fn shared(self) -> SharedError {
        Arc::new(self)
    }
}

/// An error tree describing why validation failed.
///
/// A `ValidationError` has a root message, an optional original error it
/// stands for, and zero or more child errors. Children may themselves be
/// `ValidationError`s, so failures nest naturally: a root "validation has
/// failed" node wraps one node per failed rule.
///
/// Two query surfaces are available:
/// - [`matches`](Self::matches): does this tree contain a given error identity?
/// - [`find`](Self::find): the first error of a given type in preorder.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use valdy::{SharedError, ValidationError};
///
/// let missing: SharedError = Arc::new(std::fmt::Error);
/// let error = ValidationError::new(
///     "validation has failed",
///     [Some(ValidationError::leaf("name is empty").into_shared()), None, Some(missing.clone())],
/// );
///
/// assert_eq!(error.errors().len(), 2);
/// assert!(error.matches(&*missing));
/// assert_eq!(
///     error.to_string(),
///     "validation has failed:\n\tname is empty\n\tan error occurred when formatting an argument"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    message: String,
    original: Option<SharedError>,
    errors: Vec<SharedError>,
}

impl ValidationError {
    /// Creates an error tree with the given message and child errors.
    ///
    /// Children are accepted either as [`SharedError`] or as
    /// `Option<SharedError>`; `None` entries are dropped and the order of the
    /// remaining ones is kept.
    pub fn new<I>(message: impl Into<String>, errors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<SharedError>>,
    {
        Self {
            message: message.into(),
            original: None,
            errors: present(errors),
        }
    }

    /// Creates an error tree with a message and no children.
    pub fn leaf(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            original: None,
            errors: Vec::new(),
        }
    }

    /// Lifts an existing error into an error tree.
    ///
    /// - `None` produces an empty-message tree holding `errors`.
    /// - A `ValidationError` is returned as is and `errors` is ignored.
    /// - Any other error becomes the tree's original: its message is reused
    ///   as the root message and [`matches`](Self::matches) recognises it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use valdy::{SharedError, ValidationError};
    ///
    /// let original: SharedError = Arc::new(std::fmt::Error);
    /// let lifted = ValidationError::from_error(Some(original.clone()), Vec::<SharedError>::new());
    ///
    /// assert_eq!(lifted.message(), original.to_string());
    /// assert!(lifted.matches(&*original));
    /// ```
    pub fn from_error<I>(original: Option<SharedError>, errors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<SharedError>>,
    {
        let Some(original) = original else {
            return Self::new("", errors);
        };

        if let Some(tree) = original.downcast_ref::<ValidationError>() {
            return tree.clone();
        }

        Self {
            message: original.to_string(),
            original: Some(original),
            errors: present(errors),
        }
    }

    /// Creates a childless tree that keeps its own message but stands for
    /// `original` when matched.
    pub(crate) fn tagged(message: impl Into<String>, original: SharedError) -> Self {
        Self {
            message: message.into(),
            original: Some(original),
            errors: Vec::new(),
        }
    }

    /// Returns the root message, displayed first when rendering.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the original error this tree was lifted from, if any.
    pub fn original(&self) -> Option<&SharedError> {
        self.original.as_ref()
    }

    /// Returns the child errors in insertion order.
    pub fn errors(&self) -> &[SharedError] {
        &self.errors
    }

    /// Wraps this tree into a [`SharedError`] so it can be nested into
    /// another tree.
    pub fn into_shared(self) -> SharedError {
        Arc::new(self)
    }

    /// Reports whether `target` is this tree or is contained in it.
    ///
    /// Returns true when:
    /// - `target` is [`Sentinel::Validation`];
    /// - `target` is a `ValidationError` equal to this one (same message and
    ///   the very same child allocations);
    /// - the original error, or anything reachable from it, is `target`;
    /// - any child, searched depth-first, is or contains `target`.
    pub fn matches(&self, target: &(dyn StdError + 'static)) -> bool {
        if let Some(Sentinel::Validation) = target.downcast_ref::<Sentinel>() {
            return true;
        }

        if let Some(other) = target.downcast_ref::<ValidationError>() {
            if self == other {
                return true;
            }
        }

        if let Some(original) = &self.original {
            if chain_matches(original.as_ref(), target) {
                return true;
            }
        }

        self.errors
            .iter()
            .any(|err| chain_matches(err.as_ref(), target))
    }

    /// Finds the first error of type `E` in a preorder traversal.
    ///
    /// The tree itself is tried first, then its original error, then every
    /// child in order, descending into nested trees and `source()` chains.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use valdy::ValidationError;
    ///
    /// let error = ValidationError::new("validation has failed", [
    ///     ValidationError::leaf("inner").into_shared(),
    ///     Arc::new(std::fmt::Error) as valdy::SharedError,
    /// ]);
    ///
    /// assert!(error.find::<std::fmt::Error>().is_some());
    /// assert!(error.find::<std::io::Error>().is_none());
    /// ```
    pub fn find<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        if let Some(found) = (self as &(dyn StdError + 'static)).downcast_ref::<E>() {
            return Some(found);
        }

        self.original
            .as_deref()
            .and_then(|original| find_in_chain::<E>(original))
            .or_else(|| {
                self.errors
                    .iter()
                    .find_map(|err| find_in_chain::<E>(err.as_ref()))
            })
    }
}

/// Trees are equal when their messages are equal and their children are the
/// same allocations in the same order. Children are not compared deeply.
impl PartialEq for ValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.errors.len() == other.errors.len()
            && self
                .errors
                .iter()
                .zip(&other.errors)
                .all(|(a, b)| same_allocation(a.as_ref(), b.as_ref()))
    }
}

impl Eq for ValidationError {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        if !self.errors.is_empty() {
            f.write_str(":")?;
            for err in &self.errors {
                write!(f, "\n\t{}", err)?;
            }
        }

        Ok(())
    }
}

impl StdError for ValidationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.original
            .as_deref()
            .map(|original| original as &(dyn StdError + 'static))
    }
}

// ValidationError is shared across threads inside Arc'd trees; children are
// required to be Send + Sync by SharedError.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
    assert_send::<Sentinel>();
    assert_sync::<Sentinel>();
};

fn present<I>(errors: I) -> Vec<SharedError>
where
    I: IntoIterator,
    I::Item: Into<Option<SharedError>>,
{
    errors.into_iter().filter_map(Into::into).collect()
}

fn same_allocation(a: &(dyn StdError + 'static), b: &(dyn StdError + 'static)) -> bool {
    ptr::eq(
        a as *const dyn StdError as *const (),
        b as *const dyn StdError as *const (),
    )
}

fn same_identity(err: &(dyn StdError + 'static), target: &(dyn StdError + 'static)) -> bool {
    if same_allocation(err, target) {
        return true;
    }

    matches!(
        (err.downcast_ref::<Sentinel>(), target.downcast_ref::<Sentinel>()),
        (Some(a), Some(b)) if a == b
    )
}

/// Walks `err` and its `source()` chain looking for `target`. Nested trees
/// and nested validator results answer for themselves.
fn chain_matches(err: &(dyn StdError + 'static), target: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);

    while let Some(err) = current {
        if same_identity(err, target) {
            return true;
        }
        if let Some(tree) = err.downcast_ref::<ValidationError>() {
            return tree.matches(target);
        }
        if let Some(failure) = err.downcast_ref::<Error>() {
            return failure.matches(target);
        }
        current = err.source();
    }

    false
}

fn find_in_chain<'a, E>(err: &'a (dyn StdError + 'static)) -> Option<&'a E>
where
    E: StdError + 'static,
{
    let mut current = Some(err);

    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<E>() {
            return Some(found);
        }
        if let Some(tree) = err.downcast_ref::<ValidationError>() {
            return tree.find::<E>();
        }
        if let Some(failure) = err.downcast_ref::<Error>() {
            return failure.find::<E>();
        }
        current = err.source();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("wrapped: {inner}")]
    struct Wrapper {
        #[source]
        inner: std::fmt::Error,
    }

    fn shared<E: StdError + Send + Sync + 'static>(err: E) -> SharedError {
        Arc::new(err)
    }

    #[test]
    fn test_new_filters_absent_children() {
        let a = shared(std::fmt::Error);
        let b = ValidationError::leaf("b").into_shared();

        let error = ValidationError::new(
            "msg",
            [None, Some(a.clone()), None, Some(b.clone()), None],
        );

        assert_eq!(error.errors().len(), 2);
        assert!(Arc::ptr_eq(&error.errors()[0], &a));
        assert!(Arc::ptr_eq(&error.errors()[1], &b));
        assert!(error.original().is_none());
    }

    #[test]
    fn test_display_without_children() {
        let error = ValidationError::leaf("only message");
        assert_eq!(error.to_string(), "only message");
    }

    #[test]
    fn test_display_nests_with_single_tab() {
        let inner = ValidationError::new(
            "inner",
            [ValidationError::leaf("deep").into_shared()],
        );
        let outer = ValidationError::new("outer", [inner.into_shared()]);

        assert_eq!(outer.to_string(), "outer:\n\tinner:\n\tdeep");
    }

    #[test]
    fn test_equality_requires_same_child_allocations() {
        let child = ValidationError::leaf("child").into_shared();

        let a = ValidationError::new("root", [child.clone()]);
        let b = ValidationError::new("root", [child]);
        let c = ValidationError::new("root", [ValidationError::leaf("child").into_shared()]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_ignores_original() {
        let original = shared(std::fmt::Error);
        let lifted = ValidationError::from_error(Some(original.clone()), Vec::<SharedError>::new());
        let plain = ValidationError::leaf(original.to_string());

        assert_eq!(lifted, plain);
    }

    #[test]
    fn test_matches_follows_source_chain() {
        let wrapper = shared(Wrapper {
            inner: std::fmt::Error,
        });
        let error = ValidationError::new("root", [wrapper.clone()]);

        assert!(error.matches(&*wrapper));
        assert!(error.find::<std::fmt::Error>().is_some());
        assert!(error.find::<Wrapper>().is_some());
    }

    #[test]
    fn test_sentinels_compare_by_value() {
        let error = ValidationError::new("root", [Sentinel::Internal.shared()]);

        assert!(error.matches(&Sentinel::Validation));
        assert!(error.matches(&Sentinel::Internal));
    }

    #[test]
    fn test_find_self_first() {
        let error = ValidationError::new("root", [ValidationError::leaf("child").into_shared()]);
        let found = error.find::<ValidationError>().unwrap();
        assert_eq!(found.message(), "root");
    }

    #[test]
    fn test_source_is_original() {
        let original = shared(std::fmt::Error);
        let lifted = ValidationError::from_error(Some(original), Vec::<SharedError>::new());

        let source = lifted.source().unwrap();
        assert!(source.downcast_ref::<std::fmt::Error>().is_some());
        assert!(ValidationError::leaf("x").source().is_none());
    }
}
