//! The error returned by [`Validator::validate`](crate::Validator::validate).

use std::error::Error as StdError;

use crate::error::{Sentinel, ValidationError};
use crate::validator::Mode;

/// Failure of a validation call.
///
/// The two variants never overlap: rules rejecting a target always produce
/// [`Error::Validation`], and a misconfigured validator always produces
/// [`Error::UnknownMode`] without evaluating anything.
///
/// # Example
///
/// ```rust
/// use valdy::{Error, Mode, Sentinel, Validator};
///
/// let validator: Validator<str> = Validator::with_mode(Mode::from(999));
/// let error = validator.validate("anything", &[]).unwrap_err();
///
/// assert!(error.is_internal());
/// assert!(error.matches(&Sentinel::Internal));
/// assert!(!error.matches(&Sentinel::Validation));
/// assert_eq!(error.to_string(), "internal error: no such mode 999 for validator");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more rules rejected the target.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The validator holds a mode it does not know how to run.
    #[error("internal error: no such mode {0} for validator")]
    UnknownMode(Mode),
}

impl Error {
    /// Returns true if rules rejected the target.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Returns true if the failure is not caused by a rule.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::UnknownMode(_))
    }

    /// Returns the error tree when rules rejected the target.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            Error::UnknownMode(_) => None,
        }
    }

    /// Converts into the error tree when rules rejected the target.
    pub fn into_validation(self) -> Option<ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            Error::UnknownMode(_) => None,
        }
    }

    /// Reports whether `target` is contained in this failure.
    ///
    /// See [`ValidationError::matches`]. An unknown mode matches only
    /// [`Sentinel::Internal`].
    pub fn matches(&self, target: &(dyn StdError + 'static)) -> bool {
        match self {
            Error::Validation(err) => err.matches(target),
            Error::UnknownMode(_) => {
                matches!(target.downcast_ref::<Sentinel>(), Some(Sentinel::Internal))
            }
        }
    }

    /// Finds the first error of type `E`, see [`ValidationError::find`].
    ///
    /// An unknown mode yields [`Sentinel::Internal`] when looking for a
    /// [`Sentinel`], consistently with [`matches`](Self::matches).
    pub fn find<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            Error::Validation(err) => err.find::<E>(),
            Error::UnknownMode(_) => (&INTERNAL as &(dyn StdError + 'static)).downcast_ref::<E>(),
        }
    }
}

static INTERNAL: Sentinel = Sentinel::Internal;

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Error>();
    assert_sync::<Error>();
};
