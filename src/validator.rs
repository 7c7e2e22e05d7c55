//! Validator: runs rule factories against a target under a selectable mode.
//!
//! This module provides [`Validator`] and the [`Mode`] it runs in. A
//! validator holds no state besides its mode, so one instance can be reused
//! across calls and shared between threads.

use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use rayon::prelude::*;
use stillwater::prelude::*;

use crate::error::{Error, SharedError, ValidationError};
use crate::rule::{Checker, CreateRule};

/// Root message of the error returned when running all rules.
pub const FAILED_MESSAGE: &str = "validation has failed";

/// How a [`Validator`] evaluates its rules.
///
/// `Mode` is an open set over `u32`: the two known modes are associated
/// constants, and any other value can still be constructed with
/// [`Mode::from`]. Validating with an unknown mode fails with
/// [`Error::UnknownMode`].
///
/// # Example
///
/// ```rust
/// use valdy::Mode;
///
/// assert_eq!(Mode::default(), Mode::RUN_ALL);
/// assert_eq!("stop_on_first_failure".parse::<Mode>().unwrap(), Mode::STOP_ON_FIRST_FAILURE);
/// assert!(!Mode::from(999).is_known());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u32);

impl Mode {
    /// Evaluate every rule and aggregate all failures.
    pub const RUN_ALL: Mode = Mode(0);
    /// Evaluate rules in order and stop at the first failure.
    pub const STOP_ON_FIRST_FAILURE: Mode = Mode(1);

    /// Returns the raw value of this mode.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns true for the modes a validator knows how to run.
    pub fn is_known(self) -> bool {
        matches!(self, Mode::RUN_ALL | Mode::STOP_ON_FIRST_FAILURE)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::RUN_ALL
    }
}

impl From<u32> for Mode {
    fn from(raw: u32) -> Self {
        Mode(raw)
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Mode::RUN_ALL => f.write_str("run_all"),
            Mode::STOP_ON_FIRST_FAILURE => f.write_str("stop_on_first_failure"),
            Mode(raw) => write!(f, "{}", raw),
        }
    }
}

impl FromStr for Mode {
    type Err = ModeParseError;

    /// Parses `run_all` or `stop_on_first_failure`, case-insensitively, with
    /// either underscores or dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "run_all" => Ok(Mode::RUN_ALL),
            "stop_on_first_failure" => Ok(Mode::STOP_ON_FIRST_FAILURE),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}

/// Returned when parsing an unrecognised [`Mode`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown validator mode '{0}'")]
pub struct ModeParseError(String);

/// Validates targets of type `T` against rule factories.
///
/// Each call to [`validate`](Validator::validate) builds one rule per factory
/// for the given target and evaluates them in the order they were passed.
///
/// # Example
///
/// ```rust
/// use valdy::{Rule, Validator};
///
/// fn positive(n: &i64) -> Rule<i64> {
///     Rule::new(format!("{} should be positive", n), |n: &i64| *n > 0)
/// }
///
/// fn even(n: &i64) -> Rule<i64> {
///     Rule::new(format!("{} should be even", n), |n: &i64| n % 2 == 0)
/// }
///
/// let validator: Validator<i64> = Validator::new();
/// assert!(validator.validate(&4, &[&positive, &even]).is_ok());
///
/// let error = validator.validate(&-3, &[&positive, &even]).unwrap_err();
/// assert_eq!(
///     error.to_string(),
///     "validation has failed:\n\t-3 should be positive\n\t-3 should be even"
/// );
/// ```
pub struct Validator<T: ?Sized> {
    mode: Mode,
    _target: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Validator<T> {
    /// Creates a validator that runs every rule ([`Mode::RUN_ALL`]).
    pub fn new() -> Self {
        Self::with_mode(Mode::RUN_ALL)
    }

    /// Creates a validator running in the given mode.
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            _target: PhantomData,
        }
    }

    /// Returns the mode this validator runs in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Changes the mode this validator runs in.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Validates `target` against the rules built by `rules`.
    ///
    /// - [`Mode::RUN_ALL`]: every rule is evaluated; if any failed, the
    ///   failures are returned as children of a [`FAILED_MESSAGE`] tree.
    /// - [`Mode::STOP_ON_FIRST_FAILURE`]: rules are evaluated in order and
    ///   the first failure is returned as is; later rules are not evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when rules reject the target and
    /// [`Error::UnknownMode`] when the mode is not known, in which case no
    /// factory or rule is run.
    pub fn validate(&self, target: &T, rules: &[&dyn CreateRule<T>]) -> Result<(), Error> {
        #[cfg(feature = "tracing")]
        tracing::debug!(mode = %self.mode, rules = rules.len(), "validating target");

        let result = match self.mode {
            Mode::RUN_ALL => run_all(target, &materialize(target, rules)),
            Mode::STOP_ON_FIRST_FAILURE => stop_on_first_failure(target, &materialize(target, rules)),
            mode => Err(Error::UnknownMode(mode)),
        };

        #[cfg(feature = "tracing")]
        match &result {
            Ok(()) => tracing::debug!(mode = %self.mode, "validation passed"),
            Err(err) => tracing::debug!(mode = %self.mode, error = %err, "validation failed"),
        }

        result
    }

    /// Validates many independent targets in parallel.
    ///
    /// Each target is validated exactly as [`validate`](Validator::validate)
    /// would, on a rayon worker thread. Results are returned in the order of
    /// `targets`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use valdy::{Rule, Validator};
    ///
    /// fn positive(n: &i64) -> Rule<i64> {
    ///     Rule::new(format!("{} should be positive", n), |n: &i64| *n > 0)
    /// }
    ///
    /// let validator: Validator<i64> = Validator::new();
    /// let results = validator.validate_batch(&[1, -1, 2], &[&positive]);
    ///
    /// assert!(results[0].is_ok());
    /// assert!(results[1].is_err());
    /// assert!(results[2].is_ok());
    /// ```
    pub fn validate_batch(&self, targets: &[T], rules: &[&dyn CreateRule<T>]) -> Vec<Result<(), Error>>
    where
        T: Sized + Sync,
    {
        targets
            .par_iter()
            .map(|target| self.validate(target, rules))
            .collect()
    }
}

impl<T: ?Sized> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Validator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Validator<T> {}

impl<T: ?Sized> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("mode", &self.mode).finish()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator<str>>();
    assert_sync::<Validator<str>>();
};

fn materialize<T: ?Sized>(target: &T, rules: &[&dyn CreateRule<T>]) -> Vec<Box<dyn Checker<T>>> {
    rules.iter().map(|rule| rule.create(target)).collect()
}

fn run_all<T: ?Sized>(target: &T, checkers: &[Box<dyn Checker<T>>]) -> Result<(), Error> {
    let failures = checkers
        .iter()
        .filter_map(|checker| checker.check(target).err())
        .map(|err| {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %err, "rule failed");

            NonEmptyVec::singleton(err.into_shared())
        })
        .reduce(|acc: NonEmptyVec<SharedError>, next| acc.combine(next));

    match failures {
        None => Ok(()),
        Some(failures) => Err(ValidationError::new(FAILED_MESSAGE, failures.into_vec()).into()),
    }
}

fn stop_on_first_failure<T: ?Sized>(
    target: &T,
    checkers: &[Box<dyn Checker<T>>],
) -> Result<(), Error> {
    for checker in checkers {
        checker.check(target)?;
    }
    Ok(())
}
