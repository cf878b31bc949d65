//! Errors ([`Error`]) and fatal error reporting ([`report_fatal_error`]).
//!
//! Recoverable errors describe bad arguments passed to the IR API, and are
//! always reported before anything is mutated. Broken invariants of the
//! use-def graph are programmer errors, they are reported by
//! [`report_fatal_error`], which never returns.

#[cfg(not(feature = "no-fatal-logger"))]
use colored::*;
use log::error;
use std::result;
use thiserror::Error;

/// Recoverable errors of the IR API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// An argument is out of range or has an invalid type.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),
  /// A type or a value owned by another context was passed in.
  #[error("cross-context violation: {0}")]
  CrossContext(String),
  /// The requested feature is not implemented.
  #[error("unsupported operation: {0}")]
  Unsupported(String),
}

impl Error {
  /// Checks if the current error is an invalid argument error.
  pub fn is_invalid_argument(&self) -> bool {
    matches!(self, Error::InvalidArgument(..))
  }

  /// Checks if the current error is a cross-context violation.
  pub fn is_cross_context(&self) -> bool {
    matches!(self, Error::CrossContext(..))
  }

  /// Checks if the current error reports an unimplemented feature.
  pub fn is_unsupported(&self) -> bool {
    matches!(self, Error::Unsupported(..))
  }
}

/// Result type of the IR API.
pub type Result<T> = result::Result<T, Error>;

/// Reports a fatal error and aborts the current thread by panicking.
///
/// The reason is logged, and also printed to `stderr` unless the
/// `no-fatal-logger` feature is enabled.
#[cold]
pub fn report_fatal_error(reason: &str) -> ! {
  error!("fatal error: {}", reason);
  #[cfg(not(feature = "no-fatal-logger"))]
  eprintln!("{}: {}", "fatal error".bright_red(), reason.bold());
  panic!("fatal error: {}", reason)
}

/// Reports a fatal error with a formatted message.
macro_rules! fatal {
  ($($arg:tt)+) => {
    $crate::error::report_fatal_error(&format!($($arg)+))
  };
}
pub(crate) use fatal;

/// Returns an [`Error::InvalidArgument`] with a formatted message
/// if the given condition does not hold.
macro_rules! ensure_arg {
  ($cond:expr, $($arg:tt)+) => {
    if !$cond {
      return Err($crate::error::Error::InvalidArgument(format!($($arg)+)));
    }
  };
}
pub(crate) use ensure_arg;

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn classify_errors() {
    let e = Error::InvalidArgument("bitwidth too large".into());
    assert!(e.is_invalid_argument());
    assert!(!e.is_unsupported());
    assert_eq!(e.to_string(), "invalid argument: bitwidth too large");
    let e = Error::Unsupported("half constants".into());
    assert!(e.is_unsupported());
    assert!(!e.is_cross_context());
  }

  fn check_positive(n: i32) -> Result<i32> {
    ensure_arg!(n > 0, "`{}` is not positive", n);
    Ok(n)
  }

  #[test]
  fn ensure_argument() {
    assert_eq!(check_positive(1), Ok(1));
    assert_eq!(
      check_positive(-1),
      Err(Error::InvalidArgument("`-1` is not positive".into()))
    );
  }

  #[test]
  #[should_panic(expected = "fatal error: use list is broken")]
  fn fatal_error_panics() {
    fatal!("use list is {}", "broken");
  }
}
