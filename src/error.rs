//! Errors and the per-element control signal.
//!
//! Every traversal reports its outcome as a [`Flow`]. `Ok(())` means the
//! consumer wants more (or the traversal completed), [`Error::Stop`] means the
//! consumer ended early, and anything else is a real failure.

use std::{fmt, sync::Arc};

/// Signal returned by consumers and by traversal functions.
pub type Flow = Result<(), Error>;

/// Errors produced while traversing a [`Sequence`](crate::Sequence).
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The consumer asked for the traversal to end early.
    ///
    /// This is not a failure. It travels upward through every derived
    /// sequence and is dropped by the outermost entry points
    /// ([`each`](crate::Sequence::each) and the terminal operations).
    #[error("iteration stopped")]
    Stop,

    /// A volatile sequence was traversed a second time.
    #[error("volatile sequence used more than once")]
    RepeatedUse,

    /// A numeric range was built with a step that would never reach its end.
    #[error("invalid range step ({0} <= 0)")]
    InvalidStep(String),

    /// A failure raised while producing or handling an element.
    #[error(transparent)]
    Source(Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an arbitrary error as a [`Error::Source`].
    pub fn wrap<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Source(Arc::new(err))
    }

    /// Build a [`Error::Source`] from a message.
    ///
    /// ```rust
    /// use pullseq::Error;
    ///
    /// let err = Error::msg("disk on fire");
    /// assert_eq!(err.to_string(), "disk on fire");
    /// assert!(!err.is_stop());
    /// ```
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display,
    {
        Error::Source(Arc::new(Message(message.to_string())))
    }

    /// Returns `true` for the stop sentinel.
    #[inline]
    pub const fn is_stop(&self) -> bool {
        matches!(self, Error::Stop)
    }

    /// Returns `true` for anything other than the stop sentinel.
    #[inline]
    pub const fn is_failure(&self) -> bool {
        !self.is_stop()
    }
}

/// Two errors are equal when they are the same sentinel, or when they wrap
/// the very same source error.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::Stop, Error::Stop) | (Error::RepeatedUse, Error::RepeatedUse) => true,
            (Error::InvalidStep(a), Error::InvalidStep(b)) => a == b,
            (Error::Source(a), Error::Source(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}

/// Drop the stop sentinel from a traversal outcome.
///
/// Used at every outermost boundary; everywhere else the sentinel must be
/// passed through untouched.
#[inline]
pub(crate) fn settle(flow: Flow) -> Result<(), Error> {
    match flow {
        Err(Error::Stop) => Ok(()),
        other => other,
    }
}
