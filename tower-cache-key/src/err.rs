use std::{
    error::Error,
    fmt::{Debug, Display},
};

use crate::METHOD_NAME;

/// Failure of the string-conversion step.
///
/// `Thrown` carries whatever the key's conversion hook returned, untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceError<E> {
    Thrown(E),
    NotConvertible { kind: &'static str },
}

impl<E: Display> Display for CoerceError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Thrown(e) => e.fmt(f),
            Self::NotConvertible { kind } => write!(f, "can't convert {kind} to a string"),
        }
    }
}

impl<E: Debug + Display> Error for CoerceError<E> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCacheKeyError<E> {
    NotAConstructor,
    IncompatibleReceiver,
    MissingArgument { passed: usize },
    NotConvertible { kind: &'static str },

    /// Raised by the key's own conversion hook. Not normalized.
    Coercion(E),
}

impl<E> SetCacheKeyError<E> {
    /// Everything except a propagated hook error is a type error
    pub fn is_type_error(&self) -> bool {
        !matches!(self, Self::Coercion(_))
    }

    /// Returns the value raised by the conversion hook, or `self` back
    /// if this error was produced by the operation itself
    pub fn into_thrown(self) -> Result<E, Self> {
        match self {
            Self::Coercion(e) => Ok(e),
            other => Err(other),
        }
    }
}

impl<E> From<CoerceError<E>> for SetCacheKeyError<E> {
    fn from(value: CoerceError<E>) -> Self {
        match value {
            CoerceError::Thrown(e) => Self::Coercion(e),
            CoerceError::NotConvertible { kind } => Self::NotConvertible { kind },
        }
    }
}

impl<E: Display> Display for SetCacheKeyError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAConstructor => write!(f, "{METHOD_NAME} is not a constructor"),
            Self::IncompatibleReceiver => write!(
                f,
                "{METHOD_NAME} called on incompatible receiver: expected a request"
            ),
            Self::MissingArgument { passed } => write!(
                f,
                "{METHOD_NAME}: At least 1 argument required, but only {passed} passed"
            ),
            Self::NotConvertible { kind } => write!(f, "can't convert {kind} to a string"),
            Self::Coercion(e) => e.fmt(f),
        }
    }
}

impl<E: Debug + Display> Error for SetCacheKeyError<E> {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCacheKeyError {
    InvalidLength(usize),
    InvalidHex,
    NotAscii,
}

impl Display for ParseCacheKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "cache key must be 64 hex characters, got {len}")
            }
            Self::InvalidHex => write!(f, "cache key must be uppercase hex"),
            Self::NotAscii => write!(f, "cache key header value is not visible ascii"),
        }
    }
}

impl Error for ParseCacheKeyError {}

#[derive(Debug)]
pub enum RequestInitError<E> {
    Http(http::Error),
    CacheKey(SetCacheKeyError<E>),
}

impl<E> From<http::Error> for RequestInitError<E> {
    fn from(value: http::Error) -> Self {
        Self::Http(value)
    }
}

impl<E> From<SetCacheKeyError<E>> for RequestInitError<E> {
    fn from(value: SetCacheKeyError<E>) -> Self {
        Self::CacheKey(value)
    }
}

impl<E: Display> Display for RequestInitError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => Display::fmt(e, f),
            Self::CacheKey(e) => Display::fmt(e, f),
        }
    }
}

impl<E: Debug + Display> Error for RequestInitError<E> {}

// Error type must implement std::Error else axum will throw
// `the trait bound HandleError<...> is not satisfied`

#[derive(Debug)]
pub enum CacheKeyServiceError<KeyError, InnerError> {
    CacheKey(SetCacheKeyError<KeyError>),
    Inner(InnerError),
}

impl<KeyError: Display, InnerError: Display> Display
    for CacheKeyServiceError<KeyError, InnerError>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CacheKey(e) => Display::fmt(e, f),
            Self::Inner(e) => e.fmt(f),
        }
    }
}

impl<KeyError: Debug + Display, InnerError: Debug + Display> Error
    for CacheKeyServiceError<KeyError, InnerError>
{
}
