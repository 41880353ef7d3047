//! String conversion of cache key inputs.
//!
//! Every key goes through [`CacheKeySource::to_key_string`] exactly once before
//! it is hashed. A source either yields its canonical string, fails with its own
//! error (propagated to the caller untouched), or reports that it has no string
//! form at all.

use std::{
    borrow::Cow,
    convert::Infallible,
    ffi::{OsStr, OsString},
    rc::Rc,
    sync::Arc,
};

use bytes::Bytes;
use http::{HeaderValue, Uri};

use crate::CoerceError;

pub trait CacheKeySource {
    /// Error raised by a custom conversion hook
    type Error;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>>;
}

impl<T: CacheKeySource + ?Sized> CacheKeySource for &T {
    type Error = T::Error;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        (**self).to_key_string()
    }
}

macro_rules! impl_deref_source {
    ($($ty:ty),*) => {
        $(
            impl<T: CacheKeySource + ?Sized> CacheKeySource for $ty {
                type Error = T::Error;

                fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
                    (**self).to_key_string()
                }
            }
        )*
    };
}

impl_deref_source!(Box<T>, Rc<T>, Arc<T>);

impl CacheKeySource for str {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        Ok(Cow::Borrowed(self))
    }
}

impl CacheKeySource for String {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        Ok(Cow::Borrowed(self.as_str()))
    }
}

impl CacheKeySource for Cow<'_, str> {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        Ok(Cow::Borrowed(self.as_ref()))
    }
}

macro_rules! impl_display_source {
    ($($ty:ty),*) => {
        $(
            impl CacheKeySource for $ty {
                type Error = Infallible;

                fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
                    Ok(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

impl_display_source!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, Uri
);

/// Byte buffers only have a string form if they are valid UTF-8
impl CacheKeySource for [u8] {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        std::str::from_utf8(self)
            .map(Cow::Borrowed)
            .map_err(|_| CoerceError::NotConvertible {
                kind: "non-UTF-8 bytes",
            })
    }
}

impl CacheKeySource for Vec<u8> {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        self.as_slice().to_key_string()
    }
}

impl CacheKeySource for Bytes {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        self.as_ref().to_key_string()
    }
}

/// Header values carrying opaque (non visible ascii) bytes have no string form
impl CacheKeySource for HeaderValue {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        self.to_str()
            .map(Cow::Borrowed)
            .map_err(|_| CoerceError::NotConvertible {
                kind: "opaque header value",
            })
    }
}

impl CacheKeySource for OsStr {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        self.to_str()
            .map(Cow::Borrowed)
            .ok_or(CoerceError::NotConvertible {
                kind: "non-unicode OS string",
            })
    }
}

impl CacheKeySource for OsString {
    type Error = Infallible;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        self.as_os_str().to_key_string()
    }
}

/// Key with a custom, fallible string conversion hook.
///
/// The hook runs once per conversion. Whatever it returns as `Err` reaches the
/// caller of [`set_cache_key`](crate::set_cache_key) as
/// [`SetCacheKeyError::Coercion`](crate::SetCacheKeyError::Coercion), unwrapped.
#[derive(Debug, Clone, Copy)]
pub struct KeyFn<F>(pub F);

impl<F, S, E> CacheKeySource for KeyFn<F>
where
    F: Fn() -> Result<S, E>,
    S: Into<String>,
{
    type Error = E;

    fn to_key_string(&self) -> Result<Cow<'_, str>, CoerceError<Self::Error>> {
        (self.0)()
            .map(|s| Cow::Owned(s.into()))
            .map_err(CoerceError::Thrown)
    }
}
