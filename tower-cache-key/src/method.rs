//! Entry point for hosts that dispatch `setCacheKey` dynamically, e.g. from a
//! scripting binding, where the receiver, call mode and argument count are only
//! known at runtime.

use crate::{set_cache_key_args, CacheKeySource, CacheKeyTarget, SetCacheKeyError};

/// Name the operation is exposed under
pub const METHOD_NAME: &str = "setCacheKey";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CallMode {
    #[default]
    Call,
    Construct,
}

/// Checks, in order, that the operation:
/// 1. is not being constructed
/// 2. has a receiver
/// 3. has at least one argument
///
/// then runs [`set_cache_key_args`]. Nothing is converted or hashed
/// unless all 3 checks pass.
pub fn invoke_set_cache_key<T, K>(
    mode: CallMode,
    receiver: Option<&mut T>,
    args: &[K],
) -> Result<(), SetCacheKeyError<K::Error>>
where
    T: CacheKeyTarget + ?Sized,
    K: CacheKeySource,
{
    if mode == CallMode::Construct {
        return Err(SetCacheKeyError::NotAConstructor);
    }
    let target = receiver.ok_or(SetCacheKeyError::IncompatibleReceiver)?;
    set_cache_key_args(target, args)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::{KeyFn, FASTLY_XQD_CACHE_KEY};

    use super::*;

    fn request() -> http::Request<()> {
        http::Request::new(())
    }

    #[test]
    fn construct_mode_fails_first() {
        let mut req = request();
        let err = invoke_set_cache_key(CallMode::Construct, Some(&mut req), &["1", "1"])
            .unwrap_err();
        assert_eq!(err, SetCacheKeyError::NotAConstructor);
        assert_eq!(err.to_string(), "setCacheKey is not a constructor");
        assert!(req.headers().is_empty());
    }

    #[test]
    fn missing_receiver_fails_before_conversion() {
        let calls = Cell::new(0);
        let key = KeyFn(|| {
            calls.set(calls.get() + 1);
            Ok::<_, ()>("1")
        });
        let err = invoke_set_cache_key::<http::Request<()>, _>(CallMode::Call, None, &[key])
            .unwrap_err();
        assert_eq!(err, SetCacheKeyError::IncompatibleReceiver);
        assert!(err.is_type_error());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn missing_argument() {
        let mut req = request();
        let err = invoke_set_cache_key::<_, &str>(CallMode::Call, Some(&mut req), &[])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "setCacheKey: At least 1 argument required, but only 0 passed"
        );
        assert!(req.headers().is_empty());
    }

    #[test]
    fn call_sets_header() {
        let mut req = request();
        invoke_set_cache_key(CallMode::default(), Some(&mut req), &["meow"]).unwrap();
        assert_eq!(
            req.headers()[FASTLY_XQD_CACHE_KEY],
            "404CDD7BC109C432F8CC2443B45BCFE95980F5107215C645236E577929AC3E52"
        );
    }
}
