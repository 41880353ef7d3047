use http::{Extensions, HeaderMap};

use crate::{
    CacheKey, CacheKeySource, OverrideCacheKey, ParseCacheKeyError, SetCacheKeyError,
    FASTLY_XQD_CACHE_KEY,
};

/// Something that owns a request header collection the cache key can be written into
pub trait CacheKeyTarget {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Where the un-hashed key string is kept, if the target has anywhere to keep it
    fn extensions_mut(&mut self) -> Option<&mut Extensions> {
        None
    }
}

impl<B> CacheKeyTarget for http::Request<B> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        http::Request::headers_mut(self)
    }

    fn extensions_mut(&mut self) -> Option<&mut Extensions> {
        Some(http::Request::extensions_mut(self))
    }
}

impl CacheKeyTarget for http::request::Parts {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn extensions_mut(&mut self) -> Option<&mut Extensions> {
        Some(&mut self.extensions)
    }
}

impl CacheKeyTarget for HeaderMap {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self
    }
}

/// Converts `key` to a string, hashes it and sets
/// [`FASTLY_XQD_CACHE_KEY`] on `target`, replacing any previous value.
///
/// The target is left untouched on error.
pub fn set_cache_key<T, K>(target: &mut T, key: &K) -> Result<(), SetCacheKeyError<K::Error>>
where
    T: CacheKeyTarget + ?Sized,
    K: CacheKeySource + ?Sized,
{
    let key_string = key.to_key_string()?;
    let cache_key = CacheKey::derive(&key_string);
    target
        .headers_mut()
        .insert(FASTLY_XQD_CACHE_KEY, cache_key.to_header_value());
    if let Some(extensions) = target.extensions_mut() {
        extensions.insert(OverrideCacheKey(key_string.into_owned()));
    }
    tracing::debug!(%cache_key, "set cache key override");
    Ok(())
}

/// [`set_cache_key`] taking positional args. Only the first is used.
pub fn set_cache_key_args<T, K>(target: &mut T, args: &[K]) -> Result<(), SetCacheKeyError<K::Error>>
where
    T: CacheKeyTarget + ?Sized,
    K: CacheKeySource,
{
    let key = args
        .first()
        .ok_or(SetCacheKeyError::MissingArgument { passed: args.len() })?;
    set_cache_key(target, key)
}

pub trait RequestCacheKeyExt {
    fn set_cache_key<K: CacheKeySource + ?Sized>(
        &mut self,
        key: &K,
    ) -> Result<(), SetCacheKeyError<K::Error>>;

    /// Parses [`FASTLY_XQD_CACHE_KEY`] back into a digest, if present
    fn cache_key(&self) -> Option<Result<CacheKey, ParseCacheKeyError>>;

    /// The key string last passed to [`RequestCacheKeyExt::set_cache_key`]
    fn override_cache_key(&self) -> Option<&str>;
}

impl<B> RequestCacheKeyExt for http::Request<B> {
    fn set_cache_key<K: CacheKeySource + ?Sized>(
        &mut self,
        key: &K,
    ) -> Result<(), SetCacheKeyError<K::Error>> {
        set_cache_key(self, key)
    }

    fn cache_key(&self) -> Option<Result<CacheKey, ParseCacheKeyError>> {
        self.headers()
            .get(FASTLY_XQD_CACHE_KEY)
            .map(CacheKey::from_header_value)
    }

    fn override_cache_key(&self) -> Option<&str> {
        self.extensions()
            .get::<OverrideCacheKey>()
            .map(OverrideCacheKey::as_str)
    }
}
