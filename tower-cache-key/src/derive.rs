use crate::CacheKeySource;

pub trait DeriveCacheKey<ReqBody> {
    type Source: CacheKeySource;

    /// Picks the cache key override for the request.
    /// `None` leaves the request as-is.
    fn derive_cache_key(&mut self, req: &http::Request<ReqBody>) -> Option<Self::Source>;
}

impl<ReqBody, F, S> DeriveCacheKey<ReqBody> for F
where
    F: FnMut(&http::Request<ReqBody>) -> Option<S>,
    S: CacheKeySource,
{
    type Source = S;

    fn derive_cache_key(&mut self, req: &http::Request<ReqBody>) -> Option<Self::Source> {
        self(req)
    }
}

#[cfg(feature = "path-cache-key")]
pub use path::*;

#[cfg(feature = "path-cache-key")]
mod path {
    use http::HeaderName;

    use super::DeriveCacheKey;

    /// Cache key derived from the uri path, ignoring the query string and authority.
    ///
    /// Each configured `vary_on` header appends a `\n`, then every HeaderValue of that header
    /// prefixed with a `\r`, in configured order. Neither byte can appear in a header value, so
    /// an absent header, an empty value, repeated values and values of adjacent headers all
    /// produce distinct keys.
    ///
    /// This means `/a?utm=1` and `/a?utm=2` share a key, while
    /// `Accept-Language: en, fr` results in a different key from `Accept-Language: fr, en`.
    ///
    /// Requests with a `vary_on` header value that isn't visible ascii get no key at all.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct PathCacheKey {
        vary_on: Vec<HeaderName>,
    }

    impl PathCacheKey {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn vary_on(mut self, header: HeaderName) -> Self {
            self.vary_on.push(header);
            self
        }

        pub fn key_string<T>(&self, req: &http::Request<T>) -> Option<String> {
            let mut res = req.uri().path().to_owned();
            for name in &self.vary_on {
                res.push('\n');
                for val in req.headers().get_all(name) {
                    res.push('\r');
                    res.push_str(val.to_str().ok()?);
                }
            }
            Some(res)
        }
    }

    impl<ReqBody> DeriveCacheKey<ReqBody> for PathCacheKey {
        type Source = String;

        fn derive_cache_key(&mut self, req: &http::Request<ReqBody>) -> Option<Self::Source> {
            let key = self.key_string(req);
            if key.is_none() {
                tracing::debug!(uri = %req.uri(), "vary header is not visible ascii, no cache key override");
            }
            key
        }
    }

    #[cfg(test)]
    mod tests {
        use http::{
            header::{ACCEPT, ACCEPT_LANGUAGE},
            HeaderValue,
        };

        use super::*;

        #[test]
        fn query_is_ignored() {
            let mut derive = PathCacheKey::new();
            let a = http::Request::get("https://www.fastly.com/products/42?utm=1")
                .body(())
                .unwrap();
            let b = http::Request::get("/products/42?utm=2").body(()).unwrap();
            assert_eq!(derive.derive_cache_key(&a).as_deref(), Some("/products/42"));
            assert_eq!(derive.derive_cache_key(&a), derive.derive_cache_key(&b));
        }

        #[test]
        fn vary_headers_are_appended_in_order() {
            let derive = PathCacheKey::new().vary_on(ACCEPT_LANGUAGE);
            let req = http::Request::get("/products/42")
                .header(ACCEPT_LANGUAGE, "en-GB")
                .body(())
                .unwrap();
            assert_eq!(derive.key_string(&req).unwrap(), "/products/42\n\ren-GB");

            let bare = http::Request::get("/products/42").body(()).unwrap();
            assert_eq!(derive.key_string(&bare).unwrap(), "/products/42\n");
        }

        #[test]
        fn values_across_headers_do_not_collide() {
            let derive = PathCacheKey::new().vary_on(ACCEPT_LANGUAGE).vary_on(ACCEPT);
            let joined = http::Request::get("/p")
                .header(ACCEPT_LANGUAGE, "enfr")
                .body(())
                .unwrap();
            let split = http::Request::get("/p")
                .header(ACCEPT_LANGUAGE, "en")
                .header(ACCEPT, "fr")
                .body(())
                .unwrap();
            let repeated = http::Request::get("/p")
                .header(ACCEPT_LANGUAGE, "en")
                .header(ACCEPT_LANGUAGE, "fr")
                .body(())
                .unwrap();
            let empty = http::Request::get("/p")
                .header(ACCEPT_LANGUAGE, "")
                .body(())
                .unwrap();
            let bare = http::Request::get("/p").body(()).unwrap();

            let keys: Vec<_> = [&joined, &split, &repeated, &empty, &bare]
                .iter()
                .map(|req| derive.key_string(*req).unwrap())
                .collect();
            for (i, a) in keys.iter().enumerate() {
                for b in &keys[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }

        #[test]
        fn non_ascii_vary_value_derives_no_key() {
            let mut derive = PathCacheKey::new().vary_on(ACCEPT_LANGUAGE).vary_on(ACCEPT);
            let req = http::Request::get("/p")
                .header(ACCEPT_LANGUAGE, HeaderValue::from_bytes(b"caf\xe9").unwrap())
                .body(())
                .unwrap();
            assert_eq!(derive.derive_cache_key(&req), None);

            let bare = http::Request::get("/p").body(()).unwrap();
            assert_eq!(derive.derive_cache_key(&bare).as_deref(), Some("/p\n\n"));
        }
    }
}
