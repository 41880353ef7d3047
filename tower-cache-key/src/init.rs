use http::{HeaderMap, Method, Uri};

use crate::{set_cache_key, CacheKeySource, RequestInitError};

/// Options applied when constructing a request.
///
/// `cache_key` goes through exactly the same conversion, hashing and encoding as
/// [`set_cache_key`], after `headers` are applied.
#[derive(Debug, Clone)]
pub struct RequestInit<K> {
    pub method: Method,
    pub headers: HeaderMap,
    pub cache_key: Option<K>,
}

impl<K> Default for RequestInit<K> {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            cache_key: None,
        }
    }
}

impl<K> RequestInit<K> {
    pub fn with_cache_key(cache_key: K) -> Self {
        Self {
            cache_key: Some(cache_key),
            ..Default::default()
        }
    }
}

impl<K: CacheKeySource> RequestInit<K> {
    pub fn build<U, B>(self, uri: U, body: B) -> Result<http::Request<B>, RequestInitError<K::Error>>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        let Self {
            method,
            headers,
            cache_key,
        } = self;
        let mut req = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(body)?;
        *req.headers_mut() = headers;
        if let Some(key) = cache_key {
            set_cache_key(&mut req, &key)?;
        }
        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use http::HeaderValue;

    use crate::{KeyFn, RequestCacheKeyExt, SetCacheKeyError, FASTLY_XQD_CACHE_KEY};

    use super::*;

    const URI: &str = "https://www.fastly.com";

    #[test]
    fn matches_explicit_operation() {
        let constructed = RequestInit::with_cache_key("meow").build(URI, ()).unwrap();

        let mut explicit = http::Request::get(URI).body(()).unwrap();
        explicit.set_cache_key("meow").unwrap();

        assert_eq!(
            constructed.headers()[FASTLY_XQD_CACHE_KEY],
            explicit.headers()[FASTLY_XQD_CACHE_KEY]
        );
        assert_eq!(
            constructed.headers()[FASTLY_XQD_CACHE_KEY],
            "404CDD7BC109C432F8CC2443B45BCFE95980F5107215C645236E577929AC3E52"
        );
        assert_eq!(constructed.override_cache_key(), Some("meow"));
    }

    #[test]
    fn no_cache_key_no_header() {
        let req = RequestInit::<&str>::default().build(URI, ()).unwrap();
        assert!(!req.headers().contains_key(FASTLY_XQD_CACHE_KEY));
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn cache_key_wins_over_supplied_header() {
        let mut headers = HeaderMap::new();
        headers.insert(FASTLY_XQD_CACHE_KEY, HeaderValue::from_static("stale"));
        headers.insert("accept", HeaderValue::from_static("*/*"));
        let req = RequestInit {
            method: Method::POST,
            headers,
            cache_key: Some(String::from("meow")),
        }
        .build(URI, ())
        .unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.headers()["accept"], "*/*");
        assert_eq!(req.cache_key(), Some(Ok(crate::CacheKey::derive("meow"))));
    }

    #[test]
    fn hook_error_surfaces_unchanged() {
        let init = RequestInit::with_cache_key(KeyFn(|| Err::<&str, _>("sentinel")));
        match init.build(URI, ()) {
            Err(RequestInitError::CacheKey(SetCacheKeyError::Coercion(thrown))) => {
                assert_eq!(thrown, "sentinel")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_uri_is_an_http_error() {
        let res = RequestInit::<&str>::with_cache_key("meow").build("not a uri", ());
        assert!(matches!(res, Err(RequestInitError::<Infallible>::Http(_))));
    }
}
