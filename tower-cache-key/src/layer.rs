use std::task::{Context, Poll};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    set_cache_key, CacheKeyOverrideFuture, CacheKeyServiceError, CacheKeySource, DeriveCacheKey,
    FASTLY_XQD_CACHE_KEY,
};

/// What to do with a request that already carries [`FASTLY_XQD_CACHE_KEY`]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum OverwritePolicy {
    #[default]
    Replace,
    KeepExisting,
}

#[derive(Clone, Copy, Debug)]
pub struct CacheKeyLayer<D> {
    derive: D,
    overwrite: OverwritePolicy,
}

impl<D> CacheKeyLayer<D> {
    pub fn new(derive: D) -> Self {
        Self {
            derive,
            overwrite: OverwritePolicy::default(),
        }
    }

    pub fn overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite = policy;
        self
    }
}

impl<D: Clone, S> Layer<S> for CacheKeyLayer<D> {
    type Service = CacheKeyOverride<D, S>;

    fn layer(&self, inner: S) -> Self::Service {
        CacheKeyOverride {
            derive: self.derive.clone(),
            overwrite: self.overwrite,
            inner,
        }
    }
}

/// Sets the cache key override on every request before handing it to `inner`.
///
/// If the key can't be converted to a string the request is rejected with
/// [`CacheKeyServiceError::CacheKey`] and `inner` is never readied or called.
#[derive(Clone, Copy, Debug)]
pub struct CacheKeyOverride<D, S> {
    derive: D,
    overwrite: OverwritePolicy,
    inner: S,
}

impl<D, S> CacheKeyOverride<D, S> {
    pub fn into_inner(self) -> S {
        self.inner
    }
}

type KeyError<D, ReqBody> = <<D as DeriveCacheKey<ReqBody>>::Source as CacheKeySource>::Error;

impl<ReqBody, D, S> Service<http::Request<ReqBody>> for CacheKeyOverride<D, S>
where
    D: DeriveCacheKey<ReqBody>,
    S: Service<http::Request<ReqBody>> + Clone,
{
    type Response = S::Response;

    type Error = CacheKeyServiceError<KeyError<D, ReqBody>, S::Error>;

    type Future = CacheKeyOverrideFuture<S, ReqBody, KeyError<D, ReqBody>>;

    /// `CacheKeyOverrideFuture` poll_ready()s inner only for requests that aren't rejected
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut req: http::Request<ReqBody>) -> Self::Future {
        if self.overwrite == OverwritePolicy::KeepExisting
            && req.headers().contains_key(FASTLY_XQD_CACHE_KEY)
        {
            tracing::trace!(uri = %req.uri(), "keeping existing cache key override");
            return CacheKeyOverrideFuture::inner(self.inner.clone(), req);
        }
        let source = match self.derive.derive_cache_key(&req) {
            Some(s) => s,
            None => {
                tracing::trace!(uri = %req.uri(), "no cache key override derived");
                return CacheKeyOverrideFuture::inner(self.inner.clone(), req);
            }
        };
        if let Err(e) = set_cache_key(&mut req, &source) {
            tracing::debug!(
                uri = %req.uri(),
                type_error = e.is_type_error(),
                "rejecting request, cache key override could not be set"
            );
            return CacheKeyOverrideFuture::rejected(e);
        }
        CacheKeyOverrideFuture::inner(self.inner.clone(), req)
    }
}
