use pin_project::pin_project;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower_service::Service;

use crate::{CacheKeyServiceError, SetCacheKeyError};

/// Response future of [`CacheKeyOverride`](crate::CacheKeyOverride)
///
/// The inner service is only `poll_ready()`d once the request is known to go through,
/// so rejected requests never reserve inner capacity.
// using options just to take() and move fields to next state easily
#[pin_project(project = CacheKeyOverrideFutureProj)]
pub enum CacheKeyOverrideFuture<S, ReqBody, KeyError>
where
    S: Service<http::Request<ReqBody>>,
{
    InnerBefore {
        inner: S,
        req: Option<http::Request<ReqBody>>,
    },
    Inner {
        #[pin]
        fut: S::Future,
    },

    /// Cache key could not be set, inner service was never readied or called.
    Rejected { err: Option<SetCacheKeyError<KeyError>> },
}

impl<S, ReqBody, KeyError> CacheKeyOverrideFuture<S, ReqBody, KeyError>
where
    S: Service<http::Request<ReqBody>>,
{
    pub fn inner(inner: S, req: http::Request<ReqBody>) -> Self {
        Self::InnerBefore {
            inner,
            req: Some(req),
        }
    }

    pub fn rejected(err: SetCacheKeyError<KeyError>) -> Self {
        Self::Rejected { err: Some(err) }
    }
}

impl<S, ReqBody, KeyError> Future for CacheKeyOverrideFuture<S, ReqBody, KeyError>
where
    S: Service<http::Request<ReqBody>>,
{
    type Output = Result<S::Response, CacheKeyServiceError<KeyError, S::Error>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.as_mut().project() {
            CacheKeyOverrideFutureProj::InnerBefore { inner, req } => match inner.poll_ready(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(result) => {
                    if let Err(e) = result {
                        return Poll::Ready(Err(CacheKeyServiceError::Inner(e)));
                    }
                    let fut = inner.call(req.take().expect("polled after completion"));
                    self.set(Self::Inner { fut });
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
            },
            CacheKeyOverrideFutureProj::Inner { fut } => {
                fut.poll(cx).map_err(CacheKeyServiceError::Inner)
            }
            CacheKeyOverrideFutureProj::Rejected { err } => Poll::Ready(Err(
                CacheKeyServiceError::CacheKey(err.take().expect("polled after completion")),
            )),
        }
    }
}
