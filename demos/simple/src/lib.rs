use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, routing::get, BoxError, Router,
};
use http::header::ACCEPT_LANGUAGE;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_cache_key::{
    CacheKeyLayer, OverwritePolicy, PathCacheKey, RequestCacheKeyExt, FASTLY_XQD_CACHE_KEY,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, app().into_make_service())
        .await
        .unwrap();
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(show_cache_key))
        .route("/products/:id", get(show_cache_key))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_cache_key_layer_err))
                .layer(
                    // handlers upstream may already have pinned a key; leave those alone
                    CacheKeyLayer::new(PathCacheKey::new().vary_on(ACCEPT_LANGUAGE))
                        .overwrite(OverwritePolicy::KeepExisting),
                ),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub async fn handle_cache_key_layer_err<T: Into<BoxError>>(err: T) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.into().to_string())
}

/// Echoes the override key string and the header derived from it
pub async fn show_cache_key(req: axum::extract::Request) -> String {
    let key = req.override_cache_key().unwrap_or_default();
    let header = req
        .headers()
        .get(FASTLY_XQD_CACHE_KEY)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    format!("{key}\n{header}\n")
}
