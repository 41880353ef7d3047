//! Cache key overrides for `http` requests.
//!
//! A cache key override replaces the url-derived identity an edge cache uses to
//! match a request to a cached response. The key is converted to a string
//! ([`CacheKeySource`]), hashed with SHA-256 ([`CacheKey`]) and written as 64
//! uppercase hex characters into the reserved [`FASTLY_XQD_CACHE_KEY`] request header.
//!
//! ```
//! use tower_cache_key::{RequestCacheKeyExt, FASTLY_XQD_CACHE_KEY};
//!
//! let mut req = http::Request::get("https://www.fastly.com").body(()).unwrap();
//! req.set_cache_key("meow").unwrap();
//! assert_eq!(
//!     req.headers()[FASTLY_XQD_CACHE_KEY],
//!     "404CDD7BC109C432F8CC2443B45BCFE95980F5107215C645236E577929AC3E52"
//! );
//! ```

mod derive;
mod digest;
mod err;
mod header;
mod init;
mod method;
mod source;
mod target;

#[cfg(feature = "layer")]
mod future;
#[cfg(feature = "layer")]
mod layer;

pub use derive::*;
pub use digest::*;
pub use err::*;
pub use header::*;
pub use init::*;
pub use method::*;
pub use source::*;
pub use target::*;

#[cfg(feature = "layer")]
pub use future::*;
#[cfg(feature = "layer")]
pub use layer::*;
