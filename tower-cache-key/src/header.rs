use http::HeaderName;

/// Reserved request header carrying the cache key override.
///
/// Value is the uppercase hex SHA-256 digest of the key string.
/// Owned by this crate once set; applications should not write it directly.
pub const FASTLY_XQD_CACHE_KEY: HeaderName = HeaderName::from_static("fastly-xqd-cache-key");

/// Request extension holding the key string that was hashed into
/// [`FASTLY_XQD_CACHE_KEY`], before hashing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideCacheKey(pub String);

impl OverrideCacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
