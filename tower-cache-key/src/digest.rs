use std::{fmt::Display, str::FromStr};

use data_encoding::HEXUPPER;
use http::HeaderValue;
use sha2::{Digest, Sha256};

use crate::ParseCacheKeyError;

/// SHA-256 digest of a canonical cache key string.
///
/// Renders as 64 uppercase hex characters, which is exactly what goes
/// on the wire in [`FASTLY_XQD_CACHE_KEY`](crate::FASTLY_XQD_CACHE_KEY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    pub const HEX_LEN: usize = 64;

    /// Hashes the UTF-8 bytes of the key string
    pub fn derive(key: &str) -> Self {
        Self(Sha256::digest(key.as_bytes()).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        HEXUPPER.encode(&self.0)
    }

    pub fn to_header_value(&self) -> HeaderValue {
        // hex digits are always visible ascii
        HeaderValue::from_str(&self.to_hex()).unwrap()
    }

    pub fn from_header_value(value: &HeaderValue) -> Result<Self, ParseCacheKeyError> {
        value
            .to_str()
            .map_err(|_| ParseCacheKeyError::NotAscii)?
            .parse()
    }
}

impl From<[u8; 32]> for CacheKey {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CacheKey {
    type Err = ParseCacheKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::HEX_LEN {
            return Err(ParseCacheKeyError::InvalidLength(s.len()));
        }
        let mut res = [0u8; 32];
        HEXUPPER
            .decode_mut(s.as_bytes(), &mut res)
            .map_err(|_| ParseCacheKeyError::InvalidHex)?;
        Ok(Self(res))
    }
}
