//! Persistent key-value cache for catalog resources.
//!
//! Values are stored as JSON blobs, one entry per logical resource. An entry
//! is overwritten every time the resource is refreshed from the remote API;
//! there is no TTL and no eviction.

mod disk;

pub use disk::DiskCache;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Deterministic key of a cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The genre list.
    Genres,
    /// One page of the trending listing.
    TrendingPage(u32),
    /// Details of a single item.
    Item(i64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Genres => write!(f, "genres"),
            CacheKey::TrendingPage(page) => write!(f, "trending_page_{}", page),
            CacheKey::Item(id) => write!(f, "item_{}", id),
        }
    }
}

/// Errors that can occur when reading or writing the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No entry exists for the key.
    #[error("No cache entry for '{0}'")]
    NotFound(String),

    /// The entry exists but could not be decoded.
    #[error("Corrupt cache entry '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// The value could not be encoded.
    #[error("Failed to serialize value for '{key}': {reason}")]
    Serialize { key: String, reason: String },

    /// Filesystem failure.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw byte storage keyed by [`CacheKey`].
///
/// Implementations must make `write` atomic: a reader sees either the previous
/// value or the new one, never a partial write.
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`.
    fn read(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError>;

    /// Replace the bytes stored under `key`.
    fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError>;
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Load and decode the value stored under `key`.
    fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<T, CacheError> {
        let bytes = self.read(key)?;
        serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Encode and store `value` under `key`, replacing any previous value.
    fn save<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value).map_err(|e| CacheError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.write(key, &bytes)
    }

    /// Look up `key`, classifying the outcome instead of failing.
    fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheLookup<T> {
        match self.load(key) {
            Ok(value) => CacheLookup::Hit(value),
            Err(CacheError::NotFound(_)) => CacheLookup::Miss,
            Err(e) => CacheLookup::Failed(e),
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// Outcome of a cache lookup.
#[derive(Debug)]
pub enum CacheLookup<T> {
    /// A decoded value was found.
    Hit(T),
    /// No entry exists.
    Miss,
    /// An entry exists but could not be read or decoded.
    Failed(CacheError),
}

impl<T> CacheLookup<T> {
    /// Collapse to "local copy or nothing", discarding the failure reason.
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss | CacheLookup::Failed(_) => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }
}
