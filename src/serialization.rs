//! Postcard-based serialization for cached route views.
//!
//! Every cached view is wrapped in a versioned envelope so that corruption
//! and schema drift are detected on read instead of silently deserializing
//! into garbage:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "IDSK"              u32 (LE)          postcard::to_allocvec(T)
//! ```
//!
//! A bad magic or mismatched version is not an error the read side has to
//! handle specially - it treats the entry as a miss and recomputes the view
//! from the store.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for cached views: b"IDSK"
pub const VIEW_MAGIC: [u8; 4] = *b"IDSK";

/// Current view schema version.
///
/// Increment when a cached type changes shape (fields added, removed,
/// reordered, enum variants changed). Old entries are then evicted and
/// recomputed on next access.
pub const CURRENT_VIEW_VERSION: u32 = 1;

/// Versioned envelope wrapped around every cached view.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ViewEnvelope<T> {
    /// Magic header: must be b"IDSK"
    pub magic: [u8; 4],
    /// View schema version: must match [`CURRENT_VIEW_VERSION`]
    pub version: u32,
    /// The actual cached view
    pub payload: T,
}

impl<T> ViewEnvelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            magic: VIEW_MAGIC,
            version: CURRENT_VIEW_VERSION,
            payload,
        }
    }
}

/// Serialize a view with envelope for cache storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn serialize_view<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = ViewEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("view serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a view from cache storage, validating magic and version.
///
/// # Errors
///
/// - `Error::InvalidCacheEntry`: invalid magic header
/// - `Error::VersionMismatch`: view schema version mismatch
/// - `Error::DeserializationError`: corrupted Postcard payload
pub fn deserialize_view<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: ViewEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        debug!("view deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != VIEW_MAGIC {
        warn!(
            "invalid cached view: expected magic {:?}, got {:?}",
            VIEW_MAGIC, envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            VIEW_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_VIEW_VERSION {
        warn!(
            "cached view version mismatch: expected {}, got {}",
            CURRENT_VIEW_VERSION, envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_VIEW_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}
