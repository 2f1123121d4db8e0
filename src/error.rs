//! Error types for the dashboard core.

use std::fmt;

/// Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the dashboard core.
///
/// Field-level validation problems are deliberately NOT represented here:
/// they are user-correctable, travel as [`crate::form::FieldErrors`], and are
/// converted into [`crate::form::FormState`] values at the service boundary.
/// The variants below cover the faults that are not attributable to a single
/// form field.
#[derive(Debug, Clone)]
pub enum Error {
    /// Persistence failure (insert, update, or delete against the store).
    ///
    /// Common causes:
    /// - Database connection lost
    /// - Constraint violation (e.g. unresolvable customer reference)
    /// - Targeted update matched no row
    ///
    /// The mutation pipeline converts this into a generic form message;
    /// the underlying cause is logged, never shown to the end user.
    PersistenceError(String),

    /// A referenced invoice or customer does not exist.
    ///
    /// Raised by fetch paths only. Mutations report a missing target row as
    /// `PersistenceError` instead, since a write was already attempted.
    NotFound(String),

    /// Route cache backend error.
    ///
    /// Cache trouble is non-fatal for reads (the store is the source of
    /// truth); callers log and fall through to a fresh fetch.
    CacheError(String),

    /// Serialization failed when encoding a view for the route cache.
    SerializationError(String),

    /// Deserialization failed when decoding a cached view.
    ///
    /// Indicates corrupted or malformed data in cache.
    /// **Recovery:** the cached entry is treated as a miss and recomputed.
    DeserializationError(String),

    /// Invalid cache entry: corrupted envelope or bad magic.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and a cached view.
    ///
    /// Raised when the cached envelope was written by a different crate
    /// version. Expected during deployments; the entry is evicted and the
    /// view recomputed. No action needed.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from the cached entry)
        found: u32,
    },

    /// Configuration error during startup.
    ConfigError(String),

    /// Generic error with custom message.
    ///
    /// Used for errors that don't fit into other variants - notably
    /// unclassified authentication-backend failures, which must propagate
    /// rather than be misreported as a credential rejection.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PersistenceError(msg) => write!(f, "Persistence error: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::CacheError(msg) => write!(f, "Cache error: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cached view version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::PersistenceError(format!("sqlx error: {}", e))
    }
}
