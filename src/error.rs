//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, the hash ring and the peer transport.
///
/// `Clone` so a single in-flight load can hand the same outcome to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Lookup attempted with an empty key
    #[error("key is required")]
    EmptyKey,

    /// Peer unreachable, non-200 answer or unreadable body
    #[error("peer transport error: {0}")]
    Transport(String),

    /// The application loader failed for a key
    #[error("{0}")]
    Loader(String),

    /// No group registered under that name
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Malformed peer request path
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A peer picker was already registered on the group
    #[error("peers already registered for group {0}")]
    PeersAlreadyRegistered(String),

    /// A group was built without a loader
    #[error("group {0} has no loader")]
    MissingLoader(String),

    /// Any other setup mistake (bad replica count, empty name, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Returns true for errors that indicate a programming mistake at setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CacheError::PeersAlreadyRegistered(_)
                | CacheError::MissingLoader(_)
                | CacheError::InvalidConfig(_)
        )
    }

    /// Status code a peer server answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::EmptyKey | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
/// Peers exchange plain-text error bodies.
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
