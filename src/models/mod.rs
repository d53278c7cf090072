//! Response models for the node's status endpoints
//!
//! The peer protocol itself carries raw bytes; only status endpoints use JSON.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, StatsResponse};
