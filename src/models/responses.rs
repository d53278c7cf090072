//! Response DTOs for the status endpoints
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;

use crate::group::GroupStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of registered groups
    pub total_groups: usize,
    /// Per-group counters, sorted by name
    pub groups: Vec<GroupStats>,
}

impl StatsResponse {
    /// Creates a new StatsResponse
    pub fn new(groups: Vec<GroupStats>) -> Self {
        Self {
            total_groups: groups.len(),
            groups,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
