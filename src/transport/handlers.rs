//! Peer Server Handlers
//!
//! HTTP request handlers for the peer protocol and the node's status endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::group::{GroupRegistry, GroupStats};
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups this node serves
    pub registry: Arc<GroupRegistry>,
    /// Normalized path prefix of the peer protocol, e.g. `/_peercache/`
    pub base_path: String,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(registry: Arc<GroupRegistry>, base_path: impl Into<String>) -> Self {
        Self {
            registry,
            base_path: base_path.into(),
        }
    }
}

/// Handler for GET {base_path}{group}/{key}
///
/// Serves the raw bytes of a group's value, loading it if needed.
/// - 400 when the path does not split into exactly a group and a key
/// - 404 when the group is unknown
/// - 500 with the loader's message when loading fails
pub async fn peer_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response> {
    let path = uri.path();
    debug!("{} {}", method, path);

    let rest = path.strip_prefix(state.base_path.as_str()).ok_or_else(|| {
        CacheError::BadRequest(format!("unexpected path: {}", path))
    })?;
    let (group_name, key) = split_group_key(rest)?;

    let group = state
        .registry
        .get(&group_name)
        .ok_or(CacheError::GroupNotFound(group_name))?;
    let value = group.get(&key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.to_vec(),
    )
        .into_response())
}

/// Splits `{group}/{key}` and percent-decodes both segments.
pub fn split_group_key(rest: &str) -> Result<(String, String)> {
    let bad = || CacheError::BadRequest(format!("expected {{group}}/{{key}}, got {:?}", rest));

    let (group, key) = rest.split_once('/').ok_or_else(bad)?;
    if group.is_empty() || key.contains('/') {
        return Err(bad());
    }
    let group = urlencoding::decode(group).map_err(|_| bad())?;
    let key = urlencoding::decode(key).map_err(|_| bad())?;
    Ok((group.into_owned(), key.into_owned()))
}

/// Handler for GET /stats
///
/// Returns counters for every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .names()
        .into_iter()
        .filter_map(|name| state.registry.get(&name))
        .map(|group| group.stats())
        .collect();

    Json(StatsResponse::new(groups))
}

/// Handler for GET /stats/:group
pub async fn group_stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GroupStats>> {
    let group = state
        .registry
        .get(&name)
        .ok_or(CacheError::GroupNotFound(name))?;
    Ok(Json(group.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
