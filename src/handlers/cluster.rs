use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::handlers::{ApiError, ApiResponse, AppState};
use crate::models::ClusterHealth;
use crate::monitor::{MonitorState, RefreshInterval};

/// GET /api/cluster/health - cluster health snapshot
pub async fn cluster_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ClusterHealth>>, ApiError> {
    let health = state.es.cluster_health().await?;
    Ok(ApiResponse::ok(health))
}

/// GET /api/cluster/stats - cluster stats (passthrough)
pub async fn cluster_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let stats = state.es.cluster_stats().await?;
    Ok(ApiResponse::ok(stats))
}

/// GET /api/cluster/nodes - stats per node (passthrough mapy nodes)
pub async fn node_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let response = state.es.nodes_stats().await?;
    let nodes = response.get("nodes").cloned().unwrap_or(Value::Null);
    Ok(ApiResponse::ok(nodes))
}

/// GET /api/cluster/cluster-status - stav clusteru z proxy
pub async fn cluster_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let status = state.proxy()?.cluster_status().await?;
    Ok(ApiResponse::ok(status))
}

/// GET /api/cluster/node-status - stav nodů z proxy
pub async fn node_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let status = state.proxy()?.node_status().await?;
    Ok(ApiResponse::ok(status))
}

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    /// Vyžádá okamžitý refresh mimo plán (nečeká na jeho výsledek)
    #[serde(default)]
    pub refresh: bool,
}

/// Stav monitoru plus aktuálně nastavený interval.
#[derive(Debug, Serialize)]
pub struct OverviewData {
    pub interval: RefreshInterval,
    #[serde(flatten)]
    pub state: MonitorState,
}

/// GET /api/cluster/overview - poslední joinovaný snapshot monitoru.
///
/// Headless obdoba dashboardového view-modelu: vrací poslední dobrý
/// snapshot i během chybového stavu.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OverviewQuery>,
) -> Json<ApiResponse<OverviewData>> {
    if query.refresh {
        state.monitor.refresh_now();
    }

    let data = OverviewData {
        interval: state.monitor.interval(),
        state: state.monitor.state(),
    };

    ApiResponse::ok(data)
}
