use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::handlers::{require_json, ApiError, ApiResponse, AppState};
use crate::models::IndexSummary;
use crate::placement::{build_grid, IndicesPlacementData, PlacementGrid};

/// GET /api/indices - seznam indexů z cat API
pub async fn list_indices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<IndexSummary>>>, ApiError> {
    let indices = state.es.cat_indices().await?;
    Ok(ApiResponse::ok(indices))
}

#[derive(Debug, Deserialize)]
pub struct CreateIndexBody {
    pub name: Option<String>,
    pub settings: Option<Value>,
    pub mappings: Option<Value>,
    pub aliases: Option<Value>,
}

/// POST /api/indices - vytvoří index
pub async fn create_index(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateIndexBody>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let body = require_json(payload)?;

    let name = body
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Index name is required".to_string()))?;

    let mut index_body = Map::new();
    if let Some(settings) = body.settings {
        index_body.insert("settings".to_string(), settings);
    }
    if let Some(mappings) = body.mappings {
        index_body.insert("mappings".to_string(), mappings);
    }
    if let Some(aliases) = body.aliases {
        index_body.insert("aliases".to_string(), aliases);
    }

    let response = state.es.create_index(&name, Value::Object(index_body)).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /api/indices/{name} - detail indexu
pub async fn get_index(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let index = state.es.get_index(&name).await?;
    Ok(ApiResponse::ok(index))
}

/// DELETE /api/indices/{name} - smaže index
pub async fn delete_index(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let response = state.es.delete_index(&name).await?;
    Ok(ApiResponse::ok(response))
}

/// POST /api/indices/{name}/{action} - close / open / refresh
pub async fn index_action(
    State(state): State<Arc<AppState>>,
    Path((name, action)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let response = match action.as_str() {
        "close" => state.es.close_index(&name).await?,
        "open" => state.es.open_index(&name).await?,
        "refresh" => state.es.refresh_index(&name).await?,
        _ => return Err(ApiError::BadRequest(format!("Unknown action: {}", action))),
    };

    Ok(ApiResponse::ok(response))
}

#[derive(Debug, Deserialize)]
pub struct PlacementQuery {
    #[serde(default)]
    pub include_hidden_index: bool,
    #[serde(default)]
    pub include_closed_index: bool,
}

/// Placement payload doplněný o hustý grid pro zobrazení.
#[derive(Debug, Serialize)]
pub struct PlacementResponse {
    #[serde(flatten)]
    pub placement: IndicesPlacementData,
    pub grid: PlacementGrid,
}

/// GET /api/indices/indices-placement - shard-to-node grid přes proxy
pub async fn indices_placement(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlacementQuery>,
) -> Result<Json<ApiResponse<PlacementResponse>>, ApiError> {
    let placement = state
        .proxy()?
        .indices_placement(query.include_hidden_index, query.include_closed_index)
        .await?;

    let grid = build_grid(&placement);

    Ok(ApiResponse::ok(PlacementResponse { placement, grid }))
}
