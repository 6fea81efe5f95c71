use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::es::api::{SearchParams, UpdateParams};
use crate::handlers::{require_json, ApiError, ApiResponse, AppState};
use crate::models::{DocumentRecord, RefreshMode};

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub index: Option<String>,
    pub query: Option<Value>,
    pub from: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<Value>,
}

/// POST /api/documents/search - dotaz nad dokumenty
pub async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let body = require_json(payload)?;

    let index = body
        .index
        .filter(|index| !index.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Index name is required".to_string()))?;

    let params = SearchParams {
        index,
        query: body.query,
        from: body.from,
        size: body.size,
        sort: body.sort,
    };

    let response = state.es.search(&params).await?;
    Ok(ApiResponse::ok(response))
}

#[derive(Debug, Deserialize)]
pub struct IndexDocumentBody {
    pub index: Option<String>,
    pub id: Option<String>,
    pub document: Option<Value>,
    pub refresh: Option<RefreshMode>,
}

/// POST /api/documents/index - upsert dokumentu
pub async fn index_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IndexDocumentBody>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let body = require_json(payload)?;

    let (Some(index), Some(document)) = (
        body.index.filter(|index| !index.is_empty()),
        body.document,
    ) else {
        return Err(ApiError::BadRequest(
            "Index and document are required".to_string(),
        ));
    };

    let id = body.id.filter(|id| !id.is_empty());
    let response = state
        .es
        .index_document(&index, id.as_deref(), document, body.refresh.as_ref())
        .await?;

    Ok(ApiResponse::ok(response))
}

/// GET /api/documents/{index}/{id} - načte dokument
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path((index, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<DocumentRecord>>, ApiError> {
    let document = state.es.get_document(&index, &id).await?;
    Ok(ApiResponse::ok(document))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentBody {
    pub doc: Option<Value>,
    pub script: Option<Value>,
    pub refresh: Option<RefreshMode>,
}

/// PUT /api/documents/{index}/{id} - aktualizuje dokument
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path((index, id)): Path<(String, String)>,
    payload: Result<Json<UpdateDocumentBody>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let body = require_json(payload)?;

    if body.doc.is_none() && body.script.is_none() {
        return Err(ApiError::BadRequest(
            "Either doc or script is required".to_string(),
        ));
    }

    let params = UpdateParams {
        doc: body.doc,
        script: body.script,
        refresh: body.refresh,
    };

    let response = state.es.update_document(&index, &id, &params).await?;
    Ok(ApiResponse::ok(response))
}

/// DELETE /api/documents/{index}/{id} - smaže dokument.
/// Refresh se vynucuje, aby smazání bylo hned viditelné v searchi.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path((index, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let response = state
        .es
        .delete_document(&index, &id, &RefreshMode::Flag(true))
        .await?;

    Ok(ApiResponse::ok(response))
}
