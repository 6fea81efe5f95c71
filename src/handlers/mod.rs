pub mod cluster;
pub mod documents;
pub mod indices;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::es::{EsClient, EsError};
use crate::monitor::MonitorHandle;
use crate::proxy::{ProxyClient, ProxyError};

/// Sdílený stav aplikace - klienti postavení jednou při startu.
pub struct AppState {
    pub es: Arc<EsClient>,
    pub proxy: Option<Arc<ProxyClient>>,
    pub monitor: MonitorHandle,
}

impl AppState {
    /// Proxy klient, pokud je nakonfigurovaný.
    pub fn proxy(&self) -> Result<&ProxyClient, ApiError> {
        self.proxy
            .as_deref()
            .ok_or_else(|| ApiError::Config("CLUSTER_API_URL is not configured".to_string()))
    }
}

/// Kanonická úspěšná obálka: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Chyba na hranici HTTP vrstvy.
///
/// Každý handler chytá selhání service volání tady a překládá ho na
/// jednu kanonickou chybovou obálku - žádný jiný tvar ven neodchází.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("invalid request body: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Es(#[from] EsError),

    #[error(transparent)]
    Proxy(#[from] ProxyError),

    #[error("{0}")]
    Config(String),
}

impl ApiError {
    /// Diskriminátor pro klienty.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::InvalidFormat(_) => "invalid_format",
            ApiError::Es(_) | ApiError::Proxy(_) => "upstream",
            ApiError::Config(_) => "config",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::Es(_) | ApiError::Proxy(_) | ApiError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Vybalí JSON tělo requestu; nerozparsovatelné tělo se hlásí jako
/// `invalid_format`, ne jako obecné selhání.
pub fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::InvalidFormat(rejection.body_text())),
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Sestaví API router nad sdíleným stavem.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cluster/health", get(cluster::cluster_health))
        .route("/api/cluster/stats", get(cluster::cluster_stats))
        .route("/api/cluster/nodes", get(cluster::node_stats))
        .route("/api/cluster/cluster-status", get(cluster::cluster_status))
        .route("/api/cluster/node-status", get(cluster::node_status))
        .route("/api/cluster/overview", get(cluster::overview))
        .route("/api/indices", get(indices::list_indices))
        .route("/api/indices", post(indices::create_index))
        .route("/api/indices/indices-placement", get(indices::indices_placement))
        .route("/api/indices/{name}", get(indices::get_index))
        .route("/api/indices/{name}", delete(indices::delete_index))
        .route("/api/indices/{name}/{action}", post(indices::index_action))
        .route("/api/documents/search", post(documents::search))
        .route("/api/documents/index", post(documents::index_document))
        .route("/api/documents/{index}/{id}", get(documents::get_document))
        .route("/api/documents/{index}/{id}", put(documents::update_document))
        .route("/api/documents/{index}/{id}", delete(documents::delete_document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
