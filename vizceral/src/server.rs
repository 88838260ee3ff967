use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use vizceral_core::{DuplicatePolicy, TranslateError, VizNode, VizceralGraph, ingest_with_policy, translate};
use vizceral_zipkin::window::DEFAULT_LOOKBACK_MINUTES;
use vizceral_zipkin::{FetchError, QueryWindow, ZipkinClient};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Zipkin fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Translation failed: {0}")]
    Translate(#[from] TranslateError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Fetch(FetchError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ApiError::Translate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request failed ({}): {}", status, self);

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Shared by every request; the Zipkin client is built once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub zipkin: ZipkinClient,
    pub policy: DuplicatePolicy,
}

impl AppState {
    pub fn new(zipkin: ZipkinClient, policy: DuplicatePolicy) -> Self {
        Self { zipkin, policy }
    }
}

#[derive(Debug, Deserialize)]
pub struct DataQuery {
    pub server: String,
    #[serde(default = "default_minutes")]
    pub minutes: u32,
    pub until: Option<i64>,
}

fn default_minutes() -> u32 {
    DEFAULT_LOOKBACK_MINUTES
}

impl DataQuery {
    pub fn window(&self) -> QueryWindow {
        QueryWindow::new(self.until, self.minutes)
    }
}

/// Fetch dependencies from Zipkin and translate them.
pub async fn fetch_graph(
    zipkin: &ZipkinClient,
    server: &str,
    window: &QueryWindow,
    policy: DuplicatePolicy,
) -> ApiResult<VizceralGraph> {
    let raw = zipkin.fetch_dependencies(server, window).await?;
    let edges = ingest_with_policy(raw, policy)?;
    Ok(translate(&edges)?)
}

async fn data(State(state): State<AppState>, Query(query): Query<DataQuery>) -> ApiResult<Json<VizNode>> {
    let graph = fetch_graph(&state.zipkin, &query.server, &query.window(), state.policy).await?;
    Ok(Json(graph.into_api()))
}

async fn graph(State(state): State<AppState>, Query(query): Query<DataQuery>) -> ApiResult<Json<VizNode>> {
    let graph = fetch_graph(&state.zipkin, &query.server, &query.window(), state.policy).await?;
    Ok(Json(graph.into_global()))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // api region only, the shape Vizceral's traffic view loads
        .route("/data", get(data))
        .route("/graph", get(graph))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(bind: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
