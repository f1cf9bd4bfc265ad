//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::errors::IndexerError;
use crate::events::{fold_gift_status, EventRecord, IndexedGiftStatus, Subject};
use crate::rpc::parse_hex_id;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/gifts/:id/events", get(get_gift_events))
        .route("/gifts/:id/status", get(get_gift_status))
        .route("/campaigns/:id/events", get(get_campaign_events))
        .route("/pools/:creator_hash/events", get(get_pool_events))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Serialize)]
pub struct GiftStatusResponse {
    pub gift_id: String,
    pub status: IndexedGiftStatus,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        let status = match &self {
            IndexerError::InvalidId(_) => StatusCode::BAD_REQUEST,
            IndexerError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, IndexerError>;

fn parse_id(raw: &str) -> Result<String, IndexerError> {
    parse_hex_id(raw).ok_or_else(|| IndexerError::InvalidId(raw.to_string()))
}

fn listing(id: String, events: Vec<EventRecord>) -> Json<EventsResponse> {
    Json(EventsResponse {
        id,
        count: events.len(),
        events,
    })
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
///
/// Returns every indexed event.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> ApiResult<AllEventsResponse> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /gifts/:id/events`
///
/// The gift's lifecycle events and any pool draws that funded it.
pub async fn get_gift_events(
    State(state): State<Arc<ApiState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<EventsResponse> {
    let gift_id = parse_id(&raw_id)?;
    let events = db::get_events_for_gift(&state.pool, &gift_id).await?;
    Ok(listing(gift_id, events))
}

/// `GET /gifts/:id/status`
pub async fn get_gift_status(
    State(state): State<Arc<ApiState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<GiftStatusResponse> {
    let gift_id = parse_id(&raw_id)?;
    let events = db::get_events_for_subject(&state.pool, Subject::Gift, &gift_id).await?;
    let status = fold_gift_status(&events)
        .ok_or_else(|| IndexerError::NotFound(format!("gift {gift_id}")))?;
    Ok(Json(GiftStatusResponse { gift_id, status }))
}

/// `GET /campaigns/:id/events`
pub async fn get_campaign_events(
    State(state): State<Arc<ApiState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<EventsResponse> {
    let campaign_id = parse_id(&raw_id)?;
    let events = db::get_events_for_subject(&state.pool, Subject::Campaign, &campaign_id).await?;
    Ok(listing(campaign_id, events))
}

/// `GET /pools/:creator_hash/events`
pub async fn get_pool_events(
    State(state): State<Arc<ApiState>>,
    Path(raw_hash): Path<String>,
) -> ApiResult<EventsResponse> {
    let creator_hash = parse_id(&raw_hash)?;
    let events = db::get_events_for_subject(&state.pool, Subject::Pool, &creator_hash).await?;
    Ok(listing(creator_hash, events))
}
