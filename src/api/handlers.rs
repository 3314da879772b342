//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    CreateOrderRequest, ErrorResponse, ReplyRequest, ReplyResponse, RestartResponse,
    SessionResponse, StartSessionResponse, SuccessResponse, UpdateStatusRequest,
};
use super::AppState;
use crate::db::{DbError, OrderRecord};
use crate::kitchen::{KitchenError, KitchenSnapshot};
use crate::runtime::SessionError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Customer conversations
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        .route("/api/sessions/:id/reply", post(send_reply))
        .route("/api/sessions/:id/restart", post(restart_session))
        // Orders
        .route(
            "/api/orders",
            get(list_orders).post(create_order).patch(update_order),
        )
        .route("/api/orders/stream", get(stream_orders))
        // Kitchen board
        .route("/api/kitchen", get(kitchen_board))
        .route("/api/kitchen/:id/advance", post(advance_order))
        // Version
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Sessions
// ============================================================

async fn start_session(State(state): State<AppState>) -> Json<StartSessionResponse> {
    let (session_id, reply) = state.sessions.start_session().await;
    Json(StartSessionResponse { session_id, reply })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.session(&id).await?;
    Ok(Json(SessionResponse {
        session_id: id,
        session,
    }))
}

async fn send_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReplyRequest>,
) -> Result<Json<ReplyResponse>, AppError> {
    let outcome = state.sessions.send_reply(&id, &req.text).await?;
    Ok(Json(ReplyResponse {
        reply: outcome.reply,
        is_complete: outcome.is_complete,
        order: outcome.record,
    }))
}

async fn restart_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestartResponse>, AppError> {
    let reply = state.sessions.restart_session(&id).await?;
    Ok(Json(RestartResponse { reply }))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.end_session(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Orders
// ============================================================

async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderRecord>>, AppError> {
    Ok(Json(state.sessions.list_orders().await?))
}

async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderRecord>), AppError> {
    let order = state.sessions.create_order(req.into()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn update_order(
    State(state): State<AppState>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderRecord>, AppError> {
    let order = state.sessions.update_status(&req.id, req.status).await?;
    Ok(Json(order))
}

async fn stream_orders(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    // Subscribe first so nothing slips between the snapshot and the feed
    let rx = state.sessions.subscribe();
    let orders = state.sessions.list_orders().await?;
    Ok(sse_stream(orders, rx))
}

// ============================================================
// Kitchen
// ============================================================

#[derive(Debug, Deserialize)]
struct KitchenQuery {
    /// Order count from the client's previous poll
    seen: Option<usize>,
}

async fn kitchen_board(
    State(state): State<AppState>,
    Query(query): Query<KitchenQuery>,
) -> Result<Json<KitchenSnapshot>, AppError> {
    Ok(Json(state.sessions.kitchen_snapshot(query.seen).await?))
}

async fn advance_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderRecord>, AppError> {
    Ok(Json(state.sessions.advance_order(&id).await?))
}

async fn get_version() -> &'static str {
    concat!("tiffin-bot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::OrderNotFound(_) => AppError::NotFound("Order not found".to_string()),
            other => {
                tracing::error!(error = %other, "Order store failure");
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => AppError::NotFound(e.to_string()),
            SessionError::Storage(db) => db.into(),
        }
    }
}

impl From<KitchenError> for AppError {
    fn from(e: KitchenError) -> Self {
        match e {
            KitchenError::NotFound(_) => AppError::NotFound("Order not found".to_string()),
            KitchenError::AlreadyDelivered(_) => AppError::BadRequest(e.to_string()),
            KitchenError::Storage(db) => db.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
