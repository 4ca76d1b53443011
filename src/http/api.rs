//! JSON API handlers, used by `lottery-cli` and scripts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::explorer::LookupOutcome;
use crate::http::error::{ApiError, ApiJson};
use crate::http::server::AppState;
use crate::http::session::{attach_session, SessionHint};
use crate::lottery::{Broadcast, LotteryError, StatusSnapshot};

#[derive(Deserialize)]
pub struct EntryRequest {
    pub sender: String,
    pub private_key: String,
}

#[derive(Deserialize, Default)]
pub struct PrepareRequest {
    #[serde(default)]
    pub manager: Option<String>,
}

#[derive(Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub private_key: String,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.lottery.status().await)
}

pub async fn enter(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EntryRequest>,
) -> Result<Json<Broadcast>, ApiError> {
    let broadcast = state
        .lottery
        .enter(&request.sender, &request.private_key)
        .await?;
    Ok(Json(broadcast))
}

pub async fn prepare(
    State(state): State<AppState>,
    SessionHint(hint): SessionHint,
    ApiJson(request): ApiJson<PrepareRequest>,
) -> Response {
    let session = state.sessions.resolve(hint);
    let response = match state
        .lottery
        .prepare_winner(&state.sessions, session, request.manager.as_deref())
        .await
    {
        Ok(pending) => (StatusCode::CREATED, Json(pending.summary())).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    };
    attach_session(Some(session), response)
}

pub async fn pending(State(state): State<AppState>, SessionHint(hint): SessionHint) -> Response {
    let session = state.sessions.touch(hint);
    let pending = session
        .and_then(|id| state.sessions.pending(id))
        .map(|p| p.summary());
    attach_session(
        session,
        Json(serde_json::json!({ "pending": pending })).into_response(),
    )
}

pub async fn send(
    State(state): State<AppState>,
    SessionHint(hint): SessionHint,
    ApiJson(request): ApiJson<SendRequest>,
) -> Response {
    let session = state.sessions.touch(hint);
    let result = match session {
        Some(id) => {
            state
                .lottery
                .send_winner(&state.sessions, id, &request.private_key)
                .await
        }
        None => Err(LotteryError::NoPendingTransaction),
    };
    let response = match result {
        Ok(broadcast) => Json(broadcast).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    };
    attach_session(session, response)
}

pub async fn lookup(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<LookupOutcome>, ApiError> {
    Ok(Json(state.explorer.lookup(&hash).await?))
}
