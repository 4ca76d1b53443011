//! Form handlers for the HTML console.
//!
//! Every post performs one action, then re-reads contract status and
//! re-renders the whole page with a notice describing the outcome. Only
//! prepare opens a session; other forms reuse a live one if presented.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::http::server::AppState;
use crate::http::session::{attach_session, SessionHint};
use crate::http::ui::{render_page, LookupView, Notice, PageView};
use crate::lottery::LotteryError;

#[derive(Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub private_key: String,
}

#[derive(Deserialize)]
pub struct PrepareForm {
    #[serde(default)]
    pub manager: String,
}

#[derive(Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub private_key: String,
}

#[derive(Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub tx_hash: String,
}

async fn page(
    state: &AppState,
    session: Option<Uuid>,
    notice: Option<Notice>,
    lookup: Option<LookupView>,
) -> Response {
    let status = state.lottery.status().await;
    let pending = session
        .and_then(|id| state.sessions.pending(id))
        .map(|p| p.summary());
    let html = render_page(&PageView {
        status: &status,
        pending,
        notice,
        lookup,
        links: state.lottery.links(),
    });
    attach_session(session, html.into_response())
}

pub async fn index(State(state): State<AppState>, SessionHint(hint): SessionHint) -> Response {
    let session = state.sessions.touch(hint);
    page(&state, session, None, None).await
}

pub async fn enter(
    State(state): State<AppState>,
    SessionHint(hint): SessionHint,
    Form(form): Form<EntryForm>,
) -> Response {
    let session = state.sessions.touch(hint);
    let notice = match state.lottery.enter(&form.sender, &form.private_key).await {
        Ok(broadcast) => Notice::success(
            format!("Entry broadcast: {}", broadcast.tx_hash),
            Some(broadcast.explorer_url),
        ),
        Err(e) => Notice::error(format!("Error sending entry: {}", e)),
    };
    page(&state, session, Some(notice), None).await
}

pub async fn prepare(
    State(state): State<AppState>,
    SessionHint(hint): SessionHint,
    Form(form): Form<PrepareForm>,
) -> Response {
    let session = state.sessions.resolve(hint);
    let notice = match state
        .lottery
        .prepare_winner(&state.sessions, session, Some(&form.manager))
        .await
    {
        Ok(_) => Notice::success(
            "Winner transaction prepared and held in this session. Sign & send it below.",
            None,
        ),
        Err(e) => Notice::error(format!("Error preparing tx: {}", e)),
    };
    page(&state, Some(session), Some(notice), None).await
}

pub async fn send(
    State(state): State<AppState>,
    SessionHint(hint): SessionHint,
    Form(form): Form<SendForm>,
) -> Response {
    let session = state.sessions.touch(hint);
    let result = match session {
        Some(id) => {
            state
                .lottery
                .send_winner(&state.sessions, id, &form.private_key)
                .await
        }
        None => Err(LotteryError::NoPendingTransaction),
    };
    let notice = match result {
        Ok(broadcast) => Notice::success(
            format!("Winner tx broadcast: {}", broadcast.tx_hash),
            Some(broadcast.explorer_url),
        ),
        Err(e) => Notice::error(format!("Error sending tx: {}", e)),
    };
    page(&state, session, Some(notice), None).await
}

pub async fn lookup(
    State(state): State<AppState>,
    SessionHint(hint): SessionHint,
    Form(form): Form<LookupForm>,
) -> Response {
    let session = state.sessions.touch(hint);
    let result = state
        .explorer
        .lookup(&form.tx_hash)
        .await
        .map_err(|e| e.to_string());
    let view = LookupView {
        query: form.tx_hash.trim().to_string(),
        result,
    };
    page(&state, session, None, Some(view)).await
}
