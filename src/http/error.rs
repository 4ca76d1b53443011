//! Mapping of operation errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::explorer::ExplorerError;
use crate::lottery::LotteryError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Lottery(#[from] LotteryError),

    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    #[error("invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("request took longer than {0}s")]
    RequestTimeout(u64),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Lottery(e) => match e {
                LotteryError::Address(_)
                | LotteryError::MissingSigningKey
                | LotteryError::SignerMismatch { .. } => StatusCode::BAD_REQUEST,
                LotteryError::NoPendingTransaction | LotteryError::StaleTransaction { .. } => {
                    StatusCode::CONFLICT
                }
                LotteryError::InvalidAmount(_) => StatusCode::INTERNAL_SERVER_ERROR,
                LotteryError::Read { .. } => StatusCode::BAD_GATEWAY,
                LotteryError::StatusDeadline { .. } => StatusCode::GATEWAY_TIMEOUT,
                LotteryError::Blockchain(e) => blockchain_status(e),
            },
            ApiError::Explorer(e) => match e {
                ExplorerError::InvalidHash(_) => StatusCode::BAD_REQUEST,
                ExplorerError::Http(_) | ExplorerError::Api(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Body(rejection) => rejection.status(),
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

fn blockchain_status(error: &BlockchainError) -> StatusCode {
    match error {
        BlockchainError::Wallet(_) => StatusCode::BAD_REQUEST,
        BlockchainError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BlockchainError::GasPriceTooHigh { .. } => StatusCode::SERVICE_UNAVAILABLE,
        BlockchainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        BlockchainError::Rpc(_)
        | BlockchainError::Decode { .. }
        | BlockchainError::ChainMismatch { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// `Json<T>` whose rejections use the `{"error": ...}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Give the timeout layer's bare 408 a JSON error body.
pub async fn request_timeout_as_json(State(secs): State<u64>, response: Response) -> Response {
    let bare = response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE);
    if bare {
        ApiError::RequestTimeout(secs).into_response()
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(LotteryError::NoPendingTransaction).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(LotteryError::MissingSigningKey).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ExplorerError::InvalidHash("0x12".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LotteryError::from(BlockchainError::Timeout(10))).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[tokio::test]
    async fn test_bare_timeout_gets_json_body() {
        let bare = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = request_timeout_as_json(State(60), bare).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "request took longer than 60s");

        let page = request_timeout_as_json(State(60), axum::response::Html("<p>ok</p>").into_response())
            .await;
        assert_eq!(page.status(), StatusCode::OK);
    }
}
