use crate::auction::Amount;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// 핸들러 경계에서 응답으로 변환되는 오류
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Bid must be greater than current max bid.")]
    BidTooLow { current_max: Amount },

    #[error("Auction is already closed.")]
    AuctionClosed,

    #[error("{0}")]
    Forbidden(String),

    #[error("Login required")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn listing_not_found() -> Self {
        AppError::NotFound("Listing not found.".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BidTooLow { .. } | AppError::AuctionClosed => StatusCode::CONFLICT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::SEE_OTHER,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION",
            AppError::BidTooLow { .. } => "LOW_BID",
            AppError::AuctionClosed => "AUCTION_CLOSED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Store(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            // 로그인 페이지로 이동
            AppError::Unauthorized => return Redirect::to("/login").into_response(),
            AppError::BidTooLow { current_max } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_max": current_max,
            }),
            AppError::Store(e) => {
                error!("{:<12} --> 저장소 오류: {:?}", "Handler", e);
                serde_json::json!({
                    "error": "Internal server error",
                    "code": self.code(),
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };

        (self.status(), Json(body)).into_response()
    }
}
