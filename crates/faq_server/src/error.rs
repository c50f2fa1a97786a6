use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use faq_core::FaqError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Faq(#[from] FaqError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Faq(FaqError::Io(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Faq(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
