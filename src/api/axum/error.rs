use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::SessionError;
use crate::api::ErrorResponse;

/// converts `SessionError` into a 500 response
#[derive(Debug)]
pub struct AppError(pub SessionError);

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!(
            target: "crumbs::gate",
            "msg=\"session save failed\" error=\"{}\"",
            self.0
        );
        let error_response = ErrorResponse::from(&self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)).into_response()
    }
}
