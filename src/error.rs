//! # HTTP Error Responses
//!
//! Errors that reach a client are rendered as `{"message": ...}` JSON with a
//! matching status code. The `/status` endpoint never produces one: database
//! failures there are folded into the response body instead.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => {
                debug!(msg, "Responding with 404");
                (StatusCode::NOT_FOUND, msg)
            }
        };

        let body = Json(ErrorBody { message });
        (status, body).into_response()
    }
}
