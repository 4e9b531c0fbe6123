use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::mail::MailError;

/// Failures the caller can fix by changing the request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Invalid trip start date")]
    InvalidStartDate,
    #[error("Invalid trip end date")]
    InvalidEndDate,
    #[error("Trip not found")]
    TripNotFound,
    #[error("Participant not found")]
    ParticipantNotFound,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("trip {0} not found")]
    MissingTrip(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Client(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::MissingTrip(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Mail(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Client(err) => json!({ "message": err.to_string() }),
            AppError::Validation(detail) => json!({ "message": "Invalid input", "detail": detail }),
            _ => {
                error!("request failed: {self:?}");
                json!({ "message": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
