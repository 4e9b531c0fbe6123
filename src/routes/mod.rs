pub mod participants;
pub mod trips;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::{error::AppError, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(trips::router())
        .merge(participants::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `302 Found` pointing at `url`.
pub(crate) fn found(url: &Url) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.as_str())]).into_response()
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
