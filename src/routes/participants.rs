use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::Response,
    routing::get,
    Router,
};
use uuid::Uuid;

use super::found;
use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/participants/:participant_id/confirm", get(confirm_participant))
}

async fn confirm_participant(
    State(state): State<AppState>,
    participant_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(participant_id) = participant_id?;
    let confirmation = state
        .confirmations
        .confirm_participant(&participant_id.to_string())
        .await?;
    Ok(found(&state.links.trip_page(&confirmation.trip_id)))
}
