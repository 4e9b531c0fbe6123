use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::found;
use crate::{
    error::AppError,
    models::{
        participant::{EmailAddress, Participant},
        trip::{Destination, NewTrip, Trip, TripDate},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id", get(trip_details))
        .route("/trips/:trip_id/confirm", get(confirm_trip))
        .route("/trips/:trip_id/invites", post(create_invite))
        .route("/trips/:trip_id/participants", get(trip_participants))
}

#[derive(Deserialize)]
struct CreateTripBody {
    destination: Destination,
    starts_at: TripDate,
    ends_at: TripDate,
    owner_name: String,
    owner_email: EmailAddress,
    emails_to_invite: Vec<EmailAddress>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TripCreated {
    trip_id: String,
}

async fn create_trip(
    State(state): State<AppState>,
    body: Result<Json<CreateTripBody>, JsonRejection>,
) -> Result<Json<TripCreated>, AppError> {
    let Json(body) = body?;
    let new_trip = NewTrip {
        destination: body.destination.into_inner(),
        starts_at: body.starts_at.into_inner(),
        ends_at: body.ends_at.into_inner(),
        owner_name: body.owner_name,
        owner_email: body.owner_email.into_inner(),
        emails_to_invite: body
            .emails_to_invite
            .into_iter()
            .map(EmailAddress::into_inner)
            .collect(),
    };

    let trip = state.trips.create_trip(new_trip).await?;
    Ok(Json(TripCreated { trip_id: trip.id }))
}

#[derive(Serialize)]
struct TripBody {
    trip: Trip,
}

async fn trip_details(
    State(state): State<AppState>,
    trip_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TripBody>, AppError> {
    let Path(trip_id) = trip_id?;
    let trip = state.trips.trip_details(&trip_id.to_string()).await?;
    Ok(Json(TripBody { trip }))
}

#[derive(Serialize)]
struct ParticipantsBody {
    participants: Vec<Participant>,
}

async fn trip_participants(
    State(state): State<AppState>,
    trip_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ParticipantsBody>, AppError> {
    let Path(trip_id) = trip_id?;
    let participants = state.trips.participants(&trip_id.to_string()).await?;
    Ok(Json(ParticipantsBody { participants }))
}

async fn confirm_trip(
    State(state): State<AppState>,
    trip_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(trip_id) = trip_id?;
    let trip_id = trip_id.to_string();
    state.confirmations.confirm_trip(&trip_id).await?;
    Ok(found(&state.links.trip_page(&trip_id)))
}

#[derive(Deserialize)]
struct InviteBody {
    email: EmailAddress,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InviteCreated {
    participant_id: String,
}

async fn create_invite(
    State(state): State<AppState>,
    trip_id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<InviteBody>, JsonRejection>,
) -> Result<Json<InviteCreated>, AppError> {
    let Path(trip_id) = trip_id?;
    let Json(body) = body?;
    let participant = state
        .invites
        .invite(&trip_id.to_string(), &body.email)
        .await?;
    Ok(Json(InviteCreated {
        participant_id: participant.id,
    }))
}
