use chrono::Utc;
use tracing::info;

use super::ServiceContext;
use crate::{
    error::{AppError, ClientError},
    models::{
        participant::Participant,
        trip::{check_trip_dates, NewTrip, Trip},
    },
};

#[derive(Clone)]
pub struct TripService {
    ctx: ServiceContext,
}

impl TripService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validates the dates, stores the trip with owner and invitees, and
    /// mails the owner a link to confirm it.
    ///
    /// A failed send is returned as an error even though the trip is already stored.
    pub async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, AppError> {
        check_trip_dates(new_trip.starts_at, new_trip.ends_at, Utc::now())?;

        let trip = self.ctx.store.create_trip(&new_trip).await?;
        info!(
            trip_id = %trip.id,
            destination = %trip.destination,
            invitees = new_trip.emails_to_invite.len(),
            "trip created"
        );

        let link = self.ctx.links.trip_confirmation(&trip.id);
        let message = self.ctx.composer.trip_confirmation(
            &trip,
            &new_trip.owner_name,
            &new_trip.owner_email,
            &link,
        )?;
        self.ctx.mailer.send(&message).await?;

        Ok(trip)
    }

    pub async fn trip_details(&self, trip_id: &str) -> Result<Trip, AppError> {
        self.ctx
            .store
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| ClientError::TripNotFound.into())
    }

    pub async fn participants(&self, trip_id: &str) -> Result<Vec<Participant>, AppError> {
        let trip = self.trip_details(trip_id).await?;
        self.ctx.store.list_participants(&trip.id).await
    }
}
