use tracing::info;

use super::ServiceContext;
use crate::{
    error::{AppError, ClientError},
    models::participant::{EmailAddress, Participant},
};

#[derive(Clone)]
pub struct InviteService {
    ctx: ServiceContext,
}

impl InviteService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Adds an unconfirmed participant to the trip and mails them their confirmation link.
    pub async fn invite(
        &self,
        trip_id: &str,
        email: &EmailAddress,
    ) -> Result<Participant, AppError> {
        let trip = self
            .ctx
            .store
            .find_trip(trip_id)
            .await?
            .ok_or(ClientError::TripNotFound)?;

        let participant = self
            .ctx
            .store
            .add_participant(&trip.id, email.as_str())
            .await?;
        info!(trip_id = %trip.id, participant_id = %participant.id, "participant invited");

        let link = self.ctx.links.participant_confirmation(&participant.id);
        let message = self
            .ctx
            .composer
            .participant_invite(&trip, &participant, &link)?;
        self.ctx.mailer.send(&message).await?;

        Ok(participant)
    }
}
