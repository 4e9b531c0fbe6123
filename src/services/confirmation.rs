use futures::future::{join_all, try_join_all};
use tracing::{info, warn};

use super::ServiceContext;
use crate::{
    config::NotifyPolicy,
    error::{AppError, ClientError},
    services::mail::EmailMessage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripConfirmation {
    /// This call flipped the flag and notified the invitees.
    Confirmed { notified: usize, failed: usize },
    AlreadyConfirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantConfirmation {
    pub trip_id: String,
    pub newly_confirmed: bool,
}

#[derive(Clone)]
pub struct ConfirmationService {
    ctx: ServiceContext,
    policy: NotifyPolicy,
}

impl ConfirmationService {
    pub fn new(ctx: ServiceContext, policy: NotifyPolicy) -> Self {
        Self { ctx, policy }
    }

    /// Moves a trip from unconfirmed to confirmed and sends every invitee a
    /// confirmation request. Only the call that wins the conditional update
    /// sends mail; later calls are no-ops.
    ///
    /// An unknown trip is a server-side failure here, not a client error.
    pub async fn confirm_trip(&self, trip_id: &str) -> Result<TripConfirmation, AppError> {
        let trip = self
            .ctx
            .store
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::MissingTrip(trip_id.to_string()))?;

        if trip.is_confirmed || !self.ctx.store.mark_trip_confirmed(&trip.id).await? {
            return Ok(TripConfirmation::AlreadyConfirmed);
        }

        let invitees = self.ctx.store.list_invitees(&trip.id).await?;
        let messages = invitees
            .iter()
            .map(|participant| {
                let link = self.ctx.links.participant_confirmation(&participant.id);
                self.ctx.composer.participant_invite(&trip, participant, &link)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let failed = self.notify(&messages).await?;
        info!(
            trip_id = %trip.id,
            notified = messages.len() - failed,
            failed,
            "trip confirmed"
        );

        Ok(TripConfirmation::Confirmed {
            notified: messages.len() - failed,
            failed,
        })
    }

    /// Returns the number of failed sends. Under [`NotifyPolicy::AllOrNothing`]
    /// the first failure is returned as an error instead.
    async fn notify(&self, messages: &[EmailMessage]) -> Result<usize, AppError> {
        let sends = messages.iter().map(|message| self.ctx.mailer.send(message));
        match self.policy {
            NotifyPolicy::AllOrNothing => {
                try_join_all(sends).await?;
                Ok(0)
            }
            NotifyPolicy::BestEffort => {
                let failures = join_all(sends)
                    .await
                    .into_iter()
                    .filter_map(Result::err)
                    .inspect(|err| warn!("invitee notification failed: {err}"))
                    .count();
                Ok(failures)
            }
        }
    }

    pub async fn confirm_participant(
        &self,
        participant_id: &str,
    ) -> Result<ParticipantConfirmation, AppError> {
        let participant = self
            .ctx
            .store
            .find_participant(participant_id)
            .await?
            .ok_or(ClientError::ParticipantNotFound)?;

        let newly_confirmed = !participant.is_confirmed
            && self
                .ctx
                .store
                .mark_participant_confirmed(&participant.id)
                .await?;
        if newly_confirmed {
            info!(
                participant_id = %participant.id,
                trip_id = %participant.trip_id,
                "participant confirmed"
            );
        }

        Ok(ParticipantConfirmation {
            trip_id: participant.trip_id,
            newly_confirmed,
        })
    }
}
