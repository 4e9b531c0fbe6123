use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        participant::Participant,
        trip::{NewTrip, Trip},
    },
};

/// Persistence for trips and their participants.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Inserts the trip, its owner and its invitees in one transaction.
    async fn create_trip(&self, new_trip: &NewTrip) -> Result<Trip, AppError>;

    async fn find_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError>;

    async fn add_participant(&self, trip_id: &str, email: &str) -> Result<Participant, AppError>;

    async fn find_participant(&self, participant_id: &str)
        -> Result<Option<Participant>, AppError>;

    /// Owner first, then invitees in insertion order.
    async fn list_participants(&self, trip_id: &str) -> Result<Vec<Participant>, AppError>;

    async fn list_invitees(&self, trip_id: &str) -> Result<Vec<Participant>, AppError>;

    /// Flips `is_confirmed` only if it was unset. Returns whether this call changed it.
    async fn mark_trip_confirmed(&self, trip_id: &str) -> Result<bool, AppError>;

    /// Same contract as [`TripStore::mark_trip_confirmed`], for a participant.
    async fn mark_participant_confirmed(&self, participant_id: &str) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct SqliteTripStore {
    db: DbPool,
}

impl SqliteTripStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

const TRIP_COLUMNS: &str = "id, destination, starts_at, ends_at, is_confirmed, created_at";
const PARTICIPANT_COLUMNS: &str = "id, name, email, is_owner, is_confirmed, trip_id";

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn create_trip(&self, new_trip: &NewTrip) -> Result<Trip, AppError> {
        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            destination: new_trip.destination.clone(),
            starts_at: new_trip.starts_at,
            ends_at: new_trip.ends_at,
            is_confirmed: false,
            created_at: Utc::now(),
        };

        let mut tx = self.db.begin().await?;

        sqlx::query(
            "INSERT INTO trips (id, destination, starts_at, ends_at, is_confirmed, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&trip.id)
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .bind(trip.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO participants (id, name, email, is_owner, is_confirmed, trip_id) \
             VALUES (?, ?, ?, 1, 1, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&new_trip.owner_name)
        .bind(&new_trip.owner_email)
        .bind(&trip.id)
        .execute(&mut *tx)
        .await?;

        for email in &new_trip.emails_to_invite {
            sqlx::query(
                "INSERT INTO participants (id, name, email, is_owner, is_confirmed, trip_id) \
                 VALUES (?, NULL, ?, 0, 0, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(email)
            .bind(&trip.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(trip)
    }

    async fn find_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"
        ))
        .bind(trip_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(trip)
    }

    async fn add_participant(&self, trip_id: &str, email: &str) -> Result<Participant, AppError> {
        let participant = Participant {
            id: Uuid::new_v4().to_string(),
            name: None,
            email: email.to_string(),
            is_owner: false,
            is_confirmed: false,
            trip_id: trip_id.to_string(),
        };

        sqlx::query(
            "INSERT INTO participants (id, name, email, is_owner, is_confirmed, trip_id) \
             VALUES (?, NULL, ?, 0, 0, ?)",
        )
        .bind(&participant.id)
        .bind(&participant.email)
        .bind(&participant.trip_id)
        .execute(&self.db)
        .await?;

        Ok(participant)
    }

    async fn find_participant(
        &self,
        participant_id: &str,
    ) -> Result<Option<Participant>, AppError> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?"
        ))
        .bind(participant_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(participant)
    }

    async fn list_participants(&self, trip_id: &str) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE trip_id = ? \
             ORDER BY is_owner DESC, rowid ASC"
        ))
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(participants)
    }

    async fn list_invitees(&self, trip_id: &str) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE trip_id = ? AND is_owner = 0 \
             ORDER BY rowid ASC"
        ))
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(participants)
    }

    async fn mark_trip_confirmed(&self, trip_id: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE trips SET is_confirmed = 1 WHERE id = ? AND is_confirmed = 0")
                .bind(trip_id)
                .execute(&self.db)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn mark_participant_confirmed(&self, participant_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE participants SET is_confirmed = 1 WHERE id = ? AND is_confirmed = 0",
        )
        .bind(participant_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
