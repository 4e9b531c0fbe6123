use askama::Template;
use chrono::{DateTime, Locale, Utc};
use url::Url;

use crate::{
    models::{participant::Participant, trip::Trip},
    services::mail::{EmailMessage, MailError, Mailbox},
};

/// Long pt-BR date, e.g. "16 de outubro de 2026".
pub fn format_display_date(date: DateTime<Utc>) -> String {
    date.format_localized("%-d de %B de %Y", Locale::pt_BR)
        .to_string()
}

#[derive(Template)]
#[template(path = "emails/trip_confirmation.html")]
struct TripConfirmationTemplate<'a> {
    owner_name: &'a str,
    destination: &'a str,
    starts_at: String,
    ends_at: String,
    confirmation_link: &'a str,
}

#[derive(Template)]
#[template(path = "emails/participant_invite.html")]
struct ParticipantInviteTemplate<'a> {
    participant_name: Option<&'a str>,
    destination: &'a str,
    starts_at: String,
    ends_at: String,
    confirmation_link: &'a str,
}

/// Renders the trip emails and addresses them from the configured sender.
#[derive(Debug, Clone)]
pub struct EmailComposer {
    sender: Mailbox,
}

impl EmailComposer {
    pub fn new(sender: Mailbox) -> Self {
        Self { sender }
    }

    pub fn trip_confirmation(
        &self,
        trip: &Trip,
        owner_name: &str,
        owner_email: &str,
        confirmation_link: &Url,
    ) -> Result<EmailMessage, MailError> {
        let starts_at = format_display_date(trip.starts_at);
        let html = TripConfirmationTemplate {
            owner_name,
            destination: &trip.destination,
            starts_at: starts_at.clone(),
            ends_at: format_display_date(trip.ends_at),
            confirmation_link: confirmation_link.as_str(),
        }
        .render()?;

        Ok(EmailMessage {
            from: self.sender.clone(),
            to: Mailbox::new(Some(owner_name.to_string()), owner_email),
            subject: format!(
                "Confirme sua viagem para {} em {starts_at}",
                trip.destination
            ),
            html: html.trim().to_string(),
        })
    }

    pub fn participant_invite(
        &self,
        trip: &Trip,
        participant: &Participant,
        confirmation_link: &Url,
    ) -> Result<EmailMessage, MailError> {
        let starts_at = format_display_date(trip.starts_at);
        let html = ParticipantInviteTemplate {
            participant_name: participant.name_text(),
            destination: &trip.destination,
            starts_at: starts_at.clone(),
            ends_at: format_display_date(trip.ends_at),
            confirmation_link: confirmation_link.as_str(),
        }
        .render()?;

        Ok(EmailMessage {
            from: self.sender.clone(),
            to: Mailbox::new(participant.name.clone(), participant.email.as_str()),
            subject: format!(
                "Confirme sua presença na viagem para {} em {starts_at}",
                trip.destination
            ),
            html: html.trim().to_string(),
        })
    }
}
