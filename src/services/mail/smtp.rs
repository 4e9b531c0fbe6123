use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox as LettreMailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use super::{EmailMessage, MailError, Mailbox, Mailer};
use crate::{config::SmtpConfig, error::AppError};

/// Delivers through an SMTP relay using lettre's tokio transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let mut builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|err| AppError::Config(format!("SMTP relay error: {err}")))?
        } else {
            // plain connection, e.g. a local Mailpit
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn to_lettre(mailbox: &Mailbox) -> Result<LettreMailbox, MailError> {
    let address = mailbox
        .address
        .parse::<lettre::Address>()
        .map_err(|err| MailError::InvalidAddress {
            address: mailbox.address.clone(),
            reason: err.to_string(),
        })?;
    Ok(LettreMailbox::new(mailbox.name.clone(), address))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let email = Message::builder()
            .from(to_lettre(&message.from)?)
            .to(to_lettre(&message.to)?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|err| MailError::Build(err.to_string()))?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|err| MailError::Transport {
                to: message.to.address.clone(),
                reason: err.to_string(),
            })?;

        info!(to = %message.to, code = %response.code(), "email sent");
        Ok(())
    }
}
