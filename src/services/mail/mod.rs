//! Outbound email.
//!
//! [`Mailer`] is the seam the trip services send through. Three transports
//! implement it: [`SmtpMailer`] delivers through an SMTP relay,
//! [`LogMailer`] only logs what would have been sent, and [`MemoryMailer`]
//! keeps messages in memory so tests can inspect them.

mod memory;
mod smtp;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

pub use memory::MemoryMailer;
pub use smtp::SmtpMailer;

use crate::{
    config::{AppConfig, MailTransport},
    error::AppError,
};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("failed to render email: {0}")]
    Render(#[from] askama::Error),
    #[error("failed to build email: {0}")]
    Build(String),
    #[error("failed to send email to {to}: {reason}")]
    Transport { to: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    pub fn new(name: Option<String>, address: impl Into<String>) -> Self {
        Self {
            name,
            address: address.into(),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref() {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Simulated delivery: the message is written to the log and dropped.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        info!(to = %message.to, subject = %message.subject, "email delivery simulated");
        debug!(html = %message.html, "simulated email body");
        Ok(())
    }
}

pub fn mailer_from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>, AppError> {
    match (config.mail_transport, config.smtp.as_ref()) {
        (MailTransport::Smtp, Some(smtp)) => Ok(Arc::new(SmtpMailer::new(smtp)?)),
        (MailTransport::Smtp, None) => Err(AppError::Config(
            "MAIL_TRANSPORT=smtp needs SMTP settings".into(),
        )),
        (MailTransport::Log, _) => Ok(Arc::new(LogMailer)),
    }
}
