use std::{env, net::SocketAddr, str::FromStr};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailTransport {
    /// Messages are written to the log instead of being delivered.
    #[default]
    Log,
    Smtp,
}

impl FromStr for MailTransport {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "smtp" => Ok(Self::Smtp),
            other => Err(AppError::Config(format!(
                "invalid MAIL_TRANSPORT {other:?}, expected \"log\" or \"smtp\""
            ))),
        }
    }
}

/// How the trip confirmation fan-out reacts to a failed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// The first failed send fails the whole request.
    #[default]
    AllOrNothing,
    /// Every send is attempted; failures are logged and the request succeeds.
    BestEffort,
}

impl FromStr for NotifyPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all-or-nothing" => Ok(Self::AllOrNothing),
            "best-effort" => Ok(Self::BestEffort),
            other => Err(AppError::Config(format!(
                "invalid CONFIRM_NOTIFY_POLICY {other:?}, \
                 expected \"all-or-nothing\" or \"best-effort\""
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub api_base_url: Url,
    pub web_base_url: Url,
    pub mail_transport: MailTransport,
    pub mail_from_name: String,
    pub mail_from_address: String,
    pub smtp: Option<SmtpConfig>,
    pub notify_policy: NotifyPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://planner.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3333".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let api_base_url = parse_base_url("API_BASE_URL", "http://localhost:3333")?;
        let web_base_url = parse_base_url("WEB_BASE_URL", "http://localhost:3000")?;

        let mail_transport = match env::var("MAIL_TRANSPORT") {
            Ok(value) => value.parse()?,
            Err(_) => MailTransport::default(),
        };
        let mail_from_name =
            env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Equipe plann.er".to_string());
        let mail_from_address =
            env::var("MAIL_FROM_ADDRESS").unwrap_or_else(|_| "oi@plann.er".to_string());

        let smtp = match mail_transport {
            MailTransport::Smtp => Some(smtp_from_env()?),
            MailTransport::Log => None,
        };

        let notify_policy = match env::var("CONFIRM_NOTIFY_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => NotifyPolicy::default(),
        };

        Ok(Self {
            database_url,
            listen_addr,
            api_base_url,
            web_base_url,
            mail_transport,
            mail_from_name,
            mail_from_address,
            smtp,
            notify_policy,
        })
    }
}

fn smtp_from_env() -> Result<SmtpConfig, AppError> {
    let host = env::var("SMTP_HOST")
        .map_err(|_| AppError::Config("SMTP_HOST is required when MAIL_TRANSPORT=smtp".into()))?;
    let port = match env::var("SMTP_PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|err| AppError::Config(format!("invalid SMTP_PORT: {err}")))?,
        Err(_) => 587,
    };
    let tls = env::var("SMTP_TLS")
        .map(|raw| !matches!(raw.trim(), "0" | "false" | "no"))
        .unwrap_or(true);

    Ok(SmtpConfig {
        host,
        port,
        username: env::var("SMTP_USERNAME").ok(),
        password: env::var("SMTP_PASSWORD").ok(),
        tls,
    })
}

fn parse_base_url(key: &str, default: &str) -> Result<Url, AppError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|err| AppError::Config(format!("invalid {key}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_policy_parses_known_values() {
        assert_eq!(
            "best-effort".parse::<NotifyPolicy>().unwrap(),
            NotifyPolicy::BestEffort
        );
        assert_eq!(
            " All-Or-Nothing ".parse::<NotifyPolicy>().unwrap(),
            NotifyPolicy::AllOrNothing
        );
        assert!("sometimes".parse::<NotifyPolicy>().is_err());
    }

    #[test]
    fn mail_transport_rejects_unknown_backends() {
        assert_eq!("SMTP".parse::<MailTransport>().unwrap(), MailTransport::Smtp);
        assert!(matches!(
            "pigeon".parse::<MailTransport>(),
            Err(AppError::Config(_))
        ));
    }
}
