use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

use crate::config::{NotifyConfig, SmtpConfig};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

/// One outbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Notice {
    /// The lead-created message, built from configuration
    pub fn lead_created(config: &NotifyConfig) -> Self {
        Self {
            from: config.from.clone(),
            to: config.to.clone(),
            subject: config.subject.clone(),
            body: config.body.clone(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Pick the notifier the configuration asks for
pub fn from_config(config: &NotifyConfig) -> Result<Box<dyn Notifier>, NotifyError> {
    match &config.smtp {
        Some(smtp) => Ok(Box::new(SmtpNotifier::new(smtp)?)),
        None => Ok(Box::new(LogNotifier)),
    }
}

/// Sends through an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(smtp: &SmtpConfig) -> Result<Self, NotifyError> {
        let transport = match (&smtp.username, &smtp.password) {
            (Some(user), Some(pass)) => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                .map_err(|e| NotifyError::Transport(e.to_string()))?
                .port(smtp.port)
                .credentials(Credentials::new(user.clone(), pass.clone()))
                .build(),
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
                .port(smtp.port)
                .build(),
        };
        Ok(Self { transport })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&notice.from)?)
            .subject(notice.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &notice.to {
            builder = builder.to(parse_mailbox(recipient)?);
        }
        let email = builder
            .body(notice.body.clone())
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        info!("Notification '{}' sent to {}", notice.subject, notice.to.join(", "));
        Ok(())
    }
}

/// Writes the message to the log instead of sending it
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        info!(
            from = %notice.from,
            to = %notice.to.join(", "),
            subject = %notice.subject,
            "SMTP not configured; notification logged only"
        );
        Ok(())
    }
}

/// Keeps every message in memory. Used by tests to assert on the outbox.
#[derive(Default)]
pub struct RecordingNotifier {
    outbox: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notice> {
        self.outbox.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(notice.clone());
        }
        Ok(())
    }
}
