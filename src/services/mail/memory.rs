use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;

use super::{EmailMessage, MailError, Mailer};

/// Keeps every sent message in memory. Sends to addresses registered with
/// [`MemoryMailer::fail_for`] are rejected with a transport error.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    sent: Vec<EmailMessage>,
    failing: HashSet<String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, address: impl Into<String>) {
        self.lock().failing.insert(address.into());
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.lock().sent.clone()
    }

    pub fn sent_to(&self, address: &str) -> Vec<EmailMessage> {
        self.lock()
            .sent
            .iter()
            .filter(|message| message.to.address == address)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().sent.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let mut inner = self.lock();
        if inner.failing.contains(&message.to.address) {
            return Err(MailError::Transport {
                to: message.to.address.clone(),
                reason: "rejected by memory mailer".into(),
            });
        }
        inner.sent.push(message.clone());
        Ok(())
    }
}
