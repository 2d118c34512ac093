use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::{
    api::telegram::{self, ChatId},
    prelude::*,
};

#[async_trait]
pub trait Notifier: Sync {
    async fn send(&self, recipient: ChatId, message: &str) -> Result;
}

#[async_trait]
impl Notifier for telegram::Api {
    async fn send(&self, recipient: ChatId, message: &str) -> Result {
        self.send_message(recipient, message).await.map(drop)
    }
}

/// Outcome of one message sent to multiple recipients.
#[must_use]
#[derive(Debug, Default)]
pub struct Delivery {
    pub delivered: Vec<ChatId>,
    pub failed: Vec<(ChatId, Error)>,
}

impl Delivery {
    #[must_use]
    pub fn n_recipients(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    #[must_use]
    pub fn is_delivered_to_anyone(&self) -> bool {
        !self.delivered.is_empty()
    }
}

/// Send the message to every recipient, one failure does not stop the others.
#[instrument(skip_all, fields(n_recipients = recipients.len()))]
pub async fn dispatch(
    notifier: &dyn Notifier,
    message: &str,
    recipients: &BTreeSet<ChatId>,
) -> Delivery {
    if recipients.is_empty() {
        warn!("no recipients");
    }
    let mut delivery = Delivery::default();
    for &recipient in recipients {
        match notifier.send(recipient, message).await {
            Ok(()) => {
                debug!(%recipient, "delivered");
                delivery.delivered.push(recipient);
            }
            Err(error) => {
                warn!(%recipient, "failed to deliver: {error:#}");
                delivery.failed.push((recipient, error));
            }
        }
    }
    info!(n_delivered = delivery.delivered.len(), n_failed = delivery.failed.len(), "dispatched");
    delivery
}
