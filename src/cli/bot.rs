use std::time::Duration;

use clap::Parser;
use tokio::time::sleep;

use crate::{
    api::telegram::Message,
    cli::{subscribers::SubscribersArgs, telegram::TelegramArgs},
    prelude::*,
    report::{ALREADY_SUBSCRIBED_MESSAGE, SUBSCRIBED_MESSAGE},
    subscribers::SubscriberStore,
};

#[derive(Parser)]
pub struct BotArgs {
    /// Long polling timeout.
    #[clap(long, env = "BOT_POLLING_TIMEOUT", default_value = "30s")]
    polling_timeout: humantime::Duration,

    /// Pause after a failed `getUpdates` call.
    #[clap(long, env = "BOT_RETRY_DELAY", default_value = "5s")]
    retry_delay: humantime::Duration,

    #[clap(flatten)]
    telegram: TelegramArgs,

    #[clap(flatten)]
    subscribers: SubscribersArgs,
}

impl BotArgs {
    pub async fn run(self) -> Result {
        let telegram = self.telegram.new_client()?;
        let store = self.subscribers.open();
        let mut offset = None;

        info!("listening…");
        loop {
            let updates = match telegram.get_updates(offset, self.polling_timeout.into()).await {
                Ok(updates) => updates,
                Err(error) => {
                    warn!("failed to get the updates: {error:#}");
                    sleep(self.retry_delay.into()).await;
                    continue;
                }
            };
            for update in updates {
                offset = Some(update.update_id + 1);
                let Some(message) = update.message else { continue };
                match handle_message(&store, &message) {
                    Ok(Some(reply)) => {
                        if let Err(error) = telegram.send_message(message.chat.id, reply).await {
                            warn!(chat_id = %message.chat.id, "failed to reply: {error:#}");
                        }
                    }
                    Ok(None) => {}
                    Err(error) => error!(chat_id = %message.chat.id, "{error:#}"),
                }
            }
        }
    }
}

/// Subscribe the chat on `/start`, ignore anything else.
fn handle_message(store: &dyn SubscriberStore, message: &Message) -> Result<Option<&'static str>> {
    let command = message
        .text
        .as_deref()
        .and_then(|text| text.split_whitespace().next())
        .and_then(|command| command.split('@').next());
    if command != Some("/start") {
        return Ok(None);
    }
    let reply = if store.add(message.chat.id)? {
        info!(chat_id = %message.chat.id, "new subscriber");
        SUBSCRIBED_MESSAGE
    } else {
        ALREADY_SUBSCRIBED_MESSAGE
    };
    Ok(Some(reply))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{
        api::telegram::{Chat, ChatId},
        subscribers::tests::MemoryStore,
    };

    fn message(chat_id: i64, text: Option<&str>) -> Message {
        Message { chat: Chat { id: ChatId(chat_id) }, text: text.map(str::to_string) }
    }

    #[test]
    fn test_start_subscribes_ok() -> Result {
        let store = MemoryStore::default();
        assert_eq!(handle_message(&store, &message(42, Some("/start")))?, Some(SUBSCRIBED_MESSAGE));
        assert_eq!(
            handle_message(&store, &message(42, Some("/start@svitlo_bot")))?,
            Some(ALREADY_SUBSCRIBED_MESSAGE),
        );
        assert_eq!(store.list()?, BTreeSet::from([ChatId(42)]));
        Ok(())
    }

    #[test]
    fn test_other_messages_ignored_ok() -> Result {
        let store = MemoryStore::default();
        assert_eq!(handle_message(&store, &message(1, Some("hello")))?, None);
        assert_eq!(handle_message(&store, &message(1, Some("/stop")))?, None);
        assert_eq!(handle_message(&store, &message(1, None))?, None);
        assert!(store.list()?.is_empty());
        Ok(())
    }
}
