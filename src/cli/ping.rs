use clap::Parser;

use crate::{
    cli::{subscribers::SubscribersArgs, telegram::TelegramArgs},
    notify::dispatch,
    prelude::*,
    report::PING_MESSAGE,
    subscribers::SubscriberStore,
};

#[derive(Parser)]
pub struct PingArgs {
    #[clap(flatten)]
    telegram: TelegramArgs,

    #[clap(flatten)]
    subscribers: SubscribersArgs,
}

impl PingArgs {
    pub async fn run(self) -> Result {
        let telegram = self.telegram.new_client()?;
        let recipients = self.subscribers.open().list()?;
        let delivery = dispatch(&telegram, PING_MESSAGE, &recipients).await;
        info!("sent {} of {}", delivery.delivered.len(), delivery.n_recipients());
        ensure!(
            recipients.is_empty() || delivery.is_delivered_to_anyone(),
            "failed to deliver the check message",
        );
        Ok(())
    }
}
