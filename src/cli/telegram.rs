use clap::Parser;

use crate::{api::telegram::Api, prelude::*};

#[derive(Parser)]
pub struct TelegramArgs {
    #[clap(long = "telegram-bot-token", env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,
}

impl TelegramArgs {
    pub fn new_client(&self) -> Result<Api> {
        Api::new(&self.bot_token)
    }
}
