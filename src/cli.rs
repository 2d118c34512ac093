mod bot;
mod dtek;
mod heartbeat;
mod ping;
mod show;
mod subscribers;
mod telegram;
mod watch;

use clap::{Parser, Subcommand};

use crate::cli::{bot::BotArgs, ping::PingArgs, show::ShowArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll the schedule and alert the subscribers ahead of the outages.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Fetch the schedule once and print it together with the forecast.
    #[clap(name = "show")]
    Show(Box<ShowArgs>),

    /// Serve the `/start` subscription command.
    #[clap(name = "bot")]
    Bot(Box<BotArgs>),

    /// Send the check message to all subscribers.
    #[clap(name = "ping")]
    Ping(Box<PingArgs>),
}

impl Command {
    pub async fn run(self) -> crate::prelude::Result {
        match self {
            Self::Watch(args) => args.run().await,
            Self::Show(args) => args.run().await,
            Self::Bot(args) => args.run().await,
            Self::Ping(args) => args.run().await,
        }
    }
}
