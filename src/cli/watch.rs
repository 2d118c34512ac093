use std::{collections::HashSet, time::Duration};

use bon::Builder;
use chrono::{DateTime, Local, NaiveDate};
use clap::Parser;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    api::{heartbeat, schedule_source::ScheduleSource},
    cli::{
        dtek::DtekArgs,
        heartbeat::HeartbeatArgs,
        subscribers::SubscribersArgs,
        telegram::TelegramArgs,
    },
    core::{TimeOfDay, Timeline, evaluate_now, evaluator::is_power_on_now, forecast_next},
    notify::{Delivery, Notifier, dispatch},
    prelude::*,
    report::{ASSUME_OUTAGE_MESSAGE, format_alert, format_current_state},
    subscribers::SubscriberStore,
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(long, env = "POLLING_INTERVAL", default_value = "5min")]
    polling_interval: humantime::Duration,

    /// Alert the subscribers when the outage is this close.
    #[clap(long, env = "ALERT_LEAD_TIME", default_value = "30min")]
    lead_time: humantime::Duration,

    #[clap(flatten)]
    dtek: DtekArgs,

    #[clap(flatten)]
    telegram: TelegramArgs,

    #[clap(flatten)]
    subscribers: SubscribersArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        Watcher::builder()
            .notifier(self.telegram.new_client()?)
            .source(self.dtek.new_client()?)
            .subscribers(self.subscribers.open())
            .heartbeat(self.heartbeat.new_client()?)
            .interval(self.polling_interval)
            .lead_time(self.lead_time)
            .build()
            .run()
            .await
    }
}

#[derive(Builder)]
struct Watcher<S, N, P> {
    source: S,
    notifier: N,
    subscribers: P,
    heartbeat: heartbeat::Client,

    #[builder(into)]
    interval: Duration,

    #[builder(into)]
    lead_time: Duration,

    /// Cutoffs the subscribers have already been alerted about.
    #[builder(skip)]
    alerted: HashSet<(NaiveDate, TimeOfDay)>,

    /// Whether the subscribers have been told that the last schedule could not be read.
    #[builder(skip)]
    is_unresolved_reported: bool,
}

impl<S: ScheduleSource, N: Notifier, P: SubscriberStore> Watcher<S, N, P> {
    async fn run(mut self) -> Result {
        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match self.poll(Local::now()).await {
                Ok(()) => self.heartbeat.send().await,
                Err(error) => error!("failed to poll, retrying on the next tick: {error:#}"),
            }
        }
    }

    #[instrument(skip_all, fields(now = %now.format("%H:%M")))]
    async fn poll(&mut self, now: DateTime<Local>) -> Result {
        let raw = self.source.fetch().await.context("failed to fetch the schedule")?;
        let timeline = match Timeline::normalize(&raw) {
            Ok(timeline) => timeline,
            Err(error) => {
                warn!("assuming an outage: {error}");
                if !self.is_unresolved_reported {
                    self.is_unresolved_reported =
                        self.broadcast(ASSUME_OUTAGE_MESSAGE).await?.is_delivered_to_anyone();
                }
                return Ok(());
            }
        };
        self.is_unresolved_reported = false;
        debug!(n_intervals = timeline.len(), "normalized");

        let date = now.date_naive();
        let time = TimeOfDay::from(now);
        let state = evaluate_now(&timeline, time)?;
        info!("{}", format_current_state(&state, time));
        self.alerted.retain(|(alerted_date, _)| *alerted_date == date);

        let Some(forecast) = forecast_next(&timeline, time)? else {
            info!("no more outages today");
            return Ok(());
        };
        info!(
            cutoff = %forecast.cutoff,
            restoration = %forecast.restoration.time(),
            minutes_until_cutoff = forecast.minutes_until_cutoff,
            outage_minutes = forecast.outage_minutes(),
            "forecast",
        );
        if u64::from(forecast.minutes_until_cutoff) * 60 > self.lead_time.as_secs() {
            return Ok(());
        }
        if self.alerted.contains(&(date, forecast.cutoff)) {
            debug!("already alerted");
            return Ok(());
        }
        // The cutoff is strictly after `now`, hence never at midnight:
        let before_cutoff = TimeOfDay::from_minutes(forecast.cutoff.minutes() - 1);
        if !is_power_on_now(&timeline, before_cutoff)? {
            debug!("the outage continues the ongoing one");
            self.alerted.insert((date, forecast.cutoff));
            return Ok(());
        }
        if !state.is_on {
            debug!("the power is off, postponing the alert until it is back");
            return Ok(());
        }
        let delivery = self.broadcast(&format_alert(&forecast)).await?;
        if delivery.is_delivered_to_anyone() || delivery.n_recipients() == 0 {
            self.alerted.insert((date, forecast.cutoff));
        }
        Ok(())
    }

    async fn broadcast(&self, message: &str) -> Result<Delivery> {
        let recipients = self.subscribers.list()?;
        let delivery = dispatch(&self.notifier, message, &recipients).await;
        info!("sent {} of {}", delivery.delivered.len(), delivery.n_recipients());
        Ok(delivery)
    }
}
