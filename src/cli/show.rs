use std::{fs, path::PathBuf};

use chrono::Local;
use clap::Parser;

use crate::{
    api::schedule_source::ScheduleSource,
    cli::dtek::DtekArgs,
    core::{TimeOfDay, Timeline, evaluate_now, forecast_next},
    prelude::*,
    report::{format_current_state, format_forecast},
    tables::{build_timeline_table, render_tsv},
};

#[derive(Parser)]
pub struct ShowArgs {
    /// Also dump the timeline into the tab-separated file.
    #[clap(long, env = "SHOW_OUTPUT_PATH")]
    output: Option<PathBuf>,

    #[clap(flatten)]
    dtek: DtekArgs,
}

impl ShowArgs {
    pub async fn run(self) -> Result {
        let raw = self.dtek.new_client()?.fetch().await?;
        let timeline = Timeline::normalize(&raw).context("failed to interpret the schedule")?;
        let now = TimeOfDay::from(Local::now());

        println!("{}", build_timeline_table(&timeline, now));
        println!("{}", format_current_state(&evaluate_now(&timeline, now)?, now));
        println!("{}", format_forecast(forecast_next(&timeline, now)?.as_ref()));

        if let Some(path) = self.output {
            fs::write(&path, render_tsv(&timeline))
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            info!(path = %path.display(), "saved");
        }
        Ok(())
    }
}
