use async_trait::async_trait;

use crate::{core::RawSchedule, prelude::*};

/// Anything that publishes the day schedule.
#[async_trait]
pub trait ScheduleSource: Sync {
    async fn fetch(&self) -> Result<RawSchedule>;
}
