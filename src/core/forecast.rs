use crate::core::{
    clock::{MINUTES_PER_HOUR, TimeOfDay},
    error::ScheduleError,
    label::HOURS_PER_DAY,
    status::Status,
    timeline::Timeline,
};

/// When the power is expected back after a cutoff.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Restoration {
    At(TimeOfDay),

    /// The power does not come back until the end of the day, or the schedule does not tell.
    EndOfDay,
}

impl Restoration {
    pub const fn time(self) -> TimeOfDay {
        match self {
            Self::At(time) => time,
            Self::EndOfDay => TimeOfDay::END_OF_DAY,
        }
    }

    /// Hour of the restoration, `24` when unresolved today.
    #[cfg(test)]
    pub const fn hour(self) -> u32 {
        self.time().hour
    }

    #[cfg(test)]
    pub const fn minute(self) -> u32 {
        self.time().minute
    }

    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::At(_))
    }
}

/// The nearest upcoming outage, relative to the moment it has been computed for.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Forecast {
    pub cutoff: TimeOfDay,
    pub restoration: Restoration,

    /// Status of the interval that triggers the cutoff.
    pub status: Status,

    /// Always positive.
    pub minutes_until_cutoff: u32,
}

impl Forecast {
    #[must_use]
    pub const fn outage_minutes(&self) -> u32 {
        self.restoration.time().minutes() - self.cutoff.minutes()
    }
}

/// Find the nearest future cutoff and the following restoration.
///
/// An outage that is already ongoing at `now` is not reported.
/// Returns `None` when no outage is scheduled for the rest of the day.
pub fn forecast_next(
    timeline: &Timeline,
    now: TimeOfDay,
) -> Result<Option<Forecast>, ScheduleError> {
    let now_minutes = now.minutes();
    let Some((status, cutoff_minutes)) = timeline
        .iter()
        .filter(|(_, status)| status.is_outage())
        .map(|(label, status)| {
            (status, label.start_hour() * MINUTES_PER_HOUR + status.cutoff_minute())
        })
        .filter(|(_, cutoff_minutes)| *cutoff_minutes > now_minutes)
        .min_by_key(|(_, cutoff_minutes)| *cutoff_minutes)
    else {
        return Ok(None);
    };
    let cutoff_end_minutes = cutoff_minutes + status.outage_minutes();
    Ok(Some(Forecast {
        cutoff: TimeOfDay::from_minutes(cutoff_minutes),
        restoration: find_restoration(timeline, cutoff_end_minutes)?,
        status,
        minutes_until_cutoff: cutoff_minutes - now_minutes,
    }))
}

/// First moment at or after `since_minutes` when the power is back.
///
/// `PowerOn` and second-half outages restore at the top of the hour,
/// first-half outages at half past. Does not look past the end of the day.
fn find_restoration(
    timeline: &Timeline,
    since_minutes: u32,
) -> Result<Restoration, ScheduleError> {
    for hour in since_minutes / MINUTES_PER_HOUR..HOURS_PER_DAY {
        let status = timeline.get(hour)?;
        let on_minute =
            if status == Status::PowerOn { Some(0) } else { status.sub_hour_on_minute() };
        if let Some(on_minute) = on_minute {
            let minutes = hour * MINUTES_PER_HOUR + on_minute;
            // Only a first-half cutoff ends mid-hour, and its own hour restores at half past:
            if minutes >= since_minutes {
                return Ok(Restoration::At(TimeOfDay::from_minutes(minutes)));
            }
        }
    }
    Ok(Restoration::EndOfDay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_powered_none() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn);
        assert_eq!(forecast_next(&timeline, TimeOfDay::MIDNIGHT)?, None);
        assert_eq!(forecast_next(&timeline, TimeOfDay::new(12, 30))?, None);
        Ok(())
    }

    #[test]
    fn test_whole_hour_outage_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn).with(11, Status::PowerOff);
        let forecast = forecast_next(&timeline, TimeOfDay::new(9, 0))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(11, 0));
        assert_eq!(forecast.restoration, Restoration::At(TimeOfDay::new(12, 0)));
        assert_eq!(forecast.status, Status::PowerOff);
        assert_eq!(forecast.minutes_until_cutoff, 120);
        assert_eq!(forecast.outage_minutes(), 60);
        Ok(())
    }

    #[test]
    fn test_first_half_restores_within_hour_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn).with(14, Status::OffFirstHalf);
        let forecast = forecast_next(&timeline, TimeOfDay::new(13, 45))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(14, 0));
        assert_eq!(forecast.restoration, Restoration::At(TimeOfDay::new(14, 30)));
        assert_eq!(forecast.minutes_until_cutoff, 15);
        Ok(())
    }

    #[test]
    fn test_second_half_cutoff_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn).with(10, Status::OffSecondHalfUncertain);
        let forecast = forecast_next(&timeline, TimeOfDay::new(10, 10))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(10, 30));
        assert_eq!(forecast.restoration, Restoration::At(TimeOfDay::new(11, 0)));
        assert_eq!(forecast.status, Status::OffSecondHalfUncertain);
        assert_eq!(forecast.minutes_until_cutoff, 20);
        Ok(())
    }

    #[test]
    fn test_consecutive_outages_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn)
            .with(16, Status::OffSecondHalf)
            .with(17, Status::PowerOff)
            .with(18, Status::Unknown)
            .with(19, Status::OffFirstHalfUncertain);
        let forecast = forecast_next(&timeline, TimeOfDay::new(8, 0))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(16, 30));
        assert_eq!(forecast.restoration, Restoration::At(TimeOfDay::new(19, 30)));
        assert_eq!(forecast.outage_minutes(), 180);
        Ok(())
    }

    #[test]
    fn test_restoration_by_second_half_status_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn)
            .with(5, Status::PowerOffUncertain)
            .with(6, Status::OffSecondHalf);
        let forecast = forecast_next(&timeline, TimeOfDay::new(4, 59))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(5, 0));
        assert_eq!(forecast.restoration, Restoration::At(TimeOfDay::new(6, 0)));
        assert_eq!(forecast.minutes_until_cutoff, 1);
        Ok(())
    }

    #[test]
    fn test_last_hour_end_of_day_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn).with(23, Status::PowerOff);
        let forecast = forecast_next(&timeline, TimeOfDay::new(20, 0))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(23, 0));
        assert_eq!(forecast.restoration, Restoration::EndOfDay);
        assert_eq!(forecast.restoration.hour(), 24);
        assert_eq!(forecast.restoration.minute(), 0);
        assert!(!forecast.restoration.is_resolved());
        Ok(())
    }

    #[test]
    fn test_no_restoration_until_midnight_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::Unknown).with(0, Status::PowerOn);
        let forecast = forecast_next(&timeline, TimeOfDay::new(0, 15))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(1, 0));
        assert_eq!(forecast.restoration, Restoration::EndOfDay);
        assert_eq!(forecast.outage_minutes(), 23 * 60);
        Ok(())
    }

    #[test]
    fn test_ongoing_outage_skipped() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn)
            .with(11, Status::PowerOff)
            .with(15, Status::PowerOff);
        let forecast = forecast_next(&timeline, TimeOfDay::new(11, 20))?.unwrap();
        assert_eq!(forecast.cutoff, TimeOfDay::new(15, 0));
        assert_eq!(forecast_next(&timeline, TimeOfDay::new(15, 0))?, None);
        Ok(())
    }

    #[test]
    fn test_last_outage_passed_none() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn).with(3, Status::OffFirstHalf);
        assert_eq!(forecast_next(&timeline, TimeOfDay::new(3, 0))?, None);
        assert!(forecast_next(&timeline, TimeOfDay::new(2, 59))?.is_some());
        Ok(())
    }

    #[test]
    fn test_missing_interval_err() {
        let timeline =
            Timeline::uniform(Status::PowerOn).with(20, Status::PowerOff).truncated(21);
        assert_eq!(
            forecast_next(&timeline, TimeOfDay::new(19, 0)),
            Err(ScheduleError::IntervalNotFound { hour: 21 }),
        );
    }
}
