use crate::core::{
    clock::TimeOfDay,
    error::ScheduleError,
    status::Status,
    timeline::Timeline,
};

/// Power state at a given moment.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CurrentState {
    pub status: Status,
    pub is_on: bool,
}

pub fn current_status(timeline: &Timeline, now: TimeOfDay) -> Result<Status, ScheduleError> {
    timeline.get(now.hour)
}

/// Whether the power is on at the moment, at half-hour precision.
///
/// [`Status::Unknown`] is never reported as powered.
pub fn is_power_on_now(timeline: &Timeline, now: TimeOfDay) -> Result<bool, ScheduleError> {
    Ok(current_status(timeline, now)?.is_on_at(now.minute))
}

pub fn evaluate_now(timeline: &Timeline, now: TimeOfDay) -> Result<CurrentState, ScheduleError> {
    Ok(CurrentState {
        status: current_status(timeline, now)?,
        is_on: is_power_on_now(timeline, now)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_on(status: Status, minute: u32) -> Result<bool, ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn).with(7, status);
        is_power_on_now(&timeline, TimeOfDay::new(7, minute))
    }

    #[test]
    fn test_whole_hour_statuses_ok() -> Result<(), ScheduleError> {
        for minute in 0..60 {
            assert!(is_on(Status::PowerOn, minute)?);
            assert!(!is_on(Status::PowerOff, minute)?);
            assert!(!is_on(Status::PowerOffUncertain, minute)?);
            assert!(!is_on(Status::Unknown, minute)?);
        }
        Ok(())
    }

    #[test]
    fn test_off_first_half_ok() -> Result<(), ScheduleError> {
        for status in [Status::OffFirstHalf, Status::OffFirstHalfUncertain] {
            assert!(!is_on(status, 0)?);
            assert!(!is_on(status, 29)?);
            assert!(is_on(status, 30)?);
            assert!(is_on(status, 59)?);
        }
        Ok(())
    }

    #[test]
    fn test_off_second_half_ok() -> Result<(), ScheduleError> {
        for status in [Status::OffSecondHalf, Status::OffSecondHalfUncertain] {
            assert!(is_on(status, 0)?);
            assert!(is_on(status, 29)?);
            assert!(!is_on(status, 30)?);
            assert!(!is_on(status, 59)?);
        }
        Ok(())
    }

    #[test]
    fn test_evaluate_now_ok() -> Result<(), ScheduleError> {
        let timeline = Timeline::uniform(Status::PowerOn).with(18, Status::OffSecondHalf);
        assert_eq!(
            evaluate_now(&timeline, TimeOfDay::new(18, 45))?,
            CurrentState { status: Status::OffSecondHalf, is_on: false },
        );
        assert_eq!(
            evaluate_now(&timeline, TimeOfDay::new(17, 45))?,
            CurrentState { status: Status::PowerOn, is_on: true },
        );
        Ok(())
    }

    #[test]
    fn test_interval_not_found_err() {
        let timeline = Timeline::uniform(Status::PowerOn).truncated(20);
        assert_eq!(
            evaluate_now(&timeline, TimeOfDay::new(21, 0)),
            Err(ScheduleError::IntervalNotFound { hour: 21 }),
        );
        assert!(is_power_on_now(&timeline, TimeOfDay::new(19, 59)).is_ok());
    }
}
