use std::fmt::{Display, Formatter};

use chrono::{DateTime, Local, NaiveTime, Timelike};

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Wall-clock time within a single day, at minute precision.
///
/// `24:00` is representable and means the end of the day.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    #[cfg(test)]
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    pub const END_OF_DAY: Self = Self { hour: 24, minute: 0 };

    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self { hour: minutes / MINUTES_PER_HOUR, minute: minutes % MINUTES_PER_HOUR }
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.hour * MINUTES_PER_HOUR + self.minute
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self { hour: time.hour(), minute: time.minute() }
    }
}

impl From<DateTime<Local>> for TimeOfDay {
    fn from(timestamp: DateTime<Local>) -> Self {
        Self { hour: timestamp.hour(), minute: timestamp.minute() }
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_ok() {
        assert_eq!(TimeOfDay::new(13, 45).minutes(), 825);
        assert_eq!(TimeOfDay::from_minutes(825), TimeOfDay::new(13, 45));
        assert_eq!(TimeOfDay::from_minutes(MINUTES_PER_DAY), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn test_display_ok() {
        assert_eq!(TimeOfDay::new(9, 5).to_string(), "09:05");
        assert_eq!(TimeOfDay::END_OF_DAY.to_string(), "24:00");
    }

    #[test]
    fn test_from_naive_time_ok() {
        let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        assert_eq!(TimeOfDay::from(time), TimeOfDay::new(23, 59));
    }
}
