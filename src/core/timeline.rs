use std::collections::HashMap;

use itertools::Itertools;

use crate::core::{
    error::ScheduleError,
    label::{HOURS_PER_DAY, IntervalLabel, leading_number},
    status::Status,
};

const N_HOURS: usize = HOURS_PER_DAY as usize;

/// Day schedule as the utility publishes it.
///
/// Neither map is guaranteed to be sorted or to cover the whole day.
#[derive(Clone, Debug, Default)]
pub struct RawSchedule {
    /// Raw interval key to its sub-labels, the first one being the canonical `HH-HH` label.
    pub intervals: Option<HashMap<String, Vec<String>>>,

    /// Raw interval key to the status token.
    pub statuses: Option<HashMap<String, String>>,
}

#[cfg(test)]
impl RawSchedule {
    /// Same shape as the DTEK `preset.time_zone` and `fact.data` objects.
    pub fn dtek_day(token: impl Fn(u32) -> &'static str) -> Self {
        Self {
            intervals: Some(
                (0..24)
                    .map(|hour| {
                        let label = format!("{hour:02}-{:02}", (hour + 1) % 24);
                        let sub_labels = vec![
                            label,
                            format!("{hour:02}:00"),
                            format!("{:02}:00", hour + 1),
                        ];
                        ((hour + 1).to_string(), sub_labels)
                    })
                    .collect(),
            ),
            statuses: Some(
                (0..24).map(|hour| ((hour + 1).to_string(), token(hour).to_string())).collect(),
            ),
        }
    }
}

/// Statuses of all 24 hours of a day, ordered from midnight.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Timeline(Vec<(IntervalLabel, Status)>);

impl Timeline {
    pub fn from_statuses(statuses: [Status; N_HOURS]) -> Self {
        Self(IntervalLabel::day().zip(statuses).collect())
    }

    /// Convert the raw schedule into a gap-free timeline.
    ///
    /// Hours missing from the raw schedule become [`Status::Unknown`].
    pub fn normalize(raw: &RawSchedule) -> Result<Self, ScheduleError> {
        let intervals = raw
            .intervals
            .as_ref()
            .ok_or(ScheduleError::ScheduleMalformed { reason: "interval labels are missing" })?;
        let statuses = raw
            .statuses
            .as_ref()
            .ok_or(ScheduleError::ScheduleMalformed { reason: "statuses are missing" })?;

        let mut resolved: [Option<Status>; N_HOURS] = [None; N_HOURS];
        let sorted_intervals = intervals.iter().sorted_by(|(lhs, _), (rhs, _)| {
            // Lexical order would put `10-11` before `9-10`:
            leading_number(lhs).cmp(&leading_number(rhs)).then_with(|| lhs.cmp(rhs))
        });
        for (key, sub_labels) in sorted_intervals {
            let Some(label) = sub_labels
                .first()
                .and_then(|label| label.parse::<IntervalLabel>().ok())
                .or_else(|| key.parse().ok())
            else {
                continue;
            };
            resolved[label.start_hour() as usize].get_or_insert_with(|| {
                statuses.get(key).map_or(Status::Unknown, |token| Status::from(token.as_str()))
            });
        }

        if resolved.iter().all(Option::is_none) {
            return Err(ScheduleError::ScheduleMalformed { reason: "no hour could be resolved" });
        }
        Ok(Self::from_statuses(resolved.map(|status| status.unwrap_or(Status::Unknown))))
    }

    /// Status of the interval starting at the hour.
    pub fn get(&self, hour: u32) -> Result<Status, ScheduleError> {
        self.0
            .get(hour as usize)
            .filter(|(label, _)| label.start_hour() == hour)
            .map(|(_, status)| *status)
            .ok_or(ScheduleError::IntervalNotFound { hour })
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntervalLabel, Status)> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn uniform(status: Status) -> Self {
        Self::from_statuses([status; N_HOURS])
    }

    #[cfg(test)]
    pub fn with(mut self, hour: u32, status: Status) -> Self {
        self.0[hour as usize].1 = status;
        self
    }

    #[cfg(test)]
    pub fn truncated(mut self, len: usize) -> Self {
        self.0.truncate(len);
        self
    }
}
