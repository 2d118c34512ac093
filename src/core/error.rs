/// Classified failures of the schedule engine.
#[derive(Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ScheduleError {
    /// The raw schedule is absent or carries no usable hour.
    #[display("malformed schedule: {reason}")]
    ScheduleMalformed {
        #[error(not(source))]
        reason: &'static str,
    },

    /// The timeline has no interval for the hour, which is a defect.
    #[display("no interval for hour {hour}")]
    IntervalNotFound {
        #[error(not(source))]
        hour: u32,
    },
}
