pub mod clock;
pub mod error;
pub mod evaluator;
pub mod forecast;
pub mod label;
pub mod status;
pub mod timeline;

pub use self::{
    clock::TimeOfDay,
    error::ScheduleError,
    evaluator::{CurrentState, evaluate_now},
    forecast::{Forecast, Restoration, forecast_next},
    label::IntervalLabel,
    status::Status,
    timeline::{RawSchedule, Timeline},
};
