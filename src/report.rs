//! Human-readable messages, formatted with Telegram's legacy Markdown.

use crate::core::{CurrentState, Forecast, Restoration, TimeOfDay};

pub const PING_MESSAGE: &str = "⚡️ Check 🏠";

pub const SUBSCRIBED_MESSAGE: &str = "✅ You are now subscribed to the power outage alerts";

pub const ALREADY_SUBSCRIBED_MESSAGE: &str = "👌 You are already subscribed to the alerts";

/// Message sent when the schedule cannot be interpreted.
pub const ASSUME_OUTAGE_MESSAGE: &str =
    "❓ *The schedule could not be read*\nAssume the power may go off at any moment";

#[must_use]
pub fn format_alert(forecast: &Forecast) -> String {
    let headline = if forecast.status.is_uncertain() {
        "Possible power outage"
    } else {
        "Power outage"
    };
    format!(
        "⚡️ *{headline} in {}*\n{} ({})",
        format_minutes(forecast.minutes_until_cutoff),
        format_window(forecast.cutoff, forecast.restoration),
        forecast.status,
    )
}

#[must_use]
pub fn format_current_state(state: &CurrentState, now: TimeOfDay) -> String {
    let icon = if state.is_on { "💡" } else { "🕯" };
    let summary = if state.is_on { "on" } else { "off" };
    format!("{icon} At {now} the power is {summary} ({})", state.status)
}

#[must_use]
pub fn format_forecast(forecast: Option<&Forecast>) -> String {
    forecast.map_or_else(
        || "🌤 No more outages today".to_string(),
        |forecast| {
            format!(
                "⏳ Next outage: {} in {} ({})",
                format_window(forecast.cutoff, forecast.restoration),
                format_minutes(forecast.minutes_until_cutoff),
                forecast.status,
            )
        },
    )
}

fn format_window(cutoff: TimeOfDay, restoration: Restoration) -> String {
    if restoration.is_resolved() {
        format!("{cutoff}–{}", restoration.time())
    } else {
        format!("from {cutoff} until the end of the day")
    }
}

fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, 1) => "1 minute".to_string(),
        (0, minutes) => format!("{minutes} minutes"),
        (hours, 0) => format!("{hours} h"),
        (hours, minutes) => format!("{hours} h {minutes} min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Status;

    fn forecast(status: Status, restoration: Restoration, minutes_until_cutoff: u32) -> Forecast {
        Forecast { cutoff: TimeOfDay::new(14, 0), restoration, status, minutes_until_cutoff }
    }

    #[test]
    fn test_format_alert_ok() {
        let forecast =
            forecast(Status::OffFirstHalf, Restoration::At(TimeOfDay::new(14, 30)), 25);
        assert_eq!(
            format_alert(&forecast),
            "⚡️ *Power outage in 25 minutes*\n14:00–14:30 (off during the first half-hour)",
        );
    }

    #[test]
    fn test_format_uncertain_alert_ok() {
        let forecast = forecast(Status::PowerOffUncertain, Restoration::EndOfDay, 1);
        assert_eq!(
            format_alert(&forecast),
            "⚡️ *Possible power outage in 1 minute*\nfrom 14:00 until the end of the day (possibly off)",
        );
    }

    #[test]
    fn test_format_forecast_ok() {
        let forecast = forecast(Status::PowerOff, Restoration::At(TimeOfDay::new(16, 0)), 90);
        assert_eq!(
            format_forecast(Some(&forecast)),
            "⏳ Next outage: 14:00–16:00 in 1 h 30 min (power off)",
        );
        assert_eq!(format_forecast(None), "🌤 No more outages today");
    }

    #[test]
    fn test_format_current_state_ok() {
        let state = CurrentState { status: Status::OffSecondHalf, is_on: false };
        assert_eq!(
            format_current_state(&state, TimeOfDay::new(9, 45)),
            "🕯 At 09:45 the power is off (off during the second half-hour)",
        );
    }

    #[test]
    fn test_format_minutes_ok() {
        assert_eq!(format_minutes(59), "59 minutes");
        assert_eq!(format_minutes(120), "2 h");
        assert_eq!(format_minutes(61), "1 h 1 min");
    }
}
