use std::fmt::{Display, Formatter};

use comfy_table::Color;
use enumset::EnumSet;

/// Power state of a single hour interval.
#[derive(Debug, Hash, enumset::EnumSetType)]
pub enum Status {
    /// Power is on during the whole hour.
    PowerOn,

    /// Power is off during the whole hour.
    PowerOff,

    /// Power may be off during the whole hour.
    PowerOffUncertain,

    /// Power is off during `[00, 30)` and on during `[30, 60)`.
    OffFirstHalf,

    /// Power may be off during `[00, 30)`.
    OffFirstHalfUncertain,

    /// Power is on during `[00, 30)` and off during `[30, 60)`.
    OffSecondHalf,

    /// Power may be off during `[30, 60)`.
    OffSecondHalfUncertain,

    /// No data for the hour, treated as an outage.
    Unknown,
}

impl Status {
    pub const WHOLE_HOUR_OFF: EnumSet<Self> =
        enumset::enum_set!(Self::PowerOff | Self::PowerOffUncertain | Self::Unknown);

    pub const FIRST_HALF_OFF: EnumSet<Self> =
        enumset::enum_set!(Self::OffFirstHalf | Self::OffFirstHalfUncertain);

    pub const SECOND_HALF_OFF: EnumSet<Self> =
        enumset::enum_set!(Self::OffSecondHalf | Self::OffSecondHalfUncertain);

    pub const UNCERTAIN: EnumSet<Self> = enumset::enum_set!(
        Self::PowerOffUncertain | Self::OffFirstHalfUncertain | Self::OffSecondHalfUncertain
    );

    #[must_use]
    pub fn is_outage(self) -> bool {
        self != Self::PowerOn
    }

    #[must_use]
    pub fn is_uncertain(self) -> bool {
        Self::UNCERTAIN.contains(self)
    }

    /// Minute at which power is back within the hour, for half-hour statuses.
    #[must_use]
    pub fn sub_hour_on_minute(self) -> Option<u32> {
        if Self::FIRST_HALF_OFF.contains(self) {
            Some(30)
        } else if Self::SECOND_HALF_OFF.contains(self) {
            Some(0)
        } else {
            None
        }
    }

    /// Minute of the hour at which the outage begins.
    #[must_use]
    pub fn cutoff_minute(self) -> u32 {
        if Self::SECOND_HALF_OFF.contains(self) { 30 } else { 0 }
    }

    /// How long the outage lasts within the hour.
    #[must_use]
    pub fn outage_minutes(self) -> u32 {
        match self {
            Self::PowerOn => 0,
            _ if Self::WHOLE_HOUR_OFF.contains(self) => 60,
            _ => 30,
        }
    }

    /// Whether power is on at the specified minute of the hour.
    #[must_use]
    pub fn is_on_at(self, minute: u32) -> bool {
        match self {
            Self::PowerOn => true,
            Self::OffFirstHalf | Self::OffFirstHalfUncertain => minute >= 30,
            Self::OffSecondHalf | Self::OffSecondHalfUncertain => minute < 30,
            Self::PowerOff | Self::PowerOffUncertain | Self::Unknown => false,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::PowerOn => "power on",
            Self::PowerOff => "power off",
            Self::PowerOffUncertain => "possibly off",
            Self::OffFirstHalf => "off during the first half-hour",
            Self::OffFirstHalfUncertain => "possibly off during the first half-hour",
            Self::OffSecondHalf => "off during the second half-hour",
            Self::OffSecondHalfUncertain => "possibly off during the second half-hour",
            Self::Unknown => "n/a",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::PowerOn => Color::Green,
            Self::PowerOff => Color::Red,
            Self::PowerOffUncertain => Color::DarkYellow,
            Self::OffFirstHalf | Self::OffSecondHalf => Color::Magenta,
            Self::OffFirstHalfUncertain | Self::OffSecondHalfUncertain => Color::Yellow,
            Self::Unknown => Color::Reset,
        }
    }
}

/// DTEK status tokens. Anything unrecognised becomes [`Status::Unknown`].
impl From<&str> for Status {
    fn from(token: &str) -> Self {
        match token {
            "yes" => Self::PowerOn,
            "no" => Self::PowerOff,
            "maybe" => Self::PowerOffUncertain,
            "first" => Self::OffFirstHalf,
            "mfirst" => Self::OffFirstHalfUncertain,
            "second" => Self::OffSecondHalf,
            "msecond" => Self::OffSecondHalfUncertain,
            _ => Self::Unknown,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
