use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::prelude::*;

pub const HOURS_PER_DAY: u32 = 24;

/// One clock hour of the day, rendered as `HH-HH`.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct IntervalLabel {
    start_hour: u32,
}

impl IntervalLabel {
    pub fn try_new(start_hour: u32) -> Result<Self> {
        ensure!(start_hour < HOURS_PER_DAY, "hour {start_hour} is out of range");
        Ok(Self { start_hour })
    }

    /// All the labels of a day, in order.
    pub fn day() -> impl Iterator<Item = Self> {
        (0..HOURS_PER_DAY).map(|start_hour| Self { start_hour })
    }

    #[must_use]
    pub const fn start_hour(self) -> u32 {
        self.start_hour
    }

    /// Wraps over midnight: the last label is `23-00`.
    #[must_use]
    pub const fn end_hour(self) -> u32 {
        (self.start_hour + 1) % HOURS_PER_DAY
    }
}

impl Display for IntervalLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:02}", self.start_hour, self.end_hour())
    }
}

impl FromStr for IntervalLabel {
    type Err = Error;

    /// Parse `HH-HH`, also tolerating `H-H` and `HH:MM-HH:MM`.
    fn from_str(label: &str) -> Result<Self> {
        let (start, end) =
            label.split_once('-').with_context(|| format!("`{label}` is not a range"))?;
        let start_hour = leading_number(start)
            .with_context(|| format!("`{label}` has no start hour"))?;
        let end_hour =
            leading_number(end).with_context(|| format!("`{label}` has no end hour"))?;
        let this = Self::try_new(start_hour)?;
        ensure!(
            end_hour % HOURS_PER_DAY == this.end_hour(),
            "`{label}` does not span exactly one hour"
        );
        Ok(this)
    }
}

/// Leading decimal digits of the string, used for numeric ordering of raw keys.
#[must_use]
pub fn leading_number(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    text[..end].parse().ok()
}
