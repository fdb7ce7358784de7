use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

const HOUR: i64 = 60 * 60;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Coarse "airs in ..." label for the next episode of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiringCountdown {
    Hours(i64),
    Days(i64),
    Weeks(i64),
    Months(i64),
}

impl AiringCountdown {
    /// Returns `None` once the airing time has passed.
    ///
    /// Under a day rounds up to hours, under a week rounds up to days, under
    /// thirty days rounds up to weeks; anything further is whole 30-day months.
    pub fn until(airing_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Self> {
        let secs = (airing_at - now).num_seconds();
        if secs <= 0 {
            return None;
        }

        let countdown = if secs < DAY {
            Self::Hours(div_ceil(secs, HOUR))
        } else if secs < WEEK {
            Self::Days(div_ceil(secs, DAY))
        } else if secs < 30 * DAY {
            Self::Weeks(div_ceil(secs, WEEK))
        } else {
            Self::Months(secs / DAY / 30)
        };
        Some(countdown)
    }

    /// True when the episode airs within a day.
    pub fn is_imminent(&self) -> bool {
        matches!(self, Self::Hours(_))
    }
}

fn div_ceil(value: i64, unit: i64) -> i64 {
    (value + unit - 1) / unit
}

impl Display for AiringCountdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (count, unit) = match *self {
            Self::Hours(n) => (n, "hour"),
            Self::Days(n) => (n, "day"),
            Self::Weeks(n) => (n, "week"),
            Self::Months(n) => (n, "month"),
        };
        let plural = if count == 1 { "" } else { "s" };
        write!(f, "{} {}{}", count, unit, plural)
    }
}
