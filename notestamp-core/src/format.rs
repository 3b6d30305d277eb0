//! Relative time formatting.
//!
//! Turns a point in time into the short label shown on note cards
//! ("Now", "45min ago", "2d 3hr ago") and, once a week has passed, into a
//! fixed absolute timestamp ("Mon, 2024-01-01 09:30:00").
//!
//! Every function takes `now` explicitly so results are reproducible.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

pub const MINUTES_PER_HOUR: i64 = 60;
pub const HOURS_PER_DAY: i64 = 24;
pub const DAYS_PER_WEEK: i64 = 7;

const DAY_LABEL: &str = "d";
const HOUR_LABEL: &str = "hr";
const MIN_LABEL: &str = "min";

/// strftime pattern for the absolute display
pub const ABSOLUTE_FORMAT: &str = "%a, %Y-%m-%d %H:%M:%S";

/// Naive date-time layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Relative label for a timestamp less than a week old.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAgo {
    /// Less than a minute has elapsed (or the timestamp is in the future)
    Now,
    /// Under a week has elapsed
    Ago { days: i64, hours: i64, minutes: i64 },
}

impl TimeAgo {
    /// Split a whole number of elapsed minutes into the display units.
    ///
    /// Returns `None` once a week or more has elapsed: the element should
    /// show the absolute timestamp instead.
    pub fn from_minutes(total: i64) -> Option<Self> {
        if total <= 0 {
            return Some(TimeAgo::Now);
        }

        let minutes = total % MINUTES_PER_HOUR;
        let total_hours = total / MINUTES_PER_HOUR;
        let hours = total_hours % HOURS_PER_DAY;
        let days = total_hours / HOURS_PER_DAY;

        if days >= DAYS_PER_WEEK {
            None
        } else {
            Some(TimeAgo::Ago {
                days,
                hours,
                minutes,
            })
        }
    }
}

impl fmt::Display for TimeAgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TimeAgo::Now => write!(f, "Now"),
            TimeAgo::Ago {
                days,
                hours,
                minutes,
            } => {
                let mut parts = Vec::with_capacity(4);
                if days > 0 {
                    parts.push(format!("{}{}", days, DAY_LABEL));
                }
                if hours > 0 {
                    parts.push(format!("{}{}", hours, HOUR_LABEL));
                }
                // Minutes are noise once we're counting days
                if days == 0 && minutes > 0 {
                    parts.push(format!("{}{}", minutes, MIN_LABEL));
                }
                parts.push("ago".to_string());
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

/// Whole minutes from `ts` to `now`, rounded down. Future timestamps give 0.
pub fn elapsed_minutes<Tz: TimeZone>(ts: &DateTime<Tz>, now: DateTime<Utc>) -> i64 {
    let millis = now
        .signed_duration_since(ts.with_timezone(&Utc))
        .num_milliseconds();
    millis.div_euclid(60_000).max(0)
}

/// Relative label for `ts` as of `now`, or `None` once a week has passed.
pub fn time_ago<Tz: TimeZone>(ts: &DateTime<Tz>, now: DateTime<Utc>) -> Option<TimeAgo> {
    TimeAgo::from_minutes(elapsed_minutes(ts, now))
}

/// Format `ts` as "Weekday, YYYY-MM-DD HH:MM:SS" in the given offset.
pub fn format_absolute<Tz: TimeZone>(ts: &DateTime<Tz>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format(ABSOLUTE_FORMAT).to_string()
}

/// Parse an ISO-8601 timestamp.
///
/// Date-times without an offset are read in `source_offset`; a bare date is
/// midnight UTC. Returns `None` for anything unparseable.
pub fn parse_timestamp(raw: &str, source_offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    for layout in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return source_offset.from_local_datetime(&naive).single();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}
