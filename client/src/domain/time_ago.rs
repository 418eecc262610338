//! Relative time labels such as "3 hours ago".

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

const UNITS: [(i64, &str); 6] = [
    (YEAR, "year"),
    (MONTH, "month"),
    (WEEK, "week"),
    (DAY, "day"),
    (HOUR, "hour"),
    (MINUTE, "minute"),
];

/// Describe how long before `now` the instant `then` was.
///
/// Anything under a minute, or in the future, reads as "just now". Months
/// are 30 days and years 365 days.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use stackit_client::domain::time_ago;
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now - Duration::seconds(20), now), "just now");
/// assert_eq!(time_ago(now - Duration::hours(2), now), "2 hours ago");
/// assert_eq!(time_ago(now - Duration::days(1), now), "1 day ago");
/// ```
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).num_seconds();
    UNITS
        .iter()
        .find(|(span, _)| elapsed >= *span)
        .map_or_else(
            || "just now".to_owned(),
            |(span, unit)| {
                let count = elapsed / span;
                let plural = if count == 1 { "" } else { "s" };
                format!("{count} {unit}{plural} ago")
            },
        )
}
