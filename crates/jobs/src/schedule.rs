//! Next-run computation for a daily wall-clock schedule.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Returns the first instant after `now` whose local time in `tz` is `at`.
///
/// A local time skipped by a DST gap runs one hour later; a repeated local
/// time runs at its first occurrence.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    let mut day = now.with_timezone(&tz).date_naive();
    // Today, tomorrow, and one spare day for a gap that swallows tomorrow's slot.
    for _ in 0..3 {
        if let Some(candidate) = local_run(day, at, tz)
            && candidate > now
        {
            return Some(candidate);
        }
        day = day.succ_opt()?;
    }
    None
}

fn local_run(day: NaiveDate, at: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    let local = day.and_time(at);
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()?,
    };
    Some(resolved.with_timezone(&Utc))
}
