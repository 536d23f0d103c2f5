//! Eligibility engine: may this process start at this instant?
//!
//! Pure and synchronous. The instant is always supplied by the caller; the
//! engine never reads a clock. Every rule is evaluated so the caller gets the
//! complete set of violations, never just the first.

use chrono::{Datelike, NaiveDateTime};

use crate::domain::models::eligibility::{Eligibility, Violation, ViolationKind};
use crate::domain::models::process::{DayOfWeek, Process, ProcessDate, ProcessTime};

/// Evaluate `process` against the local wall-clock instant `now`.
///
/// A process that is already running is reported as `already running` and
/// is never eligible to be started again.
pub fn can_execute(process: &Process, now: NaiveDateTime) -> Eligibility {
    let today = ProcessDate::new(now.date());
    let time_of_day = ProcessTime::new(now.time());
    let weekday = DayOfWeek::from(now.weekday());

    let mut result = Eligibility::eligible();

    if process.is_running() {
        result.record(Violation::new(ViolationKind::AlreadyRunning));
    }

    if process.days_off.contains(&weekday) {
        result.record(Violation::bounded(ViolationKind::ExcludedDay, weekday, today));
    }

    if let Some(from) = process.date_from {
        if today < from {
            result.record(Violation::bounded(ViolationKind::TooEarlyDate, from, today));
        }
    }

    if let Some(to) = process.date_to {
        if today > to {
            result.record(Violation::bounded(ViolationKind::TooLateDate, to, today));
        }
    }

    if let Some(from) = process.time_from {
        if time_of_day < from {
            result.record(Violation::bounded(ViolationKind::TooEarlyTime, from, time_of_day));
        }
    }

    if let Some(to) = process.time_to {
        if time_of_day > to {
            result.record(Violation::bounded(ViolationKind::TooLateTime, to, time_of_day));
        }
    }

    result
}
