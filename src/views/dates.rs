//! Due-date classification and date helpers.
//!
//! Every function takes the current time explicitly. Calendar comparisons are
//! made in the time zone carried by `now`, so a due date stored in UTC lands on
//! the day the user actually sees.

use crate::types::DueDateStatus;
use chrono::{
    DateTime, Datelike, FixedOffset, Local, Months, NaiveDate, NaiveTime, TimeDelta, Utc,
};

/// Default due-soon window in days.
pub const DEFAULT_DUE_SOON_DAYS: i64 = 3;

const YEAR_SECS: i64 = 31_536_000;
const MONTH_SECS: i64 = 2_592_000;
const WEEK_SECS: i64 = 604_800;
const DAY_SECS: i64 = 86_400;
const HOUR_SECS: i64 = 3_600;
const MINUTE_SECS: i64 = 60;

/// Units for relative time strings, largest first.
const RELATIVE_UNITS: [(&str, i64); 6] = [
    ("year", YEAR_SECS),
    ("month", MONTH_SECS),
    ("week", WEEK_SECS),
    ("day", DAY_SECS),
    ("hour", HOUR_SECS),
    ("minute", MINUTE_SECS),
];

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the host's local zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// An inclusive span of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        is_date_in_range(date, self.start, self.end)
    }
}

/// Buckets due dates relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateClassifier {
    due_soon_days: i64,
}

impl Default for DueDateClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DUE_SOON_DAYS)
    }
}

impl DueDateClassifier {
    pub fn new(due_soon_days: i64) -> Self {
        Self {
            due_soon_days: due_soon_days.max(0),
        }
    }

    pub fn due_soon_days(&self) -> i64 {
        self.due_soon_days
    }

    /// Checks run in order: overdue, today, tomorrow, due-soon, future.
    pub fn classify(&self, due: Option<DateTime<Utc>>, now: DateTime<FixedOffset>) -> DueDateStatus {
        let Some(due) = due else {
            return DueDateStatus::NoDate;
        };

        if is_overdue(due, now) {
            DueDateStatus::Overdue
        } else if is_today(due, now) {
            DueDateStatus::Today
        } else if is_tomorrow(due, now) {
            DueDateStatus::Tomorrow
        } else if self.is_due_soon(due, now) {
            DueDateStatus::DueSoon
        } else {
            DueDateStatus::Future
        }
    }

    /// Within the window and not already overdue.
    pub fn is_due_soon(&self, due: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
        let days = days_until(due, now);
        (0..=self.due_soon_days).contains(&days)
    }
}

/// Classify with the default three-day window.
pub fn due_date_status(due: Option<DateTime<Utc>>, now: DateTime<FixedOffset>) -> DueDateStatus {
    DueDateClassifier::default().classify(due, now)
}

fn calendar_date(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> NaiveDate {
    date.with_timezone(now.offset()).date_naive()
}

pub fn is_today(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
    days_until(date, now) == 0
}

pub fn is_tomorrow(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
    days_until(date, now) == 1
}

pub fn is_yesterday(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
    days_until(date, now) == -1
}

/// Calendar date strictly before today's calendar date.
pub fn is_overdue(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
    calendar_date(date, now) < now.date_naive()
}

/// Due within the default window and not overdue.
pub fn is_due_soon(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
    DueDateClassifier::default().is_due_soon(date, now)
}

/// Signed whole calendar days from today to `date`.
pub fn days_until(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> i64 {
    (calendar_date(date, now) - now.date_naive()).num_days()
}

/// Human readable distance from `now` to `date`.
pub fn format_relative_time(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> String {
    let delta = date.signed_duration_since(now.with_timezone(&Utc));
    // Whole seconds rounded down, so 59.5s ago is a minute ago
    relative_time_from_seconds(delta.num_milliseconds().div_euclid(1000))
}

/// Positive deltas are in the future, negative in the past.
pub fn relative_time_from_seconds(delta_secs: i64) -> String {
    let abs = delta_secs.unsigned_abs();
    for (name, secs) in RELATIVE_UNITS {
        let count = abs / secs as u64;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            let suffix = if delta_secs < 0 { "ago" } else { "from now" };
            return format!("{count} {name}{plural} {suffix}");
        }
    }
    "just now".to_string()
}

fn midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

/// 00:00:00.000 on the same calendar day.
pub fn start_of_day(date: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    midnight(date.date_naive(), *date.offset())
}

/// 23:59:59.999 on the same calendar day.
pub fn end_of_day(date: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start_of_day(date) + TimeDelta::days(1) - TimeDelta::milliseconds(1)
}

pub fn add_days(date: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    date + TimeDelta::days(days)
}

/// Inclusive on both ends.
pub fn is_date_in_range(
    date: DateTime<Utc>,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> bool {
    date >= start && date <= end
}

/// Sunday through Saturday of the current week.
pub fn current_week_range(now: DateTime<FixedOffset>) -> DateRange {
    let back = i64::from(now.weekday().num_days_from_sunday());
    let start = start_of_day(now - TimeDelta::days(back));
    let end = end_of_day(start + TimeDelta::days(6));
    DateRange { start, end }
}

/// First through last day of the current month.
pub fn current_month_range(now: DateTime<FixedOffset>) -> DateRange {
    let today = now.date_naive();
    let first = today - TimeDelta::days(i64::from(today.day0()));
    let last = first + Months::new(1) - TimeDelta::days(1);
    let offset = *now.offset();
    DateRange {
        start: midnight(first, offset),
        end: end_of_day(midnight(last, offset)),
    }
}

/// `YYYY-MM-DD`, as an HTML date input expects.
pub fn format_date_for_input(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_due_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Short label for a due date: "Today", "Tomorrow", "Overdue", or "Oct 21"
/// (with the year when it differs from now's).
pub fn due_label(date: DateTime<Utc>, now: DateTime<FixedOffset>) -> String {
    match days_until(date, now) {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d if d < 0 => "Overdue".to_string(),
        _ => {
            let local = date.with_timezone(now.offset());
            if local.year() != now.year() {
                local.format("%b %-d, %Y").to_string()
            } else {
                local.format("%b %-d").to_string()
            }
        }
    }
}
