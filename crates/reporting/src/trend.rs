//! Month-over-month trend deltas for dashboard stat cards.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Percentage change of a metric between the current and the previous
/// calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    /// Display string, e.g. `"+25%"`, `"-10%"`, `"0%"`.
    pub value: String,
    pub is_up: bool,
    /// Accumulation for the calendar month containing `now`.
    pub current: f64,
    /// Accumulation for the calendar month before that.
    pub previous: f64,
}

impl Trend {
    /// Derive the display value from the two monthly accumulations.
    pub fn from_totals(current: f64, previous: f64) -> Self {
        if previous == 0.0 {
            let is_up = current > 0.0;
            return Self {
                value: if is_up { "+100%" } else { "0%" }.to_string(),
                is_up,
                current,
                previous,
            };
        }

        let percent = round_half_up((current - previous) / previous * 100.0);
        // A negative base flips the ratio's sign, so only the percent itself
        // says which way the card points.
        let is_up = if previous > 0.0 {
            current >= previous
        } else {
            percent >= 0
        };
        let value = if is_up && percent >= 0 {
            format!("+{}%", percent)
        } else {
            format!("{}%", percent)
        };

        Self {
            value,
            is_up,
            current,
            previous,
        }
    }
}

/// Calendar month as `(year, month)`.
type MonthKey = (i32, u32);

fn month_key(dt: &DateTime<FixedOffset>) -> MonthKey {
    (dt.year(), dt.month())
}

fn previous_month((year, month): MonthKey) -> MonthKey {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Nearest integer, halves toward positive infinity (`-2.5` -> `-2`).
///
/// `x - floor` is exact, unlike `x + 0.5`, so values just below a half do
/// not round up.
fn round_half_up(x: f64) -> i64 {
    let floor = x.floor();
    let rounded = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Bucket `items` into the current and previous calendar month of `now`
/// (in `now`'s offset) and compare the per-month sums of `weight_of`.
///
/// Items whose date does not resolve, or falls in neither month, are ignored.
pub fn trend<I, T, D, W>(items: I, now: DateTime<FixedOffset>, date_of: D, weight_of: W) -> Trend
where
    I: IntoIterator<Item = T>,
    D: Fn(&T) -> Option<DateTime<Utc>>,
    W: Fn(&T) -> f64,
{
    let this_month = month_key(&now);
    let last_month = previous_month(this_month);

    let mut current = 0.0;
    let mut previous = 0.0;
    let mut unresolved = 0usize;

    for item in items {
        let Some(at) = date_of(&item) else {
            unresolved += 1;
            continue;
        };
        let key = month_key(&at.with_timezone(now.offset()));
        if key == this_month {
            current += weight_of(&item);
        } else if key == last_month {
            previous += weight_of(&item);
        }
    }

    if unresolved > 0 {
        debug!(unresolved, "Skipped items without a usable date");
    }

    Trend::from_totals(current, previous)
}

/// Trend of how many items fall in each month.
pub fn count_trend<I, T, D>(items: I, now: DateTime<FixedOffset>, date_of: D) -> Trend
where
    I: IntoIterator<Item = T>,
    D: Fn(&T) -> Option<DateTime<Utc>>,
{
    trend(items, now, date_of, |_| 1.0)
}

/// Trend of the summed `amount_of` per month.
pub fn sum_trend<I, T, D, A>(items: I, now: DateTime<FixedOffset>, date_of: D, amount_of: A) -> Trend
where
    I: IntoIterator<Item = T>,
    D: Fn(&T) -> Option<DateTime<Utc>>,
    A: Fn(&T) -> f64,
{
    trend(items, now, date_of, amount_of)
}
