//! Rolling daily lead activity chart.
//!
//! Each day's bucket is the cohort of leads *created* on that calendar day,
//! counted by their current status. A lead created ten days ago that was
//! contacted today does not show up in today's bucket: it only ever counts
//! on its creation day. The series is a same-day cohort proxy for funnel
//! activity, not a historical record of status changes.

use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use crm_core::config::MAX_WINDOW_DAYS;
use crm_core::types::{Lead, LeadStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default chart length in days, ending on today.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Short English weekday name, e.g. `"Mon"`.
    pub label: String,
    pub date: NaiveDate,
    pub contacted: u64,
    pub converted: u64,
}

/// Seven daily buckets, oldest first, the last one being `now`'s day.
pub fn chart_data(leads: &[Lead], now: DateTime<FixedOffset>) -> Vec<ChartPoint> {
    rolling_window(leads, now, DEFAULT_WINDOW_DAYS)
}

/// `days` daily buckets ending on `now`'s calendar day (in `now`'s offset),
/// oldest first. `days` is capped at [`MAX_WINDOW_DAYS`].
pub fn rolling_window(leads: &[Lead], now: DateTime<FixedOffset>, days: u32) -> Vec<ChartPoint> {
    if days > MAX_WINDOW_DAYS {
        debug!(days, max = MAX_WINDOW_DAYS, "Clamping chart window");
    }
    let days = days.min(MAX_WINDOW_DAYS);
    let today = now.date_naive();

    let mut points: Vec<ChartPoint> = (0..days)
        .rev()
        .filter_map(|i| today.checked_sub_days(Days::new(u64::from(i))))
        .map(|date| ChartPoint {
            label: date.format("%a").to_string(),
            date,
            contacted: 0,
            converted: 0,
        })
        .collect();

    let Some(first) = points.first().map(|p| p.date) else {
        return points;
    };

    let mut unresolved = 0usize;
    for lead in leads {
        let Some(created) = lead.created() else {
            unresolved += 1;
            continue;
        };
        let day = created.with_timezone(now.offset()).date_naive();
        let offset = (day - first).num_days();
        if offset < 0 {
            continue;
        }
        let Some(point) = points.get_mut(offset as usize) else {
            continue;
        };

        if lead.status == LeadStatus::Contacted {
            point.contacted += 1;
        } else if lead.status.is_converted() {
            point.converted += 1;
        }
    }

    if unresolved > 0 {
        debug!(unresolved, "Leads without a usable creation date left out of the chart");
    }

    points
}
