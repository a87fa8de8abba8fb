//! CRM dashboard — stat cards, country histogram, activity chart and
//! campaign rollup computed from one snapshot.

use chrono::{DateTime, FixedOffset, Utc};
use crm_core::types::{PaymentStatus, ServiceStatus, Snapshot};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::campaign::{campaign_stats, CampaignStats};
use crate::chart::{rolling_window, ChartPoint};
use crate::distribution::country_distribution;
use crate::trend::{count_trend, sum_trend, Trend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard<T> {
    pub total: T,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub leads: StatCard<u64>,
    pub clients: StatCard<u64>,
    pub active_services: StatCard<u64>,
    pub revenue: StatCard<f64>,
    pub country_distribution: BTreeMap<String, u64>,
    pub chart: Vec<ChartPoint>,
    pub campaigns: CampaignStats,
    pub generated_at: DateTime<FixedOffset>,
}

/// Compute the whole dashboard for `snapshot` as seen at `now`.
#[instrument(skip_all, fields(
    leads = snapshot.leads.len(),
    clients = snapshot.clients.len(),
    payments = snapshot.payments.len(),
    campaigns = snapshot.campaigns.len()
))]
pub fn build_dashboard(
    snapshot: &Snapshot,
    now: DateTime<FixedOffset>,
    window_days: u32,
) -> DashboardReport {
    let leads = StatCard {
        total: snapshot.leads.len() as u64,
        trend: count_trend(&snapshot.leads, now, |l| l.created()),
    };

    let clients = StatCard {
        total: snapshot.clients.len() as u64,
        trend: count_trend(&snapshot.clients, now, |c| c.onboarded()),
    };

    let active: Vec<_> = snapshot
        .clients
        .iter()
        .flat_map(|c| c.services.iter())
        .filter(|s| s.status == ServiceStatus::Active)
        .collect();
    let active_services = StatCard {
        total: active.len() as u64,
        trend: count_trend(active, now, |s| s.started()),
    };

    let paid: Vec<_> = snapshot
        .payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .collect();
    let revenue = StatCard {
        total: paid.iter().map(|p| p.amount).sum::<f64>(),
        trend: sum_trend(paid, now, |p| p.paid_on(), |p| p.amount),
    };

    let report = DashboardReport {
        leads,
        clients,
        active_services,
        revenue,
        country_distribution: country_distribution(&snapshot.leads),
        chart: rolling_window(&snapshot.leads, now, window_days),
        campaigns: campaign_stats(&snapshot.campaigns),
        generated_at: now,
    };

    debug!(
        lead_trend = %report.leads.trend.value,
        revenue_trend = %report.revenue.trend.value,
        countries = report.country_distribution.len(),
        "Dashboard computed"
    );

    report
}

/// Cache key: a report is only reusable for the same snapshot version and
/// the same instant seen through the same calendar offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ReportKey {
    version: u64,
    instant: DateTime<Utc>,
    offset_secs: i32,
}

impl ReportKey {
    fn new(version: u64, now: &DateTime<FixedOffset>) -> Self {
        Self {
            version,
            instant: now.with_timezone(&Utc),
            offset_secs: now.offset().local_minus_utc(),
        }
    }
}

/// Reports kept per snapshot version. A live clock gives a new `now` on
/// every call, so the cache only helps for recently requested instants.
pub const MAX_CACHED_REPORTS: usize = 32;

/// Holds the latest published snapshot and memoizes reports computed from it.
///
/// Publishing a snapshot bumps the version and drops every cached report.
/// At most [`MAX_CACHED_REPORTS`] reports are kept; the one for the earliest
/// instant goes first.
pub struct CrmDashboard {
    current: RwLock<(u64, Arc<Snapshot>)>,
    reports: DashMap<ReportKey, DashboardReport>,
    window_days: u32,
}

impl CrmDashboard {
    pub fn new(window_days: u32) -> Self {
        Self {
            current: RwLock::new((0, Arc::new(Snapshot::default()))),
            reports: DashMap::new(),
            window_days,
        }
    }

    /// Replace the snapshot. Returns the new version.
    pub fn publish(&self, snapshot: Snapshot) -> u64 {
        let mut current = self.current.write();
        let version = current.0 + 1;
        *current = (version, Arc::new(snapshot));
        self.reports.clear();
        info!(version, "Published CRM snapshot");
        version
    }

    pub fn current_version(&self) -> u64 {
        self.current.read().0
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().1.clone()
    }

    /// Report for the current snapshot at `now`, computed at most once per
    /// `(version, now)`.
    pub fn report(&self, now: DateTime<FixedOffset>) -> DashboardReport {
        let (version, snapshot) = {
            let current = self.current.read();
            (current.0, current.1.clone())
        };
        let key = ReportKey::new(version, &now);

        if let Some(cached) = self.reports.get(&key) {
            metrics::counter!("dashboard.cache_hit").increment(1);
            return cached.clone();
        }
        metrics::counter!("dashboard.cache_miss").increment(1);

        let report = build_dashboard(&snapshot, now, self.window_days);

        // Held across check and insert so a publish cannot clear in between.
        let current = self.current.read();
        if current.0 == version {
            self.evict_for(&key);
            self.reports.insert(key, report.clone());
        } else {
            debug!(version, latest = current.0, "Snapshot replaced while building, not caching");
        }
        report
    }

    /// Make room for `key` by dropping the reports for the earliest instants.
    fn evict_for(&self, key: &ReportKey) {
        if self.reports.contains_key(key) {
            return;
        }
        while self.reports.len() >= MAX_CACHED_REPORTS {
            let oldest = self
                .reports
                .iter()
                .map(|entry| *entry.key())
                .min_by_key(|k| (k.instant, k.offset_secs));
            let Some(oldest) = oldest else { break };
            self.reports.remove(&oldest);
        }
    }

    pub fn cached_reports(&self) -> usize {
        self.reports.len()
    }

    pub fn clear_cache(&self) {
        self.reports.clear();
    }
}

impl Default for CrmDashboard {
    fn default() -> Self {
        Self::new(crate::chart::DEFAULT_WINDOW_DAYS)
    }
}
