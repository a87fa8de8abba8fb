//! End-to-end dashboard computation from API-shaped JSON snapshots.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, FixedOffset, TimeZone};
    use crm_core::types::Snapshot;
    use crm_reporting::{build_dashboard, chart_data, CrmDashboard};
    use serde_json::json;

    fn fixed_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 20, 12, 0, 0)
            .unwrap()
    }

    /// Snapshot as the REST API would return it, including a few malformed
    /// records.
    fn sample_snapshot(now: DateTime<FixedOffset>) -> Snapshot {
        let today = now.to_rfc3339();
        let eight_days_ago = (now - Duration::days(8)).to_rfc3339();

        let value = json!({
            "leads": [
                {"id": "l1", "country": "US", "status": "Contacted", "createdAt": today},
                {"id": "l2", "country": "US", "status": "Closed Won", "createdAt": today},
                {"id": "l3", "country": "FR", "status": "Contacted", "createdAt": eight_days_ago},
                {"id": "l4", "country": "", "status": "Qualified", "createdAt": "soon"},
                {"id": "l5", "status": "New"}
            ],
            "clients": [
                {"id": "c1", "onboardedAt": "2024-04-15", "services": [
                    {"status": "Active", "startDate": "2024-04-16"},
                    {"status": "Active", "startDate": "2024-05-02"},
                    {"status": "Cancelled", "startDate": "2024-05-03"}
                ]},
                {"id": "c2", "onboardedAt": "2024-05-01T08:00:00Z", "services": []},
                {"id": "c3", "onboardedAt": "bad", "services": [
                    {"status": "Active"}
                ]}
            ],
            "payments": [
                {"date": "2024-05-03", "amount": 300, "status": "Paid"},
                {"date": "2024-05-10", "amount": 200, "status": "Paid"},
                {"date": "2024-05-11", "amount": 1000, "status": "Pending"},
                {"date": "2024-03-30", "amount": 700, "status": "Paid"}
            ],
            "campaigns": [
                {"name": "Spring", "sentCount": 100, "openCount": 40, "clickCount": 10},
                {"name": "Draft", "sentCount": 0, "openCount": 0, "clickCount": 0}
            ]
        });

        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_dashboard_from_json() {
        let now = fixed_now();
        let report = build_dashboard(&sample_snapshot(now), now, 7);

        // Leads: 3 resolvable in May (two today, one eight days ago), none in April.
        assert_eq!(report.leads.total, 5);
        assert_eq!(report.leads.trend.value, "+100%");

        // Clients: one in May, one in April, one unparseable.
        assert_eq!(report.clients.total, 3);
        assert_eq!(report.clients.trend.value, "+0%");
        assert!(report.clients.trend.is_up);

        // Active services: May 1, April 1, one without a date.
        assert_eq!(report.active_services.total, 3);
        assert_eq!(report.active_services.trend.value, "+0%");

        // Paid revenue: 500 in May, nothing in April (March is out of range).
        assert_eq!(report.revenue.total, 1200.0);
        assert_eq!(report.revenue.trend.current, 500.0);
        assert_eq!(report.revenue.trend.value, "+100%");
        assert!(report.revenue.trend.is_up);
    }

    #[test]
    fn test_histogram_and_chart_from_json() {
        let now = fixed_now();
        let snapshot = sample_snapshot(now);
        let report = build_dashboard(&snapshot, now, 7);

        assert_eq!(report.country_distribution.len(), 3);
        assert_eq!(report.country_distribution["US"], 2);
        assert_eq!(report.country_distribution["FR"], 1);
        assert_eq!(report.country_distribution[""], 1);
        let counted: u64 = report.country_distribution.values().sum();
        assert_eq!(counted, 4);

        assert_eq!(report.chart.len(), 7);
        let today = report.chart.last().unwrap();
        assert_eq!(today.date, now.date_naive());
        assert_eq!(today.contacted, 1);
        assert_eq!(today.converted, 1);
        let contacted: u64 = report.chart.iter().map(|p| p.contacted).sum();
        assert_eq!(contacted, 1, "eight-day-old lead must fall outside the window");

        assert_eq!(report.chart, chart_data(&snapshot.leads, now));
    }

    #[test]
    fn test_campaign_rollup_from_json() {
        let now = fixed_now();
        let report = build_dashboard(&sample_snapshot(now), now, 7);
        assert_eq!(report.campaigns.sent, 100);
        assert_eq!(report.campaigns.opens, 40);
        assert_eq!(report.campaigns.click_rate, "10.0%");
    }

    #[test]
    fn test_report_json_shape() {
        let now = fixed_now();
        let report = build_dashboard(&sample_snapshot(now), now, 7);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["leads"]["trend"]["value"], "+100%");
        assert_eq!(json["leads"]["trend"]["isUp"], true);
        assert_eq!(json["campaigns"]["clickRate"], "10.0%");
        assert_eq!(json["chart"][6]["label"], "Mon");
        assert_eq!(json["chart"][6]["date"], "2024-05-20");
        assert_eq!(json["generatedAt"], "2024-05-20T12:00:00+00:00");
    }

    #[test]
    fn test_cached_dashboard_matches_direct_build() {
        let now = fixed_now();
        let dashboard = CrmDashboard::new(7);
        let version = dashboard.publish(sample_snapshot(now));
        assert_eq!(version, 1);

        let cached = dashboard.report(now);
        let direct = build_dashboard(&sample_snapshot(now), now, 7);
        assert_eq!(cached, direct);
        assert_eq!(dashboard.report(now), cached);
        assert_eq!(dashboard.cached_reports(), 1);
    }

    #[test]
    fn test_month_boundary_at_new_year() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 3, 9, 0, 0)
            .unwrap();
        let snapshot: Snapshot = serde_json::from_value(json!({
            "payments": [
                {"date": "2024-12-10", "amount": 400, "status": "Paid"},
                {"date": "2025-01-02", "amount": 100, "status": "Paid"}
            ]
        }))
        .unwrap();

        let report = build_dashboard(&snapshot, now, 7);
        assert_eq!(report.revenue.trend.previous, 400.0);
        assert_eq!(report.revenue.trend.current, 100.0);
        assert_eq!(report.revenue.trend.value, "-75%");
        assert!(!report.revenue.trend.is_up);
    }

    #[test]
    fn test_sparse_records_still_build_a_dashboard() {
        let now = fixed_now();
        // 2024-05-02T00:00:00Z and 2024-04-10T00:00:00Z as epoch millis.
        let json = r#"{
            "leads": [
                {"id": "l1", "country": "DE", "createdAt": 1714608000000},
                {"id": "l2", "status": "Contacted", "createdAt": false}
            ],
            "clients": [
                {"id": "c1", "onboardedAt": 1712707200000, "services": [
                    {"startDate": "2024-05-02"},
                    {"status": "Active", "startDate": 1714608000000}
                ]}
            ],
            "payments": [
                {"date": "2024-05-03", "amount": 80},
                {"date": 1714608000000, "amount": "50", "status": "Paid"},
                {"date": "2024-04-12", "amount": -100, "status": "Paid"}
            ]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let report = build_dashboard(&snapshot, now, 7);

        assert_eq!(report.leads.total, 2);
        assert_eq!(report.leads.trend.current, 1.0);
        assert_eq!(report.clients.trend.previous, 1.0);
        assert_eq!(report.active_services.total, 1);
        assert_eq!(report.active_services.trend.current, 1.0);
        assert_eq!(report.country_distribution["DE"], 1);

        // A payment without status is not revenue; April nets to a refund.
        assert_eq!(report.revenue.total, -50.0);
        assert_eq!(report.revenue.trend.current, 50.0);
        assert_eq!(report.revenue.trend.previous, -100.0);
        assert_eq!(report.revenue.trend.value, "-150%");
        assert!(!report.revenue.trend.is_up);
    }
}
