//! CRM dashboard analytics — month-over-month trends, lead country
//! histogram, rolling daily activity chart and campaign rollup.
//!
//! Every function takes the "current" instant as an explicit argument; none
//! of them reads the clock.

pub mod campaign;
pub mod chart;
pub mod dashboard;
pub mod distribution;
pub mod trend;

pub use campaign::{campaign_stats, CampaignStats};
pub use chart::{chart_data, rolling_window, ChartPoint};
pub use dashboard::{build_dashboard, CrmDashboard, DashboardReport, StatCard, MAX_CACHED_REPORTS};
pub use distribution::{country_distribution, top_countries, CountryCount};
pub use trend::{count_trend, sum_trend, trend, Trend};
