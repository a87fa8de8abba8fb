//! CRM records as the REST API delivers them.
//!
//! Timestamps stay as the raw strings the API sent; use
//! [`crate::timestamp::resolve_timestamp`] (or the accessors such as
//! [`Lead::created`]) to turn them into points in time. Status fields are open enums: values the
//! dashboard does not know about are kept verbatim in an `Other` variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timestamp::{de, resolve_timestamp};

// ─── Status enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
    ClosedWon,
    ClosedLost,
    Other(String),
}

impl LeadStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Converted => "Converted",
            LeadStatus::ClosedWon => "Closed Won",
            LeadStatus::ClosedLost => "Closed Lost",
            LeadStatus::Other(raw) => raw,
        }
    }

    /// `Converted` and `Closed Won` both count as a conversion.
    pub fn is_converted(&self) -> bool {
        matches!(self, LeadStatus::Converted | LeadStatus::ClosedWon)
    }
}

impl From<String> for LeadStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "New" => LeadStatus::New,
            "Contacted" => LeadStatus::Contacted,
            "Converted" => LeadStatus::Converted,
            "Closed Won" => LeadStatus::ClosedWon,
            "Closed Lost" => LeadStatus::ClosedLost,
            _ => LeadStatus::Other(raw),
        }
    }
}

impl From<&str> for LeadStatus {
    fn from(raw: &str) -> Self {
        LeadStatus::from(raw.to_string())
    }
}

impl From<LeadStatus> for String {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceStatus {
    Active,
    Inactive,
    Other(String),
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceStatus::Active => "Active",
            ServiceStatus::Inactive => "Inactive",
            ServiceStatus::Other(raw) => raw,
        }
    }
}

/// A record without a status matches no known status.
impl Default for ServiceStatus {
    fn default() -> Self {
        ServiceStatus::Other(String::new())
    }
}

impl From<String> for ServiceStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Active" => ServiceStatus::Active,
            "Inactive" => ServiceStatus::Inactive,
            _ => ServiceStatus::Other(raw),
        }
    }
}

impl From<&str> for ServiceStatus {
    fn from(raw: &str) -> Self {
        ServiceStatus::from(raw.to_string())
    }
}

impl From<ServiceStatus> for String {
    fn from(status: ServiceStatus) -> Self {
        match status {
            ServiceStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Other(String::new())
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Paid" => PaymentStatus::Paid,
            "Pending" => PaymentStatus::Pending,
            "Failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(raw: &str) -> Self {
        PaymentStatus::from(raw.to_string())
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Records ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_status")]
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "de::lenient_timestamp")]
    pub created_at: Option<String>,
}

impl Lead {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(resolve_timestamp)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default, deserialize_with = "de::lenient_status")]
    pub status: ServiceStatus,
    #[serde(default, deserialize_with = "de::lenient_timestamp")]
    pub start_date: Option<String>,
}

impl Service {
    pub fn started(&self) -> Option<DateTime<Utc>> {
        self.start_date.as_deref().and_then(resolve_timestamp)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "de::lenient_timestamp")]
    pub onboarded_at: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Client {
    pub fn onboarded(&self) -> Option<DateTime<Utc>> {
        self.onboarded_at.as_deref().and_then(resolve_timestamp)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, deserialize_with = "de::lenient_timestamp")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de::lenient_status")]
    pub status: PaymentStatus,
}

impl Payment {
    pub fn paid_on(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(resolve_timestamp)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sent_count: u64,
    #[serde(default)]
    pub open_count: u64,
    #[serde(default)]
    pub click_count: u64,
}

/// Everything the dashboard is computed from, as fetched in one go.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> crate::CrmResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
