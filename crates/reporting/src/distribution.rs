//! Lead counts per country.

use crm_core::types::Lead;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

/// Count leads per raw `country` value.
///
/// Keys are used verbatim: no case folding or trimming, and an empty string
/// is a key of its own. Leads with no country at all are not counted.
pub fn country_distribution(leads: &[Lead]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for country in leads.iter().filter_map(|l| l.country.as_deref()) {
        *counts.entry(country.to_string()).or_insert(0) += 1;
    }
    counts
}

/// The `limit` largest buckets, by count descending then country ascending.
pub fn top_countries(distribution: &BTreeMap<String, u64>, limit: usize) -> Vec<CountryCount> {
    let mut ranked: Vec<CountryCount> = distribution
        .iter()
        .map(|(country, &count)| CountryCount {
            country: country.clone(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    ranked.truncate(limit);
    ranked
}
