//! Campaign send/open/click rollup.

use crm_core::types::Campaign;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub sent: u64,
    pub opens: u64,
    /// Clicks over sends, one decimal, e.g. `"10.0%"`. `"0%"` when nothing was sent.
    pub click_rate: String,
}

pub fn campaign_stats(campaigns: &[Campaign]) -> CampaignStats {
    let (sent, opens, clicks) = campaigns.iter().fold((0u64, 0u64, 0u64), |(s, o, c), campaign| {
        (
            s.saturating_add(campaign.sent_count),
            o.saturating_add(campaign.open_count),
            c.saturating_add(campaign.click_count),
        )
    });

    let click_rate = if sent == 0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", clicks as f64 / sent as f64 * 100.0)
    };

    CampaignStats {
        sent,
        opens,
        click_rate,
    }
}
