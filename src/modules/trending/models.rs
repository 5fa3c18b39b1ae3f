use serde::{Deserialize, Serialize};

/// One ranked item of a trending feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingEntry {
    /// 1-based position in the feed
    pub rank: usize,
    pub id: String,
    pub name: String,
    /// Visits counted inside the trending window
    pub visits: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<usize>,
}
