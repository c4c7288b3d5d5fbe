use dg_core::{GridRow, RowId};
use serde::{Deserialize, Serialize};

/// One KOL's buying activity on a token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KolDetail {
    pub chain: String,
    pub address: String,
    pub twitter_username: String,
    pub twitter_name: String,
    pub avatar: String,
    pub store_time: String,
    pub buy_counts: u64,
}

impl GridRow for KolDetail {
    fn row_id(&self) -> RowId {
        RowId::new(self.address.clone())
    }
}

/// A token bought by KOLs, with the per-KOL breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KolTokenRow {
    pub token_address: String,
    pub token_name: String,
    /// Token image URL
    pub symbol: String,
    pub chain: String,
    pub is_signaled: bool,
    pub buy_sum_counts: u64,
    /// Missing in the payload means no KOLs
    pub kols_details: Vec<KolDetail>,
}

impl KolTokenRow {
    pub fn kols_count(&self) -> usize {
        self.kols_details.len()
    }

    /// Names and usernames of every KOL, for the page search box
    pub fn kol_search_fields(&self) -> Vec<&str> {
        self.kols_details
            .iter()
            .flat_map(|kol| [kol.twitter_name.as_str(), kol.twitter_username.as_str()])
            .collect()
    }
}

impl GridRow for KolTokenRow {
    fn row_id(&self) -> RowId {
        RowId::composite(&[&self.chain, &self.token_address])
    }
}
