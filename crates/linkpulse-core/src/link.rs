use crate::client::{Browser, ClientInfo, Device, Os};
use crate::owner::Owner;
use crate::short_id::ShortId;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Referrer recorded when a visit carries no `Referer` header.
pub const DIRECT_REFERRER: &str = "Direct";

/// One recorded redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub timestamp: Timestamp,
    /// Originating URL, or [`DIRECT_REFERRER`].
    pub referrer: String,
    /// Raw client agent as received. Kept for later re-classification,
    /// never exposed to dashboard consumers.
    pub user_agent: String,
    pub browser: Browser,
    pub os: Os,
    pub device: Device,
}

impl VisitRecord {
    /// Builds a visit from an already classified client.
    ///
    /// An absent or blank referrer is recorded as [`DIRECT_REFERRER`].
    pub fn new(
        timestamp: Timestamp,
        referrer: Option<&str>,
        user_agent: impl Into<String>,
        client: ClientInfo,
    ) -> Self {
        let referrer = referrer
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DIRECT_REFERRER)
            .to_string();

        Self {
            timestamp,
            referrer,
            user_agent: user_agent.into(),
            browser: client.browser,
            os: client.os,
            device: client.device,
        }
    }

    pub fn client(&self) -> ClientInfo {
        ClientInfo {
            browser: self.browser,
            os: self.os,
            device: self.device,
        }
    }
}

/// The fields supplied when a short link is first persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub owner: Owner,
    pub long_url: String,
    pub created_at: Timestamp,
}

impl NewShortLink {
    /// Materializes the stored record for `short_id` with no visits yet.
    pub fn into_link(self, short_id: ShortId) -> ShortLink {
        ShortLink {
            owner: self.owner,
            long_url: self.long_url,
            short_id,
            click_count: 0,
            visits: Vec::new(),
            created_at: self.created_at,
        }
    }
}

/// A persisted mapping from a short id to a long URL plus its visit history.
///
/// `click_count` always equals `visits.len()`: stores only ever change the
/// two together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortLink {
    pub owner: Owner,
    pub long_url: String,
    pub short_id: ShortId,
    pub click_count: u64,
    pub visits: Vec<VisitRecord>,
    pub created_at: Timestamp,
}

impl ShortLink {
    pub fn is_owned_by(&self, owner: &Owner) -> bool {
        &self.owner == owner
    }

    /// Applies one visit: the counter and the history move together.
    pub fn push_visit(&mut self, visit: VisitRecord) {
        self.visits.push(visit);
        self.click_count += 1;
    }
}
