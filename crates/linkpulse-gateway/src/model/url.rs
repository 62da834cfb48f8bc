use jiff::Timestamp;
use linkpulse_core::{Browser, Device, Os, ShortLink, VisitRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub long_url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub short_id: String,
    pub long_url: String,
    pub short_url: String,
    pub click_count: u64,
    pub created_at: Timestamp,
}

impl CreateUrlResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            short_id: link.short_id.to_string(),
            long_url: link.long_url,
            short_url,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

/// A visit as shown on the dashboard. The raw client agent stays server-side.
#[derive(Debug, Serialize)]
pub struct VisitView {
    pub timestamp: Timestamp,
    pub referrer: String,
    pub browser: Browser,
    pub os: Os,
    pub device: Device,
}

impl From<VisitRecord> for VisitView {
    fn from(visit: VisitRecord) -> Self {
        Self {
            timestamp: visit.timestamp,
            referrer: visit.referrer,
            browser: visit.browser,
            os: visit.os,
            device: visit.device,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkView {
    pub short_id: String,
    pub long_url: String,
    pub short_url: String,
    pub click_count: u64,
    pub created_at: Timestamp,
    pub visits: Vec<VisitView>,
}

impl LinkView {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            short_id: link.short_id.to_string(),
            long_url: link.long_url,
            short_url,
            click_count: link.click_count,
            created_at: link.created_at,
            visits: link.visits.into_iter().map(VisitView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListUrlsResponse {
    pub urls: Vec<LinkView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkpulse_core::{ClientInfo, NewShortLink, Owner, ShortId};

    #[test]
    fn link_view_hides_user_agent() {
        let mut link = NewShortLink {
            owner: Owner::new("alice").unwrap(),
            long_url: "https://example.com".to_string(),
            created_at: Timestamp::now(),
        }
        .into_link(ShortId::new_unchecked("abc123"));
        link.push_visit(VisitRecord::new(
            Timestamp::now(),
            None,
            "Mozilla/5.0 secret-agent",
            ClientInfo::default(),
        ));

        let view = LinkView::new(link, "http://localhost:8080/abc123".to_string());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["click_count"], 1);
        assert_eq!(json["visits"][0]["referrer"], "Direct");
        assert_eq!(json["visits"][0]["browser"], "Other");
        assert_eq!(json["visits"][0]["device"], "Desktop");
        assert!(json["visits"][0].get("user_agent").is_none());
        assert!(!json.to_string().contains("secret-agent"));
    }
}
